// Snapshot storage: CSV files are the handoff between stages

pub mod csv_snapshot;

pub use csv_snapshot::{read_snapshot, read_snapshot_headers, write_snapshot};
