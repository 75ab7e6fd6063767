// Pipeline ingestion: endpoint list and the primary listing fetch

pub mod fetch;
pub mod sources;

pub use fetch::{fetch_launches, select_url};
pub use sources::load_urls;
