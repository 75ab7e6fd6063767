// Pipeline processing: flatten, filter, enrich, finalize, diagnose

pub mod diagnostic;
pub mod enrich;
pub mod filter;
pub mod finalize;
pub mod flatten;

pub use enrich::Enricher;
pub use filter::filter_launches;
pub use flatten::{flatten, FlatTable};
