// Launch data pipeline: ingestion, processing, and snapshot storage

pub mod ingestion;
pub mod orchestrator;
pub mod processing;
pub mod storage;

// Re-export key types and functions from each stage
pub use orchestrator::{Pipeline, PipelineResult};
pub use processing::diagnostic::{landing_pad_report, LandingPadReport};
pub use processing::finalize::{finalize, FinalizeSummary};
