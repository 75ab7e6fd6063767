pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod types;

// Outbound seams and their implementations
pub mod app;
pub mod infra;
