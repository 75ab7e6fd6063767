use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("URL index {index} is out of range (only {len} URLs configured)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Unexpected payload shape: {0}")]
    UnexpectedShape(String),

    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse date '{value}': {message}")]
    Date { value: String, message: String },
}

impl EtlError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EtlError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
