use crate::error::{EtlError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Outbound HTTP used by the fetcher and the enricher
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

/// A completed GET, whatever its status
#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub url: String,
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into `EtlError::Status`
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(EtlError::Status {
                url: self.url,
                status: self.status,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.bytes)?)
    }
}
