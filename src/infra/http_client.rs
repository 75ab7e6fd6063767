use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::config::ApiConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// `reqwest`-backed client with a request timeout and bounded retries.
///
/// Transport errors and 5xx statuses are retried up to `max_retries` times
/// with a linearly growing delay; the last outcome is returned as-is.
pub struct ReqwestHttp {
    client: reqwest::Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl ReqwestHttp {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(api.timeout())
            .user_agent(concat!("falcon_etl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            max_retries: api.max_retries,
            retry_delay: api.retry_delay(),
        })
    }

    async fn get_once(&self, url: &str) -> Result<HttpGetResult> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?.to_vec();
        debug!("GET {} -> {} ({} bytes)", url, status, bytes.len());
        Ok(HttpGetResult {
            url: url.to_string(),
            status,
            bytes,
        })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        let mut attempt: u32 = 0;
        loop {
            match self.get_once(url).await {
                Ok(resp) if resp.status >= 500 && attempt < self.max_retries => {
                    warn!(
                        "GET {} returned {}, retrying ({}/{})",
                        url,
                        resp.status,
                        attempt + 1,
                        self.max_retries
                    );
                }
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < self.max_retries => {
                    warn!(
                        "GET {} failed: {}, retrying ({}/{})",
                        url,
                        e,
                        attempt + 1,
                        self.max_retries
                    );
                }
                Err(e) => return Err(e),
            }
            attempt += 1;
            tokio::time::sleep(backoff(self.retry_delay, attempt)).await;
        }
    }
}

/// Linear backoff, saturating instead of overflowing
fn backoff(delay: Duration, attempt: u32) -> Duration {
    delay.saturating_mul(attempt)
}
