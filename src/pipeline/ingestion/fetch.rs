use super::sources::load_urls;
use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::error::{EtlError, Result};
use std::path::Path;
use tracing::{info, instrument};

/// Pick the URL at `index`
pub fn select_url(urls: &[String], index: usize) -> Result<&str> {
    urls.get(index)
        .map(String::as_str)
        .ok_or(EtlError::IndexOutOfRange {
            index,
            len: urls.len(),
        })
}

/// GET the URL on line `index` of the endpoint list.
///
/// The response comes back whatever its status; checking it is up to the
/// caller.
#[instrument(skip(http))]
pub async fn fetch_launches(
    http: &dyn HttpClientPort,
    urls_path: &Path,
    index: usize,
) -> Result<HttpGetResult> {
    let urls = load_urls(urls_path)?;
    let url = select_url(&urls, index)?;

    info!("📡 Fetching launches from {}", url);
    let response = http.get(url).await?;
    info!(
        "Received {} ({} bytes) from {}",
        response.status,
        response.bytes.len(),
        url
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    struct RecordingHttp {
        requested: Mutex<Vec<String>>,
        status: u16,
    }

    #[async_trait]
    impl HttpClientPort for RecordingHttp {
        async fn get(&self, url: &str) -> Result<HttpGetResult> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(HttpGetResult {
                url: url.to_string(),
                status: self.status,
                bytes: b"[]".to_vec(),
            })
        }
    }

    fn urls_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "http://api.test/v4/launches/past").unwrap();
        writeln!(file, "http://api.test/v4/launches/upcoming").unwrap();
        file
    }

    #[test]
    fn test_select_url_out_of_range() {
        let urls = vec!["a".to_string()];
        assert_eq!(select_url(&urls, 0).unwrap(), "a");
        match select_url(&urls, 1) {
            Err(EtlError::IndexOutOfRange { index, len }) => {
                assert_eq!(index, 1);
                assert_eq!(len, 1);
            }
            other => panic!("expected out-of-range, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_uses_indexed_url() {
        let file = urls_file();
        let http = RecordingHttp {
            requested: Mutex::new(Vec::new()),
            status: 200,
        };

        fetch_launches(&http, file.path(), 1).await.unwrap();
        assert_eq!(
            *http.requested.lock().unwrap(),
            vec!["http://api.test/v4/launches/upcoming".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_error_statuses_as_is() {
        let file = urls_file();
        let http = RecordingHttp {
            requested: Mutex::new(Vec::new()),
            status: 503,
        };

        let response = fetch_launches(&http, file.path(), 0).await.unwrap();
        assert_eq!(response.status, 503);
    }

    #[tokio::test]
    async fn test_fetch_index_past_end_makes_no_request() {
        let file = urls_file();
        let http = RecordingHttp {
            requested: Mutex::new(Vec::new()),
            status: 200,
        };

        let err = fetch_launches(&http, file.path(), 5).await.unwrap_err();
        assert!(matches!(err, EtlError::IndexOutOfRange { index: 5, len: 2 }));
        assert!(http.requested.lock().unwrap().is_empty());
    }
}
