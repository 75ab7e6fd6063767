use crate::constants::*;
use crate::error::{EtlError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Run configuration. Every field has a default, so an absent or partial
/// `config.toml` is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub api: ApiConfig,
    pub filter: FilterConfig,
    pub finalize: FinalizeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub urls: PathBuf,
    pub raw_csv: PathBuf,
    pub processed_csv: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Which line of the URL list holds the launch listing
    pub listing_index: usize,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub cutoff_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FinalizeConfig {
    pub legacy_booster: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            urls: PathBuf::from(DEFAULT_URLS_PATH),
            raw_csv: PathBuf::from(DEFAULT_RAW_CSV_PATH),
            processed_csv: PathBuf::from(DEFAULT_PROCESSED_CSV_PATH),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            listing_index: 0,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cutoff_date: default_cutoff(),
        }
    }
}

impl Default for FinalizeConfig {
    fn default() -> Self {
        Self {
            legacy_booster: LEGACY_BOOSTER.to_string(),
        }
    }
}

fn default_cutoff() -> NaiveDate {
    DEFAULT_CUTOFF_DATE.parse().unwrap_or(NaiveDate::MIN)
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// URL of one auxiliary resource, e.g. `{base}/rockets/{id}`
    pub fn resource_url(&self, resource: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url.trim_end_matches('/'), resource, id)
    }
}

impl Config {
    /// Load from `path`, or from `config.toml` when it exists, falling back to
    /// defaults. `FALCON_ETL_API_BASE` overrides the API base either way.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                config.api.base_url = base.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(EtlError::Config("api.base_url must not be empty".into()));
        }
        if self.api.timeout_seconds == 0 {
            return Err(EtlError::Config(
                "api.timeout_seconds must be at least 1".into(),
            ));
        }
        if self.finalize.legacy_booster.trim().is_empty() {
            return Err(EtlError::Config(
                "finalize.legacy_booster must not be empty".into(),
            ));
        }
        Ok(())
    }
}
