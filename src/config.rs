//! Configuration for listing-sweep
//!
//! The whole tool is described by one YAML document. Every section is
//! optional; an empty document points at the default upstream.
//!
//! ```yaml
//! source:
//!   base_url: "https://the-florida-bar-backend.vercel.app"
//!   path: "/api/scrape"
//!   page_param: page
//!   timeout_secs: 30
//! rate_limit:
//!   requests_per_second: 5
//! aggregation:
//!   max_pages: 500
//! export:
//!   format: parquet
//!   destination: ./exports
//!   compression: zstd
//! ```

use crate::engine::{AggregatorConfig, FetchContext};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::output::{ExportFormat, ParquetCompression, ParquetWriterConfig};
use crate::source::{DEFAULT_PAGE_PARAM, DEFAULT_PATH};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Upstream used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://the-florida-bar-backend.vercel.app";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Upstream endpoint
    #[serde(default)]
    pub source: SourceConfig,

    /// Request throttling (disabled when absent)
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Aggregation loop settings
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Export sink settings
    #[serde(default)]
    pub export: ExportConfig,
}

// ============================================================================
// Sections
// ============================================================================

/// Upstream endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the upstream
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the listings endpoint
    #[serde(default = "default_path")]
    pub path: String,

    /// Query parameter carrying the page index
    #[serde(default = "default_page_param")]
    pub page_param: String,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

fn default_page_param() -> String {
    DEFAULT_PAGE_PARAM.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_path(),
            page_param: default_page_param(),
            headers: HashMap::new(),
            user_agent: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Aggregation loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Stop after this many pages (unbounded when absent)
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// First page of each run
    #[serde(default = "default_start_page")]
    pub start_page: u32,
}

fn default_start_page() -> u32 {
    1
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            start_page: default_start_page(),
        }
    }
}

/// Export sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// File format
    #[serde(default)]
    pub format: ExportFormat,

    /// Local directory or cloud URL
    #[serde(default = "default_destination")]
    pub destination: String,

    /// File name (defaults to `AllListingsData.<ext>`)
    #[serde(default)]
    pub file_name: Option<String>,

    /// Parquet compression codec
    #[serde(default)]
    pub compression: ParquetCompression,

    /// Parquet dictionary encoding
    #[serde(default = "default_dictionary")]
    pub dictionary: bool,
}

fn default_dictionary() -> bool {
    true
}

fn default_destination() -> String {
    ".".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            destination: default_destination(),
            file_name: None,
            compression: ParquetCompression::default(),
            dictionary: default_dictionary(),
        }
    }
}

// ============================================================================
// Loading and Validation
// ============================================================================

/// Load configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<SweepConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;
    load_config_from_str(&content)
}

/// Load configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<SweepConfig> {
    let config: SweepConfig = if yaml.trim().is_empty() {
        SweepConfig::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    config.validate()?;
    Ok(config)
}

impl SweepConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.source.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "source.base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.source.page_param.trim().is_empty() {
            return Err(Error::config("source.page_param cannot be empty"));
        }

        if self.source.timeout_secs == 0 {
            return Err(Error::config("source.timeout_secs must be positive"));
        }

        if self.aggregation.start_page == 0 {
            return Err(Error::config("aggregation.start_page must be at least 1"));
        }

        if self.aggregation.max_pages == Some(0) {
            return Err(Error::config("aggregation.max_pages must be at least 1"));
        }

        if let Some(rate_limit) = &self.rate_limit {
            if rate_limit.requests_per_second == 0 {
                return Err(Error::config(
                    "rate_limit.requests_per_second must be positive",
                ));
            }
        }

        if self.export.destination.trim().is_empty() {
            return Err(Error::config("export.destination cannot be empty"));
        }

        Ok(())
    }

    /// HTTP client settings for the page client
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.source.base_url)
            .timeout(Duration::from_secs(self.source.timeout_secs));

        for (key, value) in &self.source.headers {
            builder = builder.header(key, value);
        }
        if let Some(agent) = &self.source.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(rate_limit) = &self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        builder.build()
    }

    /// Aggregator settings
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            max_pages: self.aggregation.max_pages,
        }
    }

    /// Parquet encoding settings for exports
    pub fn parquet_config(&self) -> ParquetWriterConfig {
        ParquetWriterConfig::new()
            .with_compression(self.export.compression)
            .with_dictionary(self.export.dictionary)
    }

    /// Context for the first run
    pub fn fetch_context(&self) -> FetchContext {
        FetchContext::starting_at(self.aggregation.start_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, SweepConfig::default());
        assert_eq!(config.source.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.source.path, "/api/scrape");
        assert_eq!(config.source.page_param, "page");
        assert_eq!(config.aggregation.start_page, 1);
        assert!(config.rate_limit.is_none());
        assert_eq!(config.export.format, ExportFormat::Csv);
        assert_eq!(config.parquet_config(), ParquetWriterConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
source:
  base_url: "http://localhost:9000"
  path: "/v1/listings"
  page_param: p
  timeout_secs: 5
  user_agent: "sweeper/1.0"
  headers:
    X-Api-Key: secret
rate_limit:
  requests_per_second: 2
aggregation:
  max_pages: 100
  start_page: 3
export:
  format: parquet
  destination: "s3://bucket/listings"
  file_name: roster.parquet
  compression: zstd
  dictionary: false
"#;

        let config = load_config_from_str(yaml).unwrap();
        assert_eq!(config.source.path, "/v1/listings");
        assert_eq!(config.source.headers.get("X-Api-Key"), Some(&"secret".to_string()));
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 1)));
        assert_eq!(config.export.format, ExportFormat::Parquet);
        assert_eq!(config.export.file_name.as_deref(), Some("roster.parquet"));
        assert_eq!(
            config.parquet_config(),
            ParquetWriterConfig::new()
                .with_compression(ParquetCompression::Zstd)
                .with_dictionary(false)
        );

        let http = config.http_client_config();
        assert_eq!(http.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(http.timeout, Duration::from_secs(5));
        assert_eq!(http.user_agent, "sweeper/1.0");
        assert!(http.rate_limit.is_some());

        assert_eq!(config.aggregator_config().max_pages, Some(100));
        assert_eq!(config.fetch_context().start_page, 3);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = load_config_from_str("source:\n  base_url: \"not a url\"").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));

        let err = load_config_from_str("source:\n  base_url: \"ftp://example.com\"").unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(load_config_from_str("aggregation:\n  max_pages: 0").is_err());
        assert!(load_config_from_str("aggregation:\n  start_page: 0").is_err());
        assert!(load_config_from_str("source:\n  timeout_secs: 0").is_err());
        assert!(load_config_from_str("source:\n  page_param: \"\"").is_err());
        assert!(load_config_from_str("rate_limit:\n  requests_per_second: 0").is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = load_config_from_str("source: [unclosed").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
        assert!(err.to_string().contains("Failed to parse YAML"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/listing-sweep.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.yaml");
        fs::write(&path, "aggregation:\n  max_pages: 7\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.aggregation.max_pages, Some(7));
    }
}
