//! Client settings
//!
//! One settings document shared by every vendor client, loadable from YAML
//! or JSON. Everything has a default, so an empty document is valid.

use crate::engine::BackoffPolicy;
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::output::InsertOptions;
use crate::types::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Client Settings
// ============================================================================

/// Settings for the vendor clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Rate-limit retry configuration
    #[serde(default)]
    pub retry: RetrySettings,

    /// Client-side throttling
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Page size override; each endpoint has its own default otherwise
    #[serde(default)]
    pub page_size: Option<u32>,

    /// Rows per BigQuery `insertAll` request
    #[serde(default = "default_insert_chunk_size")]
    pub insert_chunk_size: usize,

    /// Base URL override (mock servers, proxies, sovereign clouds)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Level for `logging::init_default_subscriber`
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: None,
            retry: RetrySettings::default(),
            rate_limit: None,
            page_size: None,
            insert_chunk_size: default_insert_chunk_size(),
            base_url: None,
            log_level: LogLevel::default(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

fn default_insert_chunk_size() -> usize {
    500
}

impl ClientSettings {
    /// Parse settings from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file '{}'", path.display()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            _ => Err(Error::config(format!(
                "Unsupported settings file '{}': expected .json, .yaml or .yml",
                path.display()
            ))),
        }
    }

    /// Point every request at another base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Replace the retry settings
    #[must_use]
    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be greater than 0"));
        }
        if self.insert_chunk_size == 0 {
            return Err(Error::invalid_value(
                "insert_chunk_size",
                "must be greater than 0",
            ));
        }
        if self.page_size == Some(0) {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }
        if let Some(ref limit) = self.rate_limit {
            if limit.requests_per_second == 0 {
                return Err(Error::invalid_value(
                    "rate_limit.requests_per_second",
                    "must be greater than 0",
                ));
            }
        }
        self.retry.validate()
    }

    /// HTTP client config for a vendor whose default base URL is `default_base_url`
    pub fn http_config(&self, default_base_url: &str) -> HttpClientConfig {
        let base_url = self.base_url.as_deref().unwrap_or(default_base_url);
        let mut builder = HttpClientConfig::builder()
            .base_url(base_url)
            .timeout(Duration::from_secs(self.timeout_secs));

        if let Some(ref agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(ref limit) = self.rate_limit {
            builder = builder.rate_limit(limit.clone());
        }
        builder.build()
    }

    /// Backoff policy for the retrieval engine
    pub fn backoff_policy(&self) -> BackoffPolicy {
        self.retry.policy()
    }

    /// Insert options with the configured chunk size
    pub fn insert_options(&self) -> InsertOptions {
        InsertOptions::default().with_chunk_size(self.insert_chunk_size)
    }

    /// Install the default `tracing` subscriber at `log_level`.
    ///
    /// Returns `false` when a global subscriber was already set.
    pub fn init_logging(&self) -> bool {
        crate::logging::init_default_subscriber(self.log_level)
    }

    /// Configured page size, or the endpoint default
    pub fn page_size_or(&self, default: u32) -> u32 {
        self.page_size.unwrap_or(default)
    }
}

// ============================================================================
// Retry Settings
// ============================================================================

/// Backoff for HTTP 429 responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Retries allowed per page
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    /// Cap on the exponential delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    5
}

fn default_base_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

impl RetrySettings {
    fn validate(&self) -> Result<()> {
        if self.base_backoff_ms > self.max_backoff_ms {
            return Err(Error::invalid_value(
                "retry.base_backoff_ms",
                "must not exceed retry.max_backoff_ms",
            ));
        }
        Ok(())
    }

    /// Engine policy for these settings
    pub fn policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(self.max_retries).with_backoff(
            Duration::from_millis(self.base_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
        )
    }
}
