//! Configuration structures
//!
//! Every section has serde defaults, so a partial file (or none at all)
//! yields a usable configuration. [`BridgeConfig::validate`] rejects values
//! that would only fail later at request time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ACTIVE_DATASOURCE, DEFAULT_BASE_DELAY_MS, DEFAULT_BIND_ADDRESS, DEFAULT_LOG_FILTER,
    DEFAULT_MAX_DELAY_MS, DEFAULT_MAX_IN_MEMORY_SIZE, DEFAULT_MAX_RETRIES,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_USER_AGENT, DUMMY_BASE_URL, REQRES_BASE_URL,
    TYPICODE_BASE_URL,
};
use crate::errors::{ConfigResult, ConfigurationError};
use crate::types::DataSourceId;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub retry: RetrySettings,
    pub upstreams: UpstreamsConfig,
    pub logging: LoggingConfig,
}

/// Inbound RPC server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: DEFAULT_BIND_ADDRESS.to_string() }
    }
}

/// Outbound HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Data source served by the router, parsed case-insensitively
    pub active_datasource: String,
    /// Upper bound on a buffered response body, in bytes
    pub max_in_memory_size: usize,
    pub request_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            active_datasource: DEFAULT_ACTIVE_DATASOURCE.to_string(),
            max_in_memory_size: DEFAULT_MAX_IN_MEMORY_SIZE,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Retry budget and backoff for upstream calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl RetrySettings {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// Base URL of one upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }
}

/// Per-upstream settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamsConfig {
    pub typicode: UpstreamConfig,
    pub dummy: UpstreamConfig,
    pub reqres: UpstreamConfig,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            typicode: UpstreamConfig::new(TYPICODE_BASE_URL),
            dummy: UpstreamConfig::new(DUMMY_BASE_URL),
            reqres: UpstreamConfig::new(REQRES_BASE_URL),
        }
    }
}

impl UpstreamsConfig {
    pub fn get(&self, id: DataSourceId) -> &UpstreamConfig {
        match id {
            DataSourceId::Typicode => &self.typicode,
            DataSourceId::Dummy => &self.dummy,
            DataSourceId::Reqres => &self.reqres,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(ConfigurationError::Invalid(format!("unknown log format: {other}"))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Default filter directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: LogFormat::default(), filter: DEFAULT_LOG_FILTER.to_string() }
    }
}

impl BridgeConfig {
    /// Parsed active data source
    ///
    /// # Errors
    /// Returns `ConfigurationError::UnknownDataSource` for an unrecognised id.
    pub fn active_datasource(&self) -> ConfigResult<DataSourceId> {
        self.client.active_datasource.parse()
    }

    /// Check that every value is usable
    ///
    /// # Errors
    /// Returns the first problem found as a [`ConfigurationError`].
    pub fn validate(&self) -> ConfigResult<()> {
        self.active_datasource()?;

        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigurationError::Invalid("server.bind_address is empty".into()));
        }
        if self.client.max_in_memory_size == 0 {
            return Err(ConfigurationError::Invalid(
                "client.max_in_memory_size must be greater than 0".into(),
            ));
        }
        if self.client.request_timeout_ms == 0 {
            return Err(ConfigurationError::Invalid(
                "client.request_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigurationError::Invalid(
                "retry.base_delay_ms must not exceed retry.max_delay_ms".into(),
            ));
        }
        for id in DataSourceId::ALL {
            if self.upstreams.get(id).base_url.trim().is_empty() {
                return Err(ConfigurationError::Invalid(format!(
                    "upstreams.{}.base_url is empty",
                    id.as_str().to_ascii_lowercase()
                )));
            }
        }

        Ok(())
    }
}
