//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GATEWAY_TIMEOUT_SECS, DEFAULT_POLLING_INTERVAL_SECS, DEFAULT_STAGING_POOL_SIZE,
    DEFAULT_STATUS_MESSAGE_LIMIT, DEFAULT_TOKEN_REFRESH_MARGIN_SECS,
};
use crate::errors::{EInvoiceError, Result};

/// Bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub staging: StagingConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
}

/// E-invoicing gateway configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub base_url: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_refresh_margin_secs")]
    pub token_refresh_margin_secs: u64,
}

// Manual Debug so the password never reaches a log line.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("token_refresh_margin_secs", &self.token_refresh_margin_secs)
            .finish()
    }
}

impl GatewayConfig {
    /// Base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refresh_margin(&self) -> Duration {
        Duration::from_secs(self.token_refresh_margin_secs)
    }
}

/// Staging store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default)]
    pub create_schema: bool,
}

/// Polling worker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    #[serde(default = "default_polling_interval_secs")]
    pub polling_interval_secs: u64,
    #[serde(default = "default_status_message_limit")]
    pub status_message_limit: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            polling_interval_secs: DEFAULT_POLLING_INTERVAL_SECS,
            status_message_limit: DEFAULT_STATUS_MESSAGE_LIMIT,
        }
    }
}

impl WorkerConfig {
    /// Interval between cycles; zero falls back to the default.
    pub fn polling_interval(&self) -> Duration {
        let secs = if self.polling_interval_secs == 0 {
            DEFAULT_POLLING_INTERVAL_SECS
        } else {
            self.polling_interval_secs
        };
        Duration::from_secs(secs)
    }
}

impl Config {
    /// Reject configurations the worker cannot start with.
    ///
    /// # Errors
    /// Returns `EInvoiceError::Config` naming the first missing setting.
    pub fn validate(&self) -> Result<()> {
        if self.gateway.base_url.trim().is_empty() {
            return Err(EInvoiceError::Config("gateway.base_url must not be empty".into()));
        }
        if !self.gateway.base_url.starts_with("http://")
            && !self.gateway.base_url.starts_with("https://")
        {
            return Err(EInvoiceError::Config(format!(
                "gateway.base_url must be an http(s) URL, got '{}'",
                self.gateway.base_url
            )));
        }
        if self.gateway.username.trim().is_empty() || self.gateway.password.is_empty() {
            return Err(EInvoiceError::Config("gateway credentials must not be empty".into()));
        }
        if self.staging.path.trim().is_empty() {
            return Err(EInvoiceError::Config("staging.path must not be empty".into()));
        }
        if self.staging.pool_size == 0 {
            return Err(EInvoiceError::Config("staging.pool_size must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_GATEWAY_TIMEOUT_SECS
}

fn default_refresh_margin_secs() -> u64 {
    DEFAULT_TOKEN_REFRESH_MARGIN_SECS
}

fn default_pool_size() -> u32 {
    DEFAULT_STAGING_POOL_SIZE
}

fn default_polling_interval_secs() -> u64 {
    DEFAULT_POLLING_INTERVAL_SECS
}

fn default_status_message_limit() -> usize {
    DEFAULT_STATUS_MESSAGE_LIMIT
}
