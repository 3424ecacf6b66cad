//! Configuration loader
//!
//! Loads bridge configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If a required variable is missing, falls back to a file
//! 3. An explicit path wins; otherwise multiple paths are probed
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `EINVOICE_GATEWAY_BASE_URL`: Gateway environment base URL
//! - `EINVOICE_GATEWAY_USERNAME`: Service account user name
//! - `EINVOICE_GATEWAY_PASSWORD`: Service account password
//! - `EINVOICE_STAGING_PATH`: Staging database path
//!
//! Optional:
//! - `EINVOICE_GATEWAY_TIMEOUT_SECS`: HTTP timeout in seconds
//! - `EINVOICE_TOKEN_REFRESH_MARGIN_SECS`: Token refresh margin in seconds
//! - `EINVOICE_STAGING_POOL_SIZE`: Connection pool size
//! - `EINVOICE_STAGING_CREATE_SCHEMA`: Create the bundled schema (true/false)
//! - `EINVOICE_POLL_INTERVAL_SECS`: Seconds between polling cycles
//! - `EINVOICE_STATUS_MESSAGE_LIMIT`: Stored failure message length
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./einvoice.toml`, `./einvoice.json` (current working directory)
//! 2. `./config.toml`, `./config.json` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use einvoice_domain::constants::{
    DEFAULT_GATEWAY_TIMEOUT_SECS, DEFAULT_POLLING_INTERVAL_SECS, DEFAULT_STAGING_POOL_SIZE,
    DEFAULT_STATUS_MESSAGE_LIMIT, DEFAULT_TOKEN_REFRESH_MARGIN_SECS,
};
use einvoice_domain::{
    Config, EInvoiceError, GatewayConfig, Result, StagingConfig, WorkerConfig,
};

const CONFIG_FILE_NAMES: [&str; 4] = ["einvoice.toml", "einvoice.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variable is missing, falls back to `path`, or to the probed locations when
/// `path` is `None`.
///
/// # Errors
/// Returns `EInvoiceError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load_with_path(path: Option<PathBuf>) -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Environment configuration incomplete, trying file");
            load_from_file(path)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `EInvoiceError::Config` if required variables are missing or
/// optional ones have invalid values.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("EINVOICE_GATEWAY_BASE_URL")?;
    let username = env_var("EINVOICE_GATEWAY_USERNAME")?;
    let password = env_var("EINVOICE_GATEWAY_PASSWORD")?;
    let staging_path = env_var("EINVOICE_STAGING_PATH")?;

    Ok(Config {
        gateway: GatewayConfig {
            base_url,
            username,
            password,
            timeout_secs: env_parse("EINVOICE_GATEWAY_TIMEOUT_SECS", DEFAULT_GATEWAY_TIMEOUT_SECS)?,
            token_refresh_margin_secs: env_parse(
                "EINVOICE_TOKEN_REFRESH_MARGIN_SECS",
                DEFAULT_TOKEN_REFRESH_MARGIN_SECS,
            )?,
        },
        staging: StagingConfig {
            path: staging_path,
            pool_size: env_parse("EINVOICE_STAGING_POOL_SIZE", DEFAULT_STAGING_POOL_SIZE)?,
            create_schema: env_bool("EINVOICE_STAGING_CREATE_SCHEMA", false),
        },
        worker: WorkerConfig {
            polling_interval_secs: env_parse(
                "EINVOICE_POLL_INTERVAL_SECS",
                DEFAULT_POLLING_INTERVAL_SECS,
            )?,
            status_message_limit: env_parse(
                "EINVOICE_STATUS_MESSAGE_LIMIT",
                DEFAULT_STATUS_MESSAGE_LIMIT,
            )?,
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// file extension.
///
/// # Errors
/// Returns `EInvoiceError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(EInvoiceError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            EInvoiceError::Config(
                "No config file found and required EINVOICE_* environment variables are missing"
                    .to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| EInvoiceError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| EInvoiceError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| EInvoiceError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(EInvoiceError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| cwd.join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get a required, non-empty environment variable.
fn env_var(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(EInvoiceError::Config(format!("Missing required environment variable: {}", key))),
    }
}

/// Parse an optional environment variable, falling back to `default`.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| EInvoiceError::Config(format!("Invalid value for {}: {}", key, e))),
        _ => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
