//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Start from a config file: the path in `PEOPLE_BRIDGE_CONFIG`, or the
//!    first file found by [`probe_config_paths`], or built-in defaults
//! 2. Apply `PEOPLE_BRIDGE_*` environment variables on top
//! 3. Validate the result
//!
//! ## Environment Variables
//! - `PEOPLE_BRIDGE_CONFIG`: Config file path (JSON or TOML)
//! - `PEOPLE_BRIDGE_BIND_ADDRESS`: RPC listen address
//! - `PEOPLE_BRIDGE_ACTIVE_DATASOURCE`: `TYPICODE`, `DUMMY` or `REQRES`
//! - `PEOPLE_BRIDGE_MAX_IN_MEMORY_SIZE`: Response body limit in bytes
//! - `PEOPLE_BRIDGE_REQUEST_TIMEOUT_MS`: Per-attempt timeout
//! - `PEOPLE_BRIDGE_USER_AGENT`: Outbound `User-Agent`
//! - `PEOPLE_BRIDGE_MAX_RETRIES`: Retries after the first attempt
//! - `PEOPLE_BRIDGE_BASE_DELAY_MS`: First backoff delay
//! - `PEOPLE_BRIDGE_MAX_DELAY_MS`: Backoff cap
//! - `PEOPLE_BRIDGE_TYPICODE_URL`, `PEOPLE_BRIDGE_DUMMY_URL`,
//!   `PEOPLE_BRIDGE_REQRES_URL`: Upstream base URLs
//! - `PEOPLE_BRIDGE_LOG_FORMAT`: `json` or `pretty`
//! - `PEOPLE_BRIDGE_LOG_FILTER`: Default filter when `RUST_LOG` is unset
//!
//! ## File Locations
//! Probed in order, relative to the working directory and then to the
//! executable: `config/peoplebridge.{toml,json}`, `peoplebridge.{toml,json}`,
//! `../config/peoplebridge.{toml,json}`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use peoplebridge_domain::constants::ENV_PREFIX;
use peoplebridge_domain::{BridgeConfig, ConfigResult, ConfigurationError, LogFormat};

const CONFIG_FILE_NAMES: [&str; 2] = ["peoplebridge.toml", "peoplebridge.json"];

/// Load configuration from file (if any) and the process environment
///
/// # Errors
/// Returns `ConfigurationError::Invalid` if the file cannot be read or
/// parsed, an environment value is malformed, or validation fails.
pub fn load() -> ConfigResult<BridgeConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration using `lookup` in place of the process environment
///
/// # Errors
/// See [`load`].
pub fn load_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<BridgeConfig> {
    let base = match config_source(&lookup) {
        Some(path) => read_config_file(&path)?,
        None => {
            tracing::debug!("No config file found, using defaults");
            BridgeConfig::default()
        }
    };

    let config = apply_overrides(base, &lookup)?;
    config.validate()?;
    Ok(config)
}

/// Config file [`load_from_lookup`] reads: the `PEOPLE_BRIDGE_CONFIG` path
/// when set and non-blank, else the first probed location
pub fn config_source(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup(&env_key("CONFIG"))
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
        .or_else(probe_config_paths)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `ConfigurationError::Invalid` if no file is found, it cannot be
/// parsed, or validation fails.
pub fn load_from_file(path: Option<PathBuf>) -> ConfigResult<BridgeConfig> {
    let config_path = match path {
        Some(path) => path,
        None => probe_config_paths().ok_or_else(|| {
            ConfigurationError::Invalid(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    let config = read_config_file(&config_path)?;
    config.validate()?;
    Ok(config)
}

/// Apply `PEOPLE_BRIDGE_*` values returned by `lookup` on top of `config`
///
/// Unset and blank values leave the existing setting untouched.
///
/// # Errors
/// Returns `ConfigurationError::Invalid` naming the variable whose value
/// does not parse.
pub fn apply_overrides(
    mut config: BridgeConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigResult<BridgeConfig> {
    let get = |name: &str| {
        lookup(&env_key(name)).map(|value| value.trim().to_string()).filter(|v| !v.is_empty())
    };

    if let Some(value) = get("BIND_ADDRESS") {
        config.server.bind_address = value;
    }
    if let Some(value) = get("ACTIVE_DATASOURCE") {
        config.client.active_datasource = value;
    }
    if let Some(value) = get("MAX_IN_MEMORY_SIZE") {
        config.client.max_in_memory_size = parse_value("MAX_IN_MEMORY_SIZE", &value)?;
    }
    if let Some(value) = get("REQUEST_TIMEOUT_MS") {
        config.client.request_timeout_ms = parse_value("REQUEST_TIMEOUT_MS", &value)?;
    }
    if let Some(value) = get("USER_AGENT") {
        config.client.user_agent = value;
    }
    if let Some(value) = get("MAX_RETRIES") {
        config.retry.max_retries = parse_value("MAX_RETRIES", &value)?;
    }
    if let Some(value) = get("BASE_DELAY_MS") {
        config.retry.base_delay_ms = parse_value("BASE_DELAY_MS", &value)?;
    }
    if let Some(value) = get("MAX_DELAY_MS") {
        config.retry.max_delay_ms = parse_value("MAX_DELAY_MS", &value)?;
    }
    if let Some(value) = get("TYPICODE_URL") {
        config.upstreams.typicode.base_url = value;
    }
    if let Some(value) = get("DUMMY_URL") {
        config.upstreams.dummy.base_url = value;
    }
    if let Some(value) = get("REQRES_URL") {
        config.upstreams.reqres.base_url = value;
    }
    if let Some(value) = get("LOG_FORMAT") {
        config.logging.format = value.parse::<LogFormat>()?;
    }
    if let Some(value) = get("LOG_FILTER") {
        config.logging.filter = value;
    }

    Ok(config)
}

/// Probe the standard locations for a config file
///
/// # Returns
/// The first existing file, or `None`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| {
            [root.join("config"), root.clone(), root.join("../config")]
                .into_iter()
                .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        })
        .find(|path| path.is_file())
}

fn read_config_file(path: &Path) -> ConfigResult<BridgeConfig> {
    if !path.exists() {
        return Err(ConfigurationError::Invalid(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| ConfigurationError::Invalid(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, path)
}

/// Parse configuration, detecting the format by file extension
fn parse_config(contents: &str, path: &Path) -> ConfigResult<BridgeConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ConfigurationError::Invalid(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConfigurationError::Invalid(format!("Invalid JSON format: {e}"))),
        other => {
            Err(ConfigurationError::Invalid(format!("Unsupported config format: {other}")))
        }
    }
}

fn env_key(name: &str) -> String {
    format!("{ENV_PREFIX}{name}")
}

fn parse_value<T>(name: &str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| ConfigurationError::Invalid(format!("Invalid {}: {e}", env_key(name))))
}
