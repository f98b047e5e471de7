//! Configuration parsing module
//!
//! Handles the JSON5 configuration file with environment variable
//! substitution, defaults, and a short-TTL cache. Typed validation of the
//! sections the server consumes lives in [`schema`].

pub mod defaults;
pub mod schema;

use parking_lot::RwLock;
use regex::Regex;
use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use thiserror::Error;

pub use schema::{BlobSettings, Settings};

/// Default config cache TTL in milliseconds
const DEFAULT_CACHE_TTL_MS: u64 = 200;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse JSON5 at {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to read config file {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Missing environment variable: {var}")]
    MissingEnvVar { var: String },

    #[error(
        "Blob read token is not configured; set LAKEFRONT_BLOB_TOKEN or the blob.token config key"
    )]
    MissingBlobToken,

    #[error("Invalid bind address '{value}'; expected loopback, all, or an IP address")]
    InvalidBindAddress { value: String },

    #[error("Invalid server port {value}; expected an integer in 1..=65535")]
    InvalidPort { value: String },
}

/// Cached configuration entry
struct CachedConfig {
    value: Value,
    loaded_at: Instant,
}

/// Global config cache
static CONFIG_CACHE: LazyLock<RwLock<Option<CachedConfig>>> = LazyLock::new(|| RwLock::new(None));

/// Get the config file path.
/// Priority: LAKEFRONT_CONFIG_PATH > LAKEFRONT_STATE_DIR/lakefront.json5 >
/// ~/.lakefront/lakefront.json5
/// Falls back to .json extension if the .json5 file doesn't exist.
pub fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("LAKEFRONT_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    if let Ok(state_dir) = env::var("LAKEFRONT_STATE_DIR") {
        let dir = PathBuf::from(state_dir);
        let json5 = dir.join("lakefront.json5");
        if json5.exists() {
            return json5;
        }
        return dir.join("lakefront.json");
    }

    let base = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lakefront");
    let json5 = base.join("lakefront.json5");
    if json5.exists() {
        return json5;
    }
    base.join("lakefront.json")
}

/// Get the cache TTL duration
fn get_cache_ttl() -> Option<Duration> {
    // Check if caching is disabled
    if env::var("LAKEFRONT_DISABLE_CONFIG_CACHE").is_ok() {
        return None;
    }

    let ms = env::var("LAKEFRONT_CONFIG_CACHE_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_CACHE_TTL_MS);

    Some(Duration::from_millis(ms))
}

/// Load and parse the configuration file with caching.
/// Returns empty object `{}` (with defaults applied) if the file doesn't
/// exist.
pub fn load_config() -> Result<Value, ConfigError> {
    let path = get_config_path();

    // Check cache first
    if let Some(ttl) = get_cache_ttl() {
        let cache = CONFIG_CACHE.read();
        if let Some(cached) = cache.as_ref() {
            if cached.loaded_at.elapsed() < ttl {
                return Ok(cached.value.clone());
            }
        }
    }

    // Load fresh config
    let config = load_config_uncached(&path)?;

    // Update cache if caching is enabled
    if get_cache_ttl().is_some() {
        let mut cache = CONFIG_CACHE.write();
        *cache = Some(CachedConfig {
            value: config.clone(),
            loaded_at: Instant::now(),
        });
    }

    Ok(config)
}

/// Load config without using the cache.
///
/// After parsing and env var substitution, this applies config defaults so
/// that missing sections/fields have production-ready values.
pub fn load_config_uncached(path: &Path) -> Result<Value, ConfigError> {
    // Return empty object with defaults if file doesn't exist
    if !path.exists() {
        let mut empty = Value::Object(serde_json::Map::new());
        defaults::apply_defaults(&mut empty);
        return Ok(empty);
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut value = parse_json5(&content, path)?;

    // Apply environment variable substitution
    substitute_env_vars(&mut value)?;

    // Fill in missing sections/fields with production-ready values
    defaults::apply_defaults(&mut value);

    Ok(value)
}

/// Parse JSON5 content
fn parse_json5(content: &str, path: &Path) -> Result<Value, ConfigError> {
    json5::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Substitute environment variables in string values.
/// Pattern: ${VAR} where VAR matches [A-Z_][A-Z0-9_]*
/// Escape with $${VAR} to get literal ${VAR}
fn substitute_env_vars(value: &mut Value) -> Result<(), ConfigError> {
    match value {
        Value::String(s) => {
            *s = substitute_env_in_string(s)?;
        }
        Value::Object(obj) => {
            for (_, v) in obj.iter_mut() {
                substitute_env_vars(v)?;
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                substitute_env_vars(item)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Substitute environment variables in a single string
fn substitute_env_in_string(s: &str) -> Result<String, ConfigError> {
    static ENV_VAR_PATTERN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\$\$?\{([A-Z_][A-Z0-9_]*)\}").unwrap());

    let mut result = String::with_capacity(s.len());
    let mut last_end = 0;

    for caps in ENV_VAR_PATTERN.captures_iter(s) {
        let full_match = caps.get(0).unwrap();
        let var_name = caps.get(1).unwrap().as_str();

        // Add text before this match
        result.push_str(&s[last_end..full_match.start()]);

        // Check if this is an escaped pattern ($${ instead of ${)
        let match_str = full_match.as_str();
        if match_str.starts_with("$$") {
            // Escaped - output literal ${VAR}
            result.push_str(&format!("${{{}}}", var_name));
        } else {
            let value = env::var(var_name).map_err(|_| ConfigError::MissingEnvVar {
                var: var_name.to_string(),
            })?;
            result.push_str(&value);
        }

        last_end = full_match.end();
    }

    result.push_str(&s[last_end..]);

    Ok(result)
}

/// Clear the config cache (useful for testing or forced reload)
pub fn clear_cache() {
    let mut cache = CONFIG_CACHE.write();
    *cache = None;
}
