//! Typed settings resolved from the raw config.
//!
//! [`Settings::from_config`] validates everything the server needs at process
//! start. Required values fail closed here: a missing blob read token aborts
//! startup instead of falling back to anything baked into the binary.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde_json::Value;

use crate::config::ConfigError;

/// Environment variable carrying the blob read token (takes precedence over
/// the config file).
pub const BLOB_TOKEN_ENV: &str = "LAKEFRONT_BLOB_TOKEN";

/// Validated blob store settings.
#[derive(Debug, Clone)]
pub struct BlobSettings {
    /// Bearer token for the list call.
    pub token: String,
    /// Base URL of the provider's list endpoint.
    pub base_url: String,
    /// Provider-side page cap for the list call.
    pub list_limit: u32,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Everything the server consumes from configuration, validated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_address: SocketAddr,
    pub blob: BlobSettings,
}

impl Settings {
    /// Resolve and validate settings from a defaults-applied config value.
    ///
    /// The blob token is resolved env-over-config; when neither source
    /// provides a non-empty value this returns
    /// [`ConfigError::MissingBlobToken`].
    pub fn from_config(cfg: &Value) -> Result<Self, ConfigError> {
        let env_token = std::env::var(BLOB_TOKEN_ENV).ok();
        Self::from_config_with_env(cfg, env_token)
    }

    fn from_config_with_env(cfg: &Value, env_token: Option<String>) -> Result<Self, ConfigError> {
        let server = cfg.get("server").and_then(|v| v.as_object());
        let blob = cfg.get("blob").and_then(|v| v.as_object());

        let port = match server.and_then(|s| s.get("port")) {
            None => 8787,
            Some(v) => parse_port(v)?,
        };

        let bind = server
            .and_then(|s| s.get("bind"))
            .and_then(|v| v.as_str())
            .unwrap_or("loopback");

        let ip = parse_bind_mode(bind)?;

        let token = resolve_blob_token(blob, env_token)?;

        let base_url = blob
            .and_then(|b| b.get("baseUrl"))
            .and_then(|v| v.as_str())
            .unwrap_or("https://blob.vercel-storage.com")
            .to_string();

        let list_limit = blob
            .and_then(|b| b.get("listLimit"))
            .and_then(|v| v.as_u64())
            .map(|n| n as u32)
            .unwrap_or(crate::blobstore::DEFAULT_LIST_LIMIT);

        let timeout_ms = blob
            .and_then(|b| b.get("timeoutMs"))
            .and_then(|v| v.as_u64())
            .unwrap_or(crate::blobstore::DEFAULT_LIST_TIMEOUT_MS);

        Ok(Settings {
            bind_address: SocketAddr::new(ip, port),
            blob: BlobSettings {
                token,
                base_url,
                list_limit,
                timeout_ms,
            },
        })
    }
}

/// Validate a configured port: an integer in 1..=65535, never silently
/// truncated or defaulted.
fn parse_port(value: &Value) -> Result<u16, ConfigError> {
    value
        .as_u64()
        .filter(|p| (1..=65535).contains(p))
        .map(|p| p as u16)
        .ok_or_else(|| ConfigError::InvalidPort {
            value: value.to_string(),
        })
}

/// Parse the bind mode: `loopback`, `all`, or an explicit IP address.
fn parse_bind_mode(bind: &str) -> Result<IpAddr, ConfigError> {
    match bind {
        "loopback" => Ok(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        "all" => Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        other => other
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidBindAddress {
                value: other.to_string(),
            }),
    }
}

/// Resolve the blob read token: environment first, then config.
/// Empty strings count as absent.
fn resolve_blob_token(
    blob: Option<&serde_json::Map<String, Value>>,
    env_token: Option<String>,
) -> Result<String, ConfigError> {
    let cfg_token = blob
        .and_then(|b| b.get("token"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    env_token
        .or(cfg_token)
        .filter(|t| !t.is_empty())
        .ok_or(ConfigError::MissingBlobToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults_applied(mut value: Value) -> Value {
        crate::config::defaults::apply_defaults(&mut value);
        value
    }

    #[test]
    fn missing_token_fails_closed() {
        let cfg = defaults_applied(json!({}));
        let err = Settings::from_config_with_env(&cfg, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBlobToken));
    }

    #[test]
    fn empty_token_fails_closed() {
        let cfg = defaults_applied(json!({ "blob": { "token": "" } }));
        let err = Settings::from_config_with_env(&cfg, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBlobToken));
    }

    #[test]
    fn env_token_takes_precedence_over_config() {
        let cfg = defaults_applied(json!({ "blob": { "token": "from-config" } }));
        let settings =
            Settings::from_config_with_env(&cfg, Some("from-env".to_string())).unwrap();
        assert_eq!(settings.blob.token, "from-env");
    }

    #[test]
    fn config_token_used_when_env_absent() {
        let cfg = defaults_applied(json!({ "blob": { "token": "from-config" } }));
        let settings = Settings::from_config_with_env(&cfg, None).unwrap();
        assert_eq!(settings.blob.token, "from-config");
    }

    #[test]
    fn defaults_flow_into_settings() {
        let cfg = defaults_applied(json!({ "blob": { "token": "tkn" } }));
        let settings = Settings::from_config_with_env(&cfg, None).unwrap();
        assert_eq!(settings.bind_address.to_string(), "127.0.0.1:8787");
        assert_eq!(settings.blob.base_url, "https://blob.vercel-storage.com");
        assert_eq!(settings.blob.list_limit, 1000);
        assert_eq!(settings.blob.timeout_ms, 10_000);
    }

    #[test]
    fn bind_all_and_explicit_ip() {
        let cfg = defaults_applied(json!({
            "server": { "bind": "all", "port": 80 },
            "blob": { "token": "tkn" }
        }));
        let settings = Settings::from_config_with_env(&cfg, None).unwrap();
        assert_eq!(settings.bind_address.to_string(), "0.0.0.0:80");

        let cfg = defaults_applied(json!({
            "server": { "bind": "192.168.7.3" },
            "blob": { "token": "tkn" }
        }));
        let settings = Settings::from_config_with_env(&cfg, None).unwrap();
        assert_eq!(settings.bind_address.ip().to_string(), "192.168.7.3");
    }

    #[test]
    fn out_of_range_port_is_an_error() {
        for port in [serde_json::json!(0), serde_json::json!(99999)] {
            let cfg = defaults_applied(json!({
                "server": { "port": port },
                "blob": { "token": "tkn" }
            }));
            let err = Settings::from_config_with_env(&cfg, None).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPort { .. }));
        }
    }

    #[test]
    fn non_numeric_port_is_an_error_not_a_fallback() {
        let cfg = defaults_applied(json!({
            "server": { "port": "9001" },
            "blob": { "token": "tkn" }
        }));
        let err = Settings::from_config_with_env(&cfg, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    }

    #[test]
    fn malformed_server_section_still_sees_the_token() {
        // The bad port is the reported problem; the token must not be lost
        // by defaults application along the way.
        let mut raw = json!({
            "server": { "port": "9001" },
            "blob": { "token": "tkn_real" }
        });
        crate::config::defaults::apply_defaults(&mut raw);
        assert_eq!(raw["blob"]["token"], "tkn_real");

        let err = Settings::from_config_with_env(&raw, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    }

    #[test]
    fn invalid_bind_mode_is_rejected() {
        let cfg = defaults_applied(json!({
            "server": { "bind": "everywhere" },
            "blob": { "token": "tkn" }
        }));
        let err = Settings::from_config_with_env(&cfg, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddress { .. }));
    }
}
