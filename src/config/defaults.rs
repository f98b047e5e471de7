//! Config defaults application
//!
//! Fills missing sections/fields of the raw JSON5-parsed config with
//! production-ready values so partial configs work correctly.
//!
//! Defaults are merged *under* the user's document: existing values always
//! win, whatever their type, and keys the defaults don't know about pass
//! through untouched. Malformed values stay in place for typed validation
//! to report, rather than being silently replaced here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blobstore::{DEFAULT_LIST_LIMIT, DEFAULT_LIST_TIMEOUT_MS};

/// Default HTTP port
const DEFAULT_PORT: u16 = 8787;

/// Default bind mode
const DEFAULT_BIND_MODE: &str = "loopback";

/// Default blob store list endpoint
const DEFAULT_BLOB_BASE_URL: &str = "https://blob.vercel-storage.com";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigWithDefaults {
    #[serde(default)]
    server: ServerDefaults,

    #[serde(default)]
    blob: BlobDefaults,

    #[serde(default)]
    logging: LoggingDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerDefaults {
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default = "default_bind_mode")]
    bind: String,
}

impl Default for ServerDefaults {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind_mode(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobDefaults {
    /// The read token has no default; startup validation fails closed when
    /// it is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,

    #[serde(default = "default_blob_base_url")]
    base_url: String,

    #[serde(default = "default_list_limit")]
    list_limit: u32,

    #[serde(default = "default_list_timeout_ms")]
    timeout_ms: u64,
}

impl Default for BlobDefaults {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_blob_base_url(),
            list_limit: default_list_limit(),
            timeout_ms: default_list_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoggingDefaults {
    #[serde(default = "default_log_format")]
    format: String,

    #[serde(default = "default_log_level")]
    level: String,

    #[serde(default = "default_log_output")]
    output: String,
}

impl Default for LoggingDefaults {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            level: default_log_level(),
            output: default_log_output(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind_mode() -> String {
    DEFAULT_BIND_MODE.to_string()
}

fn default_blob_base_url() -> String {
    DEFAULT_BLOB_BASE_URL.to_string()
}

fn default_list_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

fn default_list_timeout_ms() -> u64 {
    DEFAULT_LIST_TIMEOUT_MS
}

fn default_log_format() -> String {
    "plaintext".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stdout".to_string()
}

/// Fill in missing sections/fields with defaults.
///
/// User values always win, even malformed ones (typed validation reports
/// those); keys the defaults don't know about pass through unchanged.
pub fn apply_defaults(value: &mut Value) {
    let defaults = match serde_json::to_value(ConfigWithDefaults::default()) {
        Ok(v) => v,
        Err(_) => return,
    };
    merge_defaults(value, &defaults);
}

/// Recursively insert entries from `defaults` that `value` lacks.
fn merge_defaults(value: &mut Value, defaults: &Value) {
    if let (Value::Object(obj), Value::Object(default_obj)) = (value, defaults) {
        for (key, default_value) in default_obj {
            match obj.get_mut(key) {
                Some(existing) => merge_defaults(existing, default_value),
                None => {
                    obj.insert(key.clone(), default_value.clone());
                }
            }
        }
    }
}
