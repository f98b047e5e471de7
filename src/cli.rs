//! CLI subcommand definitions and handlers.
//!
//! Uses clap derive to define the subcommand hierarchy:
//! - `start` (default) -- start the site server
//! - `config show|get|path` -- inspect configuration
//! - `version` -- print version info

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::config;

/// Lakefront site server.
#[derive(Parser, Debug)]
#[command(
    name = "lakefront",
    version = env!("CARGO_PKG_VERSION"),
    about = "lakefront — media-listing service and promotional page server"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the site server (default when no subcommand is given).
    Start,

    /// Inspect configuration values.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print version information.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the resolved configuration (secrets masked).
    Show,

    /// Print one config value by dotted key path (e.g. `server.port`).
    Get {
        /// Dotted key path into the config document.
        key: String,
    },

    /// Print the config file path.
    Path,
}

/// `config show` - print the defaults-applied config with secrets masked.
pub fn handle_config_show() -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = config::load_config()?;
    mask_secrets(&mut cfg);
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    Ok(())
}

/// `config get <key>` - print one value by dotted key path.
pub fn handle_config_get(key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load_config()?;
    match lookup_path(&cfg, key) {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        }
        None => Err(format!("config key not found: {}", key).into()),
    }
}

/// `config path` - print the resolved config file location.
pub fn handle_config_path() {
    println!("{}", config::get_config_path().display());
}

pub fn handle_version() {
    println!("lakefront {}", env!("CARGO_PKG_VERSION"));
}

/// Walk a dotted key path through nested objects.
fn lookup_path<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in key.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Replace credential-bearing string fields before printing.
fn mask_secrets(value: &mut Value) {
    if let Some(token) = value
        .get_mut("blob")
        .and_then(|b| b.get_mut("token"))
        .filter(|t| t.is_string())
    {
        *token = Value::String("[REDACTED]".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_walks_dotted_paths() {
        let cfg = json!({ "server": { "port": 8787 } });
        assert_eq!(lookup_path(&cfg, "server.port"), Some(&json!(8787)));
        assert_eq!(lookup_path(&cfg, "server.missing"), None);
        assert_eq!(lookup_path(&cfg, "server.port.deeper"), None);
    }

    #[test]
    fn show_masks_the_blob_token() {
        let mut cfg = json!({ "blob": { "token": "tkn_secret", "baseUrl": "https://b" } });
        mask_secrets(&mut cfg);
        assert_eq!(cfg["blob"]["token"], "[REDACTED]");
        assert_eq!(cfg["blob"]["baseUrl"], "https://b");
    }

    #[test]
    fn mask_tolerates_missing_token() {
        let mut cfg = json!({ "blob": {} });
        mask_secrets(&mut cfg);
        assert!(cfg["blob"].get("token").is_none());
    }
}
