//! Logging subsystem
//!
//! Structured logging via tracing with support for JSON (production) and
//! plaintext (development) output formats. All output passes through the
//! redacting writer in [`redact`] so the blob credential never reaches the
//! operational log.
//!
//! # Log Targets
//!
//! Use these consistent target names across the codebase:
//! - `http` - HTTP server
//! - `blobstore` - blob store listing
//! - `site` - page rendering
//! - `config` - configuration loading
//!
//! # Environment Variables
//!
//! - `LAKEFRONT_LOG` - Primary log level/filter (takes precedence)
//! - `RUST_LOG` - Fallback log level/filter

pub mod redact;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::logging::redact::RedactingMakeWriter;
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Guard to track if logging has been initialized
static INIT_GUARD: OnceLock<()> = OnceLock::new();

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON format for production (structured logs)
    Json,
    /// Human-readable plaintext for development
    #[default]
    Plaintext,
}

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogOutput {
    /// Write to stdout
    #[default]
    Stdout,
    /// Write to stderr
    Stderr,
    /// Write to a file at the given path
    File(PathBuf),
}

/// Configuration for the logging subsystem
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output format (JSON or plaintext)
    pub format: LogFormat,
    /// Output destination (stdout, stderr, or file)
    pub output: LogOutput,
    /// Default log level when no env filter is set
    pub default_level: Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Plaintext,
            output: LogOutput::Stdout,
            default_level: Level::INFO,
        }
    }
}

impl LogConfig {
    /// Create a development configuration (plaintext to stdout, debug level)
    pub fn development() -> Self {
        Self {
            format: LogFormat::Plaintext,
            output: LogOutput::Stdout,
            default_level: Level::DEBUG,
        }
    }

    /// Create a production configuration (JSON to stdout, info level)
    pub fn production() -> Self {
        Self {
            format: LogFormat::Json,
            output: LogOutput::Stdout,
            default_level: Level::INFO,
        }
    }

    /// Build a configuration from the `logging` section of the loaded config.
    ///
    /// `format: "json"` starts from the production preset; anything else from
    /// the plaintext default. `output` accepts `stdout`, `stderr`, or a file
    /// path. Unknown format or level strings fall back to the defaults.
    pub fn from_config(cfg: &Value) -> Self {
        let logging = cfg.get("logging").and_then(|v| v.as_object());

        let mut config = match logging.and_then(|l| l.get("format")).and_then(|v| v.as_str()) {
            Some("json") => Self::production(),
            _ => Self::default(),
        };

        if let Some(level) = logging
            .and_then(|l| l.get("level"))
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<Level>().ok())
        {
            config.default_level = level;
        }

        config.output = match logging.and_then(|l| l.get("output")).and_then(|v| v.as_str()) {
            Some("stderr") => LogOutput::Stderr,
            Some("stdout") | Some("") | None => LogOutput::Stdout,
            Some(path) => LogOutput::File(PathBuf::from(path)),
        };

        config
    }
}

/// Error type for logging initialization
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to create log file: {0}")]
    FileCreation(#[from] io::Error),
    #[error("failed to parse log filter: {0}")]
    FilterParse(#[from] tracing_subscriber::filter::ParseError),
    #[error("logging already initialized")]
    AlreadyInitialized,
}

/// Build an EnvFilter from environment variables or default level.
///
/// Checks LAKEFRONT_LOG first, then RUST_LOG, falling back to the default
/// level.
fn build_env_filter(default_level: Level) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = std::env::var("LAKEFRONT_LOG") {
        return Ok(EnvFilter::try_new(filter)?);
    }
    if let Ok(filter) = std::env::var("RUST_LOG") {
        return Ok(EnvFilter::try_new(filter)?);
    }

    // Default filter with standard targets
    let default_filter = format!(
        "{level},http={level},blobstore={level},site={level},config={level}",
        level = default_level.as_str().to_lowercase()
    );
    Ok(EnvFilter::try_new(default_filter)?)
}

/// Initialize the logging subsystem with the given configuration.
///
/// This function should be called once at application startup. Subsequent
/// calls will return an error.
pub fn init_logging(config: LogConfig) -> Result<(), LoggingError> {
    // Prevent double initialization
    if INIT_GUARD.set(()).is_err() {
        return Err(LoggingError::AlreadyInitialized);
    }

    let filter = build_env_filter(config.default_level)?;

    // RFC 3339 timestamp format
    let timer = UtcTime::rfc_3339();

    match (&config.format, &config.output) {
        (LogFormat::Json, LogOutput::Stdout) => {
            let writer = RedactingMakeWriter::new(io::stdout);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_timer(timer)
                .with_target(true)
                .with_writer(writer)
                .with_filter(filter);

            tracing_subscriber::registry().with(layer).init();
        }
        (LogFormat::Json, LogOutput::Stderr) => {
            let writer = RedactingMakeWriter::new(io::stderr);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_timer(timer)
                .with_target(true)
                .with_writer(writer)
                .with_filter(filter);

            tracing_subscriber::registry().with(layer).init();
        }
        (LogFormat::Json, LogOutput::File(path)) => {
            let file = std::sync::Arc::new(File::create(path)?);
            let writer = RedactingMakeWriter::new(file);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_timer(timer)
                .with_target(true)
                .with_writer(writer)
                .with_filter(filter);

            tracing_subscriber::registry().with(layer).init();
        }
        (LogFormat::Plaintext, LogOutput::Stdout) => {
            let writer = RedactingMakeWriter::new(io::stdout);
            let layer = tracing_subscriber::fmt::layer()
                .with_timer(timer)
                .with_target(true)
                .with_writer(writer)
                .with_filter(filter);

            tracing_subscriber::registry().with(layer).init();
        }
        (LogFormat::Plaintext, LogOutput::Stderr) => {
            let writer = RedactingMakeWriter::new(io::stderr);
            let layer = tracing_subscriber::fmt::layer()
                .with_timer(timer)
                .with_target(true)
                .with_writer(writer)
                .with_filter(filter);

            tracing_subscriber::registry().with(layer).init();
        }
        (LogFormat::Plaintext, LogOutput::File(path)) => {
            let file = std::sync::Arc::new(File::create(path)?);
            let writer = RedactingMakeWriter::new(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_timer(timer)
                .with_target(true)
                .with_writer(writer)
                .with_filter(filter);

            tracing_subscriber::registry().with(layer).init();
        }
    }

    Ok(())
}
