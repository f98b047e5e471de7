use std::sync::Arc;

use clap::Parser;
use tracing::info;

use lakefront::blobstore::BlobClient;
use lakefront::cli::{self, Cli, Command, ConfigCommand};
use lakefront::config;
use lakefront::logging;
use lakefront::server::startup::{run_server_with_config, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        // No subcommand or explicit `start` both launch the server.
        None | Some(Command::Start) => run_server().await,

        Some(Command::Config(sub)) => {
            match sub {
                ConfigCommand::Show => cli::handle_config_show()?,
                ConfigCommand::Get { key } => cli::handle_config_get(&key)?,
                ConfigCommand::Path => cli::handle_config_path(),
            }
            Ok(())
        }

        Some(Command::Version) => {
            cli::handle_version();
            Ok(())
        }
    }
}

async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load_config()?;
    init_logging_from_config(&cfg)?;

    // Required configuration fails closed here: no token, no server.
    let settings = config::Settings::from_config(&cfg)?;

    let lister = Arc::new(BlobClient::new(&settings.blob)?);

    info!(
        target: "http",
        bind = %settings.bind_address,
        blob_base_url = %settings.blob.base_url,
        "starting lakefront server"
    );

    let handle = run_server_with_config(ServerConfig {
        lister,
        bind_address: settings.bind_address,
    })
    .await?;

    info!(target: "http", addr = %handle.local_addr(), "listening");

    tokio::signal::ctrl_c().await?;
    info!(target: "http", "shutdown signal received");
    handle.shutdown().await;

    info!(target: "http", "server shut down");
    Ok(())
}

/// Initialize logging from the `logging` config section, with LAKEFRONT_DEV
/// forcing the development preset.
fn init_logging_from_config(
    cfg: &serde_json::Value,
) -> Result<(), Box<dyn std::error::Error>> {
    let dev = std::env::var("LAKEFRONT_DEV")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false);

    let log_config = if dev {
        logging::LogConfig::development()
    } else {
        logging::LogConfig::from_config(cfg)
    };
    logging::init_logging(log_config)?;
    Ok(())
}
