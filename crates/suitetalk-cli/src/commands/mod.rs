//! Subcommand implementations.

pub mod endpoint;
pub mod get;
pub mod search;
pub mod write;

use std::sync::Arc;

use anyhow::{Context, Result};
use suitetalk_core::{Config, SessionClient};
use suitetalk_file::FileCallLogger;
use suitetalk_http::HttpTransport;
use tracing::debug;

use crate::cli::{Commands, ConnectionArgs};

pub async fn handle(cmd: Commands, connection: &ConnectionArgs) -> Result<()> {
    let client = connect(connection).await?;

    match cmd {
        Commands::Endpoint(args) => endpoint::run(&client, args).await,
        Commands::Get(args) => get::run(&client, args).await,
        Commands::Add(args) => write::run(&client, write::Mode::Add, args).await,
        Commands::Update(args) => write::run(&client, write::Mode::Update, args).await,
        Commands::Upsert(args) => write::run(&client, write::Mode::Upsert, args).await,
        Commands::Delete(args) => get::delete(&client, args).await,
        Commands::Search(args) => search::run(&client, args).await,
    }
}

/// Build a client from the environment plus command-line overrides.
async fn connect(connection: &ConnectionArgs) -> Result<SessionClient> {
    let mut config = Config::from_env().context("Failed to read NETSUITE_* configuration")?;

    if let Some(host) = &connection.host {
        config.set_host(host).context("Invalid --host")?;
    }
    if let Some(endpoint) = &connection.endpoint {
        config
            .set_endpoint(endpoint.as_str())
            .context("Invalid --endpoint")?;
    }
    if let Some(dir) = &connection.log_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let mut logging = config.logging().clone();
        logging.enabled = true;
        logging.path = Some(dir.clone());
        config = config.with_logging(logging);
    }

    let transport = Arc::new(HttpTransport::new().context("Failed to create HTTP client")?);

    let client = match FileCallLogger::from_config(config.logging()) {
        Some(logger) => {
            debug!(dir = %logger.dir().display(), "Call logging configured");
            SessionClient::with_call_logger(config, transport, Arc::new(logger))
        }
        None => SessionClient::new(config, transport),
    };

    client.context("Failed to create client")
}
