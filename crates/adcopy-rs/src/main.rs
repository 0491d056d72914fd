//! `adcopy`: HTTP server that generates ad copy and keeps a generation log.

use adcopy_rs::config::ServiceConfig;
use anyhow::Context;
use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;

/// Command-line options for the server.
#[derive(Parser)]
#[command(name = "adcopy", version, about = "Ad copy generation service")]
struct Cli {
    /// Optional path to an adcopy.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Listen address, overriding config and ADCOPY_BIND
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    adcopy_rs::init_logging();

    let cli = Cli::parse();
    info!(
        "starting adcopy (config_set={}, bind_set={})",
        cli.config.is_some(),
        cli.bind.is_some()
    );

    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let (mut config, source) =
        ServiceConfig::discover(&cwd, cli.config.as_deref()).context("failed to load config")?;
    debug!(
        "config loaded (path={})",
        source
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<defaults>".to_string())
    );
    config
        .apply_env()
        .context("invalid configuration from environment")?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
        config.validate().context("invalid --bind address")?;
    }

    let state = adcopy_rs::build_state(&config)?;
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    adcopy_rs::server::serve(listener, state, shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal (error={})", err);
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
