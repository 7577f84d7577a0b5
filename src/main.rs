use std::path::PathBuf;

use clap::Parser;
use portico::Gateway;
use portico::config::{Config, LISTEN_ENV};
use tracing_subscriber::EnvFilter;

/// Single-connection HTTP gateway.
#[derive(Parser, Debug)]
#[command(name = "portico", version)]
struct Cli {
    /// Application reference as module:callable (e.g. hello:app)
    app: String,

    /// YAML configuration file
    #[arg(long, env = "PORTICO_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, host:port (":8888" for all interfaces)
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let listen = cli.listen.or_else(|| std::env::var(LISTEN_ENV).ok());
    let cfg = Config::load_from(cli.config.as_deref(), listen)?;

    let app = portico::app::resolve(&cli.app, &cfg)?;
    let gateway = Gateway::bind(&cfg.server, app).await?;

    tracing::info!(
        port = gateway.identity().port,
        "Serving HTTP on port {} ...",
        gateway.identity().port
    );

    tokio::select! {
        _ = gateway.serve_forever() => {}

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
