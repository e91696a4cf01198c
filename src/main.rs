use std::path::PathBuf;

use burrow::config::Config;
use burrow::server;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "burrow", version, about = "HTTP/1.1 file server on raw TCP")]
struct Cli {
    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage directory; resources live in its `files/` subdirectory
    #[arg(long)]
    directory: Option<PathBuf>,

    /// Port to listen on (all interfaces)
    #[arg(long)]
    port: Option<u16>,

    /// Disable cookie sessions and security headers
    #[arg(long)]
    no_sessions: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut cfg = Config::load(self.config.as_deref())?;
        if let Some(directory) = self.directory {
            cfg.storage.directory = directory;
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if self.no_sessions {
            cfg.session.enabled = false;
        }
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Cli::parse().into_config()?;

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
