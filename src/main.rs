//! Studyflow server binary

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use studyflow::api::{serve, AppState};
use studyflow::config::Config;
use studyflow::engine::Engine;

/// Study-planning engine behind a REST API
#[derive(Debug, Parser)]
#[command(name = "studyflow", version, about)]
struct Args {
    /// Address to bind, overriding the config file
    #[arg(long, env = "STUDYFLOW_BIND")]
    bind: Option<String>,

    /// Path to a TOML config file
    #[arg(long, env = "STUDYFLOW_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("studyflow=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());

    let state = AppState::new(Engine::new(config));
    serve(&bind, state).await
}
