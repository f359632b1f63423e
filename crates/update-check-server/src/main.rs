//! # Update Check Server
//!
//! Binary entry point: parses arguments, sets up logging and serves.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use update_check_server::{run_server, AppState};
use update_check_store::GitAncestry;

/// Tells client builds whether they are up to date.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "UPDATE_CHECK_BIND", default_value = "0.0.0.0:5000")]
    bind: SocketAddr,

    /// Configuration file, relative to the working directory
    #[arg(long, env = "UPDATE_CHECK_CONFIG", default_value = "config.yml")]
    config: PathBuf,

    /// Git working tree holding `latest_release` (defaults to the
    /// configuration file's directory)
    #[arg(long, env = "UPDATE_CHECK_REPO")]
    repo: Option<PathBuf>,
}

fn repo_dir(args: &Args) -> PathBuf {
    if let Some(repo) = &args.repo {
        return repo.clone();
    }

    match args.config.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Update check server starting...");

    let resolver = GitAncestry::new(repo_dir(&args));
    let state = AppState::from_config(&args.config, &resolver)
        .await
        .with_context(|| format!("failed to start from {}", args.config.display()))?;

    run_server(args.bind, state).await
}
