// Main entrypoint for the polycache shell.

use anyhow::{Context, Result};
use clap::Parser;
use polycache::config::Config;
use polycache::shutdown::GracefulShutdown;
use polycache::{build_client, shell, Provider};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const CONFIG_PATH: &str = "cfg/polycache.cfg.yaml";
const CONFIG_PATH_LOCAL: &str = "cfg/polycache.cfg.local.yaml";

/// polycache - interactive shell over a multi-backend cache client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, value_name = "FILE")]
    cfg: Option<PathBuf>,

    /// Seconds to wait for background tasks on shutdown
    #[arg(long, default_value_t = 10)]
    shutdown_timeout: u64,
}

/// Loads the configuration from YAML.
/// Tries the local config first, then falls back to the default one.
fn load_cfg(path: Option<PathBuf>) -> Result<Config> {
    if let Some(custom_path) = path {
        return Config::load(&custom_path)
            .with_context(|| format!("failed to load custom config from {:?}", custom_path));
    }

    match Config::load(CONFIG_PATH_LOCAL) {
        Ok(cfg) => Ok(cfg),
        Err(_) => Config::load(CONFIG_PATH)
            .with_context(|| format!("failed to load config from {}", CONFIG_PATH)),
    }
}

/// Configures structured logging based on configuration.
/// Logs go to stderr so they never mix with shell replies.
fn configure_logger(cfg: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let log_level = cfg
        .logs()
        .and_then(|logs| logs.level.as_deref())
        .unwrap_or("info");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if cfg.is_prod() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = load_cfg(args.cfg)?;
    configure_logger(&cfg);
    info!(
        component = "main",
        event = "config_loaded",
        client = %cfg.client().name,
        providers = cfg.client().providers.len(),
        "config loaded"
    );

    let shutdown_token = CancellationToken::new();
    let graceful_shutdown = GracefulShutdown::new(
        shutdown_token.clone(),
        Duration::from_secs(args.shutdown_timeout),
    );

    let client = build_client(&shutdown_token, cfg.client())
        .context("failed to build cache client")?;
    let provider: Arc<dyn Provider> = client;

    graceful_shutdown.add(1);
    let shell_token = shutdown_token.clone();
    let shell_done = graceful_shutdown.clone();
    tokio::task::spawn(async move {
        let input = BufReader::new(tokio::io::stdin());
        if let Err(e) = shell::run(shell_token.clone(), provider, input, tokio::io::stdout()).await {
            error!(
                component = "main",
                scope = "shell",
                event = "shell_failed",
                error = %e,
                "shell stopped with an error"
            );
        }
        shell_done.done();
        // End of input ends the process.
        shell_token.cancel();
    });

    if let Err(e) = graceful_shutdown.await_shutdown().await {
        error!(
            component = "main",
            scope = "service",
            event = "graceful_shutdown_failed",
            error = %e,
            "failed to gracefully shut down"
        );
        return Err(e);
    }

    Ok(())
}
