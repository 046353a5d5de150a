//! Kshetra - Arena simulation bridge daemon
//!
//! ```bash
//! kshetra                           # kshetra.toml if present, else defaults
//! kshetra --config arena.toml
//! kshetra --bind 127.0.0.1:8081 --log-level debug
//! ```

use clap::Parser;
use kshetra::{AppConfig, Result, gateway};
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = "kshetra.toml";

#[derive(Parser, Debug)]
#[command(name = "kshetra")]
#[command(version, about = "Arena simulation bridge for a differential-drive robot")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address (e.g. 0.0.0.0:8081)
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

fn load_config(cli: &Cli) -> Result<(AppConfig, Option<PathBuf>)> {
    if let Some(path) = &cli.config {
        return Ok((AppConfig::load(path)?, Some(path.clone())));
    }

    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    if fallback.exists() {
        return Ok((AppConfig::load(fallback)?, Some(fallback.to_path_buf())));
    }

    Ok((AppConfig::default(), None))
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("kshetra={}", level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, source) = load_config(&cli)?;
    if let Some(bind) = &cli.bind {
        config.network.bind_address = bind.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    init_logging(&config.logging.level);

    info!("Kshetra v{} starting...", env!("CARGO_PKG_VERSION"));
    match source {
        Some(path) => info!("Using config: {}", path.display()),
        None => info!("Using default configuration"),
    }
    info!(
        "Arena: {} obstacles, sensor {} beams over {:.1}° (range {})",
        config.arena.obstacles.len(),
        config.sensor.beams,
        config.sensor.fov.to_degrees(),
        config.sensor.max_range
    );
    info!(
        "Episode caps: {} collisions or {} steps (collision threshold {})",
        config.episode.max_collisions, config.episode.max_steps, config.episode.collision_threshold
    );

    gateway::serve(&config).await
}
