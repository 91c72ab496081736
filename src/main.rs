use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mijnhost_ddns::{
    config::Settings,
    daemon::{self, Scheduler, TokioSleeper, Updater},
};

#[derive(Parser)]
#[command(name = "mijnhost-ddns")]
#[command(about = "Dynamic DNS updater - keeps mijn.host A/AAAA records in sync with the current public IP")]
#[command(version)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Show what would be changed without calling the DNS API
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(if cli.debug { "debug" } else { "info" });

    debug!("Using configuration file: {}", cli.config.display());
    let settings = Settings::load(&cli.config)?;
    debug!("Loaded configuration: {:?}", settings);

    let updater = Updater::from_settings(settings, cli.dry_run)?;
    let scheduler = Scheduler::new(updater, Box::new(TokioSleeper));

    tokio::select! {
        summary = scheduler.run() => {
            if summary.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        result = daemon::wait_for_shutdown() => {
            result?;
            info!("Shutdown signal received, stopping");
            Ok(ExitCode::SUCCESS)
        }
    }
}
