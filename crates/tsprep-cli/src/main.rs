//! Main entry point for tsprep.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tsprep_cli::{App, Cli};
use tsprep_common::init_logging;
use tsprep_config::{Config, ConfigLoader};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            // No subscriber yet, so this one goes straight to stderr.
            eprintln!("tsprep: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let mut logging = config.logging.to_logging_config();
    if let Some(level) = cli.verbosity_level() {
        logging.level = level.to_string();
    }
    let _guard = match init_logging(&logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("tsprep: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "Starting tsprep");

    if let Err(e) = run(cli, config).await {
        error!("{e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => ConfigLoader::load().context("loading configuration"),
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let app = App::from_config(config).context("creating HTTP client")?;
    app.run(&cli.command).await?;
    Ok(())
}
