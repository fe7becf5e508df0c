//! Composite signal bot CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use signal_config::{load_config, LoggingConfig};
use signal_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(&cli.config);
    }

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    // CLI flags win over the [logging] section
    let logging: &LoggingConfig = &config.logging;
    let level = cli.log_level.map_or(logging.level.as_str(), |l| l.as_str());
    let _guard = setup_logging(
        level,
        cli.json_logs || logging.is_json(),
        logging.file.as_deref().map(Path::new),
    )
    .context("failed to initialise logging")?;

    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, config).await,
        Commands::Evaluate(args) => cli::commands::evaluate::run(args, config).await,
        Commands::ValidateConfig => Ok(()),
    }
}
