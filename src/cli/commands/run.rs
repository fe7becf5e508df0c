//! Polling loop command.

use anyhow::{Context, Result};
use signal_config::AppConfig;
use signal_monitor::WriterSink;
use signal_runner::{Runner, RunnerConfig};
use tracing::info;

use super::build_source;
use crate::cli::RunArgs;

pub async fn run(args: RunArgs, mut config: AppConfig) -> Result<()> {
    args.market.apply(&mut config);
    if let Some(secs) = args.interval {
        config.polling.interval_secs = secs;
    }
    if args.max_cycles.is_some() {
        config.polling.max_cycles = args.max_cycles;
    }
    config.validate().context("invalid settings")?;

    let source = build_source(args.market.data.as_deref(), &config)?;
    let runner = Runner::new(source, RunnerConfig::from(&config));
    let mut sink = WriterSink::stdout(args.output.into());

    let summary = runner.run(&mut sink).await;

    info!(
        cycles = summary.cycles,
        reported = summary.reported,
        failed = summary.failed,
        "done"
    );
    Ok(())
}
