use chrono::Utc;
use signal_config::AppConfig;
use signal_core::error::BotError;
use signal_core::traits::BarSource;
use signal_core::types::{BarSeries, Timeframe};
use signal_engine::CompositeSignal;
use signal_monitor::{ReportSink, SignalReport};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

/// What to fetch and how often.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub limit: usize,
    pub interval: Duration,
    pub max_cycles: Option<u64>,
}

impl From<&AppConfig> for RunnerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            symbol: config.market.symbol.clone(),
            timeframe: config.market.timeframe,
            limit: config.market.limit,
            interval: config.polling.interval(),
            max_cycles: config.polling.max_cycles,
        }
    }
}

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub reported: u64,
    pub failed: u64,
}

/// Drives a bar source through the signal engine on a fixed cadence.
pub struct Runner {
    source: Arc<dyn BarSource>,
    engine: CompositeSignal,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(source: Arc<dyn BarSource>, config: RunnerConfig) -> Self {
        Self {
            source,
            engine: CompositeSignal::new(),
            config,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Fetch, validate and evaluate once.
    ///
    /// Fetch failures and malformed series are errors; data-quality
    /// problems inside the engine are not, they produce a HOLD report.
    pub async fn run_cycle(&self) -> Result<SignalReport, BotError> {
        let bars = self
            .source
            .fetch_bars(&self.config.symbol, self.config.timeframe, self.config.limit)
            .await?;
        let series = BarSeries::new(self.config.symbol.clone(), self.config.timeframe, bars)?;

        let outcome = self.engine.try_evaluate(&series);
        let signal = CompositeSignal::settle(series.symbol(), &outcome);

        Ok(SignalReport::new(
            Utc::now(),
            series.symbol(),
            series.timeframe(),
            signal,
            &outcome,
        ))
    }

    /// Run until Ctrl-C or the configured cycle count.
    pub async fn run<K: ReportSink>(&self, sink: &mut K) -> RunSummary {
        self.run_until(sink, shutdown_signal()).await
    }

    /// Run until `shutdown` resolves or the configured cycle count.
    ///
    /// The first cycle starts immediately. A failed cycle is logged and the
    /// next one is attempted on schedule.
    pub async fn run_until<K, F>(&self, sink: &mut K, shutdown: F) -> RunSummary
    where
        K: ReportSink,
        F: Future<Output = ()>,
    {
        let mut summary = RunSummary::default();
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            source = self.source.name(),
            symbol = %self.config.symbol,
            timeframe = %self.config.timeframe,
            interval_secs = self.config.interval.as_secs_f64(),
            "signal loop started"
        );

        loop {
            if self.config.max_cycles.is_some_and(|max| summary.cycles >= max) {
                info!(cycles = summary.cycles, "cycle limit reached");
                break;
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                _ = ticker.tick() => {}
            }

            summary.cycles += 1;
            let cycle = summary.cycles;

            match self.run_cycle().await {
                Ok(report) => {
                    info!(cycle, signal = %report.signal, score = ?report.score, "cycle complete");
                    match sink.publish(&report) {
                        Ok(()) => summary.reported += 1,
                        Err(e) => warn!(cycle, error = %e, "failed to publish report"),
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(cycle, error = %e, "cycle failed");
                }
            }
        }

        info!(
            cycles = summary.cycles,
            reported = summary.reported,
            failed = summary.failed,
            "signal loop stopped"
        );
        summary
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "unable to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
