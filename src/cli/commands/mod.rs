//! CLI command implementations.

pub mod evaluate;
pub mod run;
pub mod validate;

use anyhow::{Context, Result};
use signal_config::AppConfig;
use signal_core::traits::BarSource;
use signal_data::{BinanceConfig, BinanceSource, CsvBarSource};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Bar source for a command: the CSV file when given, Binance otherwise.
pub fn build_source(data: Option<&Path>, config: &AppConfig) -> Result<Arc<dyn BarSource>> {
    let source: Arc<dyn BarSource> = match data {
        Some(path) => Arc::new(
            CsvBarSource::new(path)
                .with_context(|| format!("cannot read bars from {}", path.display()))?,
        ),
        None => Arc::new(
            BinanceSource::new(BinanceConfig {
                base_url: config.exchange.base_url.clone(),
                rate_limit: config.exchange.rate_limit(),
                timeout: config.exchange.timeout(),
            })
            .context("failed to create exchange client")?,
        ),
    };

    info!(source = source.name(), "bar source ready");
    Ok(source)
}
