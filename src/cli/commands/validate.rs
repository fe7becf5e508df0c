//! Validate configuration command.

use anyhow::Result;
use signal_config::{load_config, to_toml};
use std::path::Path;

pub fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Market: {} {} (limit {})", config.market.symbol, config.market.timeframe, config.market.limit);
            println!("Exchange: {}", config.exchange.base_url);
            println!("Poll interval: {}s", config.polling.interval_secs);
            println!();
            println!("Effective settings:");
            println!("{}", to_toml(&config)?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
