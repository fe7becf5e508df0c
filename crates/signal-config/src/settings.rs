//! Configuration structures.

use config::ConfigError;
use serde::{Deserialize, Serialize};
use signal_core::types::Timeframe;
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub market: MarketSettings,
    #[serde(default)]
    pub exchange: ExchangeSettings,
    #[serde(default)]
    pub polling: PollingSettings,
}

impl AppConfig {
    /// Reject settings the bot cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market.symbol.trim().is_empty() {
            return Err(ConfigError::Message("market.symbol must not be empty".into()));
        }
        if self.market.limit == 0 || self.market.limit > MAX_LIMIT {
            return Err(ConfigError::Message(format!(
                "market.limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }
        if self.exchange.base_url.trim().is_empty() {
            return Err(ConfigError::Message("exchange.base_url must not be empty".into()));
        }
        if self.exchange.timeout_secs == 0 {
            return Err(ConfigError::Message("exchange.timeout_secs must be positive".into()));
        }
        if self.polling.interval_secs == 0 {
            return Err(ConfigError::Message("polling.interval_secs must be positive".into()));
        }
        if self.polling.max_cycles == Some(0) {
            return Err(ConfigError::Message("polling.max_cycles must be positive when set".into()));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Message(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}

/// Largest history window one request can ask for.
pub const MAX_LIMIT: usize = 1000;

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "signal-bot".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

/// Instrument and history window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSettings {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub limit: usize,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            symbol: "BTC/USDT".to_string(),
            timeframe: Timeframe::Hour4,
            limit: 500,
        }
    }
}

/// Exchange connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeSettings {
    pub base_url: String,
    pub rate_limit_ms: u64,
    pub timeout_secs: u64,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            rate_limit_ms: 1200,
            timeout_secs: 10,
        }
    }
}

impl ExchangeSettings {
    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Polling loop cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    pub interval_secs: u64,
    /// Stop after this many cycles; run until interrupted when unset.
    pub max_cycles: Option<u64>,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            max_cycles: None,
        }
    }
}

impl PollingSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
