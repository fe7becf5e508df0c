//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, ExchangeSettings, LoggingConfig, MarketSettings, PollingSettings,
    MAX_LIMIT,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment variable prefix, e.g. `SIGNAL_BOT__MARKET__SYMBOL`.
pub const ENV_PREFIX: &str = "SIGNAL_BOT";

/// Load configuration from file and environment, then validate it.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

/// Render a configuration as TOML.
pub fn to_toml(config: &AppConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|e| ConfigError::Message(e.to_string()))
}
