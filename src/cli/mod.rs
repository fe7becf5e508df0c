//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use signal_config::AppConfig;
use signal_core::types::Timeframe;
use signal_monitor::ReportFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "signal-bot")]
#[command(author, version, about = "Composite technical-indicator signal bot")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SIGNAL_BOT_CONFIG", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configuration file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the market and print the latest signal every interval
    Run(RunArgs),
    /// Evaluate the latest signal once
    Evaluate(EvaluateArgs),
    /// Validate configuration
    ValidateConfig,
}

/// Market overrides shared by every command that fetches bars.
#[derive(clap::Args)]
pub struct MarketArgs {
    /// Trading pair, e.g. BTC/USDT
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Bar interval (1m, 5m, 15m, 30m, 1h, 4h, 1d, 1w)
    #[arg(short, long)]
    pub timeframe: Option<Timeframe>,

    /// Number of bars to fetch
    #[arg(long)]
    pub limit: Option<usize>,

    /// Read bars from a CSV file instead of the exchange
    #[arg(long)]
    pub data: Option<PathBuf>,
}

impl MarketArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(symbol) = &self.symbol {
            config.market.symbol = symbol.clone();
        }
        if let Some(timeframe) = self.timeframe {
            config.market.timeframe = timeframe;
        }
        if let Some(limit) = self.limit {
            config.market.limit = limit;
        }
    }
}

#[derive(clap::Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Seconds between evaluations
    #[arg(long)]
    pub interval: Option<u64>,

    /// Stop after this many evaluations
    #[arg(long)]
    pub max_cycles: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Also print every rule vote and indicator value
    #[arg(long)]
    pub details: bool,
}
