//! Error types for the signal bot.

use thiserror::Error;

/// Failure of one fetch-and-evaluate cycle.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Invalid bar series: {0}")]
    Series(#[from] SeriesError),

    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// Contract violations in a bar series handed to the pipeline.
///
/// These indicate a broken upstream collaborator and are never
/// degraded to a HOLD signal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("bar series is empty")]
    Empty,

    #[error("timestamps not strictly ascending at index {index}: {previous} then {current}")]
    NonAscending {
        index: usize,
        previous: i64,
        current: i64,
    },

    #[error("bar {index} has a non-finite {field}")]
    NonFinite { index: usize, field: &'static str },

    #[error("bar {index} has negative volume {volume}")]
    NegativeVolume { index: usize, volume: f64 },
}

/// Data-quality failures inside the signal pipeline.
///
/// The composite engine converts every variant into a HOLD signal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("{indicator} unavailable: needs {required} bars, have {available}")]
    InsufficientHistory {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    /// Enough bars for the warm-up, but every window was degenerate.
    #[error("{indicator} has no defined value over {available} bars")]
    NoDefinedValue {
        indicator: &'static str,
        available: usize,
    },

    #[error("latest {field} value is undefined")]
    UndefinedSnapshotValue { field: &'static str },

    #[error("trend classification failed: {source}")]
    ClassificationFailure { source: Box<SignalError> },
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Data source error: {0}")]
    Internal(String),
}
