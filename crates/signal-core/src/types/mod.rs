//! Core data types for the signal bot.

mod ohlcv;
mod signal;
mod timeframe;

pub use ohlcv::{Bar, BarSeries};
pub use signal::{Signal, Trend};
pub use timeframe::Timeframe;
