//! Bar sources.
//!
//! Every source implements [`signal_core::traits::BarSource`] and is
//! handed to the runner explicitly.

mod binance;
mod csv_source;
mod rate_limit;

pub use binance::{normalize_symbol, BinanceConfig, BinanceSource};
pub use csv_source::CsvBarSource;
pub use rate_limit::RateLimiter;
