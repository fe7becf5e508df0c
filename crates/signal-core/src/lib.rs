//! Core types and traits for the composite signal bot.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries, Timeframe)
//! - Signal output types (Signal, Trend)
//! - Core traits for indicators and bar sources
//! - The error taxonomy shared by every other crate

pub mod error;
pub mod traits;
pub mod types;

pub use error::{BotError, DataError, SeriesError, SignalError};
pub use traits::*;
pub use types::*;
