//! Core traits for the signal bot.

mod data_source;
mod indicator;

pub use data_source::BarSource;
pub use indicator::{Indicator, MultiOutputIndicator, OhlcvIndicator};
