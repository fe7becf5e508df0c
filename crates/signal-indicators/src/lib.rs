//! Technical indicators and the indicator frame pipeline.
//!
//! This crate provides the indicators the composite signal votes on:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD, ROC)
//! - Oscillators (Stochastic, Williams %R, CCI)
//! - Volatility indicators (ATR, Bollinger Bands)
//! - Trend strength (ADX with +DI/-DI)
//! - Volume indicators (VWAP, MFI)
//!
//! [`IndicatorFrame`] runs the full fixed battery over a bar series,
//! aligns every output to the bars and applies the gap-fill policy.

pub mod fill;
pub mod frame;
pub mod momentum;
pub mod moving_average;
pub mod oscillator;
pub mod simd;
pub mod snapshot;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use fill::fill_gaps;
pub use frame::{IndicatorFrame, IndicatorId, IndicatorSeries};
pub use momentum::{Macd, MacdOutput, Roc, Rsi};
pub use moving_average::{Ema, Sma};
pub use oscillator::{Cci, Stochastic, StochasticOutput, WilliamsR};
pub use snapshot::LatestSnapshot;
pub use trend::{Adx, AdxOutput};
pub use volatility::{Atr, BollingerBands, BollingerOutput};
pub use volume::{Mfi, Vwap};
