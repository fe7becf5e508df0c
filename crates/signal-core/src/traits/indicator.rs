//! Indicator trait definitions.

use crate::types::Bar;

/// Trait for technical indicators computed from a single price column.
///
/// Outputs are aligned to the end of the input: the last output belongs
/// to the last input point, and warm-up positions are simply not emitted.
/// A position whose value is mathematically undefined is emitted as NaN.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the minimum data points required for the first output.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Multi-output indicator (e.g., Bollinger Bands, MACD).
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Outputs>;

    /// Get the minimum data points required for the first output.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Indicator that needs whole bars (high, low, close and/or volume).
///
/// Follows the same end-aligned output convention as [`Indicator`].
pub trait OhlcvIndicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values from bars ordered oldest to newest.
    fn calculate(&self, bars: &[Bar]) -> Vec<Self::Output>;

    /// Get the minimum bars required for the first output.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
