//! Momentum indicators.

use serde::{Deserialize, Serialize};
use signal_core::traits::{Indicator, MultiOutputIndicator};

use crate::moving_average::{wilder_smooth, Ema};
use crate::simd::price_changes_simd;

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.period {
            return vec![];
        }

        let (gains, losses) = price_changes_simd(data);
        let avg_gains = wilder_smooth(&gains, self.period);
        let avg_losses = wilder_smooth(&losses, self.period);

        avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|(&gain, &loss)| {
                if loss == 0.0 {
                    100.0
                } else {
                    100.0 - (100.0 / (1.0 + gain / loss))
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
///
/// The MACD line is defined once the slow EMA is; signal and histogram
/// stay NaN for the first `signal - 1` outputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }

    /// Bars needed before the signal line has a value.
    pub fn signal_period(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        if data.len() < self.period() {
            return vec![];
        }

        let fast_ema = Ema::new(self.fast_period).calculate(data);
        let slow_ema = Ema::new(self.slow_period).calculate(data);

        // The fast EMA starts earlier; drop its head so both end-align.
        let offset = self.slow_period - self.fast_period;
        let macd_line: Vec<f64> = fast_ema[offset..]
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = Ema::new(self.signal_period).calculate(&macd_line);
        let pad = macd_line.len() - signal_line.len();

        macd_line
            .iter()
            .zip(std::iter::repeat(f64::NAN).take(pad).chain(signal_line))
            .map(|(&macd, signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.slow_period
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// Rate of Change (ROC), in percent.
///
/// `ROC[t] = (close[t] - close[t - period]) / close[t - period] * 100`
#[derive(Debug, Clone)]
pub struct Roc {
    period: usize,
}

impl Roc {
    /// Create a new ROC indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Roc {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.period {
            return vec![];
        }

        data.windows(self.period + 1)
            .map(|window| {
                let prev = window[0];
                let curr = window[self.period];
                if prev == 0.0 {
                    f64::NAN
                } else {
                    (curr - prev) / prev * 100.0
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "ROC"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_basic() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let result = rsi.calculate(&data);
        assert_eq!(result.len(), 16);

        for value in &result {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let rsi = Rsi::new(5);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let result = rsi.calculate(&data);

        assert!((result[0] - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5);
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let result = rsi.calculate(&data);

        assert!(result[0].abs() < 1e-10);
    }

    #[test]
    fn test_rsi_requires_period_plus_one() {
        let rsi = Rsi::new(14);
        assert!(rsi.calculate(&[1.0; 14]).is_empty());
        assert_eq!(rsi.calculate(&[1.0; 15]).len(), 1);
    }

    #[test]
    fn test_macd_basic() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), 50 - 26 + 1);
        // In an uptrend, MACD should be positive
        assert!(result.last().unwrap().macd > 0.0);
    }

    #[test]
    fn test_macd_line_leads_signal_line() {
        let macd = Macd::new();
        assert!(macd.calculate(&[1.0; 25]).is_empty());

        let data: Vec<f64> = (0..34).map(|i| 100.0 + (i as f64 * 0.4).sin()).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), 9);
        assert!(result.iter().all(|o| o.macd.is_finite()));
        assert!(result[..8].iter().all(|o| o.signal.is_nan() && o.histogram.is_nan()));
        assert!(result[8].signal.is_finite());
        assert_eq!(macd.signal_period(), 34);
    }

    #[test]
    fn test_macd_histogram() {
        let macd = Macd::with_periods(3, 6, 3);
        let data: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).cos() * 4.0).collect();

        for output in macd.calculate(&data).iter().filter(|o| o.signal.is_finite()) {
            assert!((output.histogram - (output.macd - output.signal)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_roc() {
        let roc = Roc::new(2);
        let result = roc.calculate(&[100.0, 110.0, 121.0, 0.0, 50.0]);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 21.0).abs() < 1e-10);
        assert!((result[1] + 100.0).abs() < 1e-10);
        assert!((result[2] - (50.0 - 121.0) / 121.0 * 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_roc_zero_base_is_undefined() {
        let roc = Roc::new(1);
        let result = roc.calculate(&[0.0, 5.0]);
        assert!(result[0].is_nan());
    }
}
