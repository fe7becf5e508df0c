//! Volatility indicators.

use serde::{Deserialize, Serialize};
use signal_core::traits::{MultiOutputIndicator, OhlcvIndicator};
use signal_core::types::Bar;

use crate::moving_average::wilder_smooth;
use crate::simd::{std_dev_simd, sum_simd};

/// Average True Range (ATR).
///
/// Wilder-smoothed true range. The first true range needs a previous
/// close, so the first value lands on bar `period`.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

/// True range of every bar after the first.
pub(crate) fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    bars.windows(2)
        .map(|pair| pair[1].true_range(Some(pair[0].close)))
        .collect()
}

impl OhlcvIndicator for Atr {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<f64> {
        if bars.len() < self.period() {
            return vec![];
        }

        wilder_smooth(&true_ranges(bars), self.period)
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "ATR"
    }
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
}

/// Bollinger Bands.
///
/// Middle band is the SMA; the outer bands sit a multiple of the
/// population standard deviation away from it.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerOutput> {
        if data.len() < self.period {
            return vec![];
        }

        let period_f64 = self.period as f64;
        let deviations = std_dev_simd(data, self.period);

        data.windows(self.period)
            .zip(deviations)
            .map(|(window, std_dev)| {
                let mean = sum_simd(window) / period_f64;
                BollingerOutput {
                    upper: mean + self.std_dev_multiplier * std_dev,
                    middle: mean,
                    lower: mean - self.std_dev_multiplier * std_dev,
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}
