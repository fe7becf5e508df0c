//! Range oscillators: Stochastic, Williams %R and CCI.

use serde::{Deserialize, Serialize};
use signal_core::traits::{Indicator, OhlcvIndicator};
use signal_core::types::Bar;

use crate::moving_average::Sma;
use crate::simd::{mean_abs_dev_simd, minmax_simd, sum_simd};

/// Highest high and lowest low over `period` bars ending at each bar.
fn rolling_extremes(bars: &[Bar], period: usize) -> Vec<(f64, f64)> {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

    highs
        .windows(period)
        .zip(lows.windows(period))
        .map(|(h, l)| {
            let highest = minmax_simd(h).map_or(f64::NAN, |(_, max)| max);
            let lowest = minmax_simd(l).map_or(f64::NAN, |(min, _)| min);
            (highest, lowest)
        })
        .collect()
}

/// Stochastic oscillator output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StochasticOutput {
    /// %K (smoothed)
    pub k: f64,
    /// %D (SMA of %K)
    pub d: f64,
}

/// Stochastic oscillator.
///
/// Raw %K compares the close with the high/low range, is smoothed by an
/// SMA, and %D is an SMA of the smoothed %K. A bar range of zero leaves
/// raw %K undefined.
#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    smooth_k: usize,
    d_period: usize,
}

impl Stochastic {
    /// Create a new stochastic oscillator with default parameters (14, 3, 3).
    pub fn new() -> Self {
        Self::with_periods(14, 3, 3)
    }

    /// Create with custom periods.
    pub fn with_periods(k_period: usize, smooth_k: usize, d_period: usize) -> Self {
        assert!(k_period > 0 && smooth_k > 0 && d_period > 0);
        Self {
            k_period,
            smooth_k,
            d_period,
        }
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new()
    }
}

impl OhlcvIndicator for Stochastic {
    type Output = StochasticOutput;

    fn calculate(&self, bars: &[Bar]) -> Vec<StochasticOutput> {
        if bars.len() < self.period() {
            return vec![];
        }

        let raw_k: Vec<f64> = rolling_extremes(bars, self.k_period)
            .into_iter()
            .zip(&bars[self.k_period - 1..])
            .map(|((highest, lowest), bar)| {
                let range = highest - lowest;
                if range == 0.0 {
                    f64::NAN
                } else {
                    (bar.close - lowest) / range * 100.0
                }
            })
            .collect();

        let k_values = Sma::new(self.smooth_k).calculate(&raw_k);
        let d_values = Sma::new(self.d_period).calculate(&k_values);

        k_values[self.d_period - 1..]
            .iter()
            .zip(d_values)
            .map(|(&k, d)| StochasticOutput { k, d })
            .collect()
    }

    fn period(&self) -> usize {
        self.k_period + self.smooth_k + self.d_period - 2
    }

    fn name(&self) -> &str {
        "Stochastic"
    }
}

/// Williams %R, ranging from -100 (close at the low) to 0 (close at the high).
#[derive(Debug, Clone)]
pub struct WilliamsR {
    period: usize,
}

impl WilliamsR {
    /// Create a new Williams %R indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl OhlcvIndicator for WilliamsR {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<f64> {
        if bars.len() < self.period {
            return vec![];
        }

        rolling_extremes(bars, self.period)
            .into_iter()
            .zip(&bars[self.period - 1..])
            .map(|((highest, lowest), bar)| {
                let range = highest - lowest;
                if range == 0.0 {
                    f64::NAN
                } else {
                    (highest - bar.close) / range * -100.0
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Williams %R"
    }
}

/// Commodity Channel Index (CCI).
///
/// `(tp - SMA(tp)) / (0.015 * mean absolute deviation of tp)` over the
/// typical price.
#[derive(Debug, Clone)]
pub struct Cci {
    period: usize,
    constant: f64,
}

impl Cci {
    /// Create a new CCI with Lambert's 0.015 constant.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self {
            period,
            constant: 0.015,
        }
    }
}

impl OhlcvIndicator for Cci {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<f64> {
        if bars.len() < self.period {
            return vec![];
        }

        let typical: Vec<f64> = bars.iter().map(|b| b.typical_price()).collect();
        let period_f64 = self.period as f64;

        typical
            .windows(self.period)
            .map(|window| {
                let mean = sum_simd(window) / period_f64;
                let mad = mean_abs_dev_simd(window, mean);
                if mad == 0.0 {
                    f64::NAN
                } else {
                    (window[self.period - 1] - mean) / (self.constant * mad)
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "CCI"
    }
}
