//! Volume-weighted indicators.

use signal_core::traits::OhlcvIndicator;
use signal_core::types::Bar;

/// Volume Weighted Average Price.
///
/// Cumulative from the first supplied bar with no session anchor, so the
/// value depends on the window the caller fetched. Undefined until some
/// volume has traded.
#[derive(Debug, Clone, Default)]
pub struct Vwap;

impl Vwap {
    pub fn new() -> Self {
        Self
    }
}

impl OhlcvIndicator for Vwap {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<f64> {
        let mut cum_pv = 0.0;
        let mut cum_volume = 0.0;

        bars.iter()
            .map(|bar| {
                cum_pv += bar.typical_price() * bar.volume;
                cum_volume += bar.volume;
                if cum_volume == 0.0 {
                    f64::NAN
                } else {
                    cum_pv / cum_volume
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "VWAP"
    }
}

/// Money Flow Index.
///
/// Volume-weighted RSI over the typical price. Flow on a bar whose
/// typical price did not move counts as neither positive nor negative;
/// a window with no flow at all is undefined.
#[derive(Debug, Clone)]
pub struct Mfi {
    period: usize,
}

impl Mfi {
    /// Create a new MFI indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl OhlcvIndicator for Mfi {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<f64> {
        if bars.len() < self.period() {
            return vec![];
        }

        let (positive, negative): (Vec<f64>, Vec<f64>) = bars
            .windows(2)
            .map(|pair| {
                let prev_tp = pair[0].typical_price();
                let tp = pair[1].typical_price();
                let flow = tp * pair[1].volume;
                if tp > prev_tp {
                    (flow, 0.0)
                } else if tp < prev_tp {
                    (0.0, flow)
                } else {
                    (0.0, 0.0)
                }
            })
            .unzip();

        positive
            .windows(self.period)
            .zip(negative.windows(self.period))
            .map(|(pos, neg)| {
                let pos_sum: f64 = pos.iter().sum();
                let neg_sum: f64 = neg.iter().sum();
                let total = pos_sum + neg_sum;
                if total == 0.0 {
                    f64::NAN
                } else {
                    100.0 * pos_sum / total
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "MFI"
    }
}
