//! ADX: Average Directional Index with +DI/-DI (Wilder).
//!
//! 1. +DM/-DM and true range from consecutive bars
//! 2. Wilder-smooth each over `period`
//! 3. +DI = 100 * +DM / TR, -DI = 100 * -DM / TR
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 5. ADX = Wilder-smoothed DX
//!
//! Output starts at the first +DI/-DI; `adx` is NaN until a full period of
//! DX exists.

use serde::{Deserialize, Serialize};
use signal_core::traits::OhlcvIndicator;
use signal_core::types::Bar;

use crate::moving_average::wilder_smooth;
use crate::volatility::true_ranges;

/// ADX output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdxOutput {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
}

/// Average Directional Index.
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
}

impl Adx {
    /// Create a new ADX indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Bars needed before ADX itself has a value.
    pub fn adx_period(&self) -> usize {
        2 * self.period
    }

    fn directional_movement(bars: &[Bar]) -> (Vec<f64>, Vec<f64>) {
        bars.windows(2)
            .map(|pair| {
                let up = pair[1].high - pair[0].high;
                let down = pair[0].low - pair[1].low;
                let plus = if up > down && up > 0.0 { up } else { 0.0 };
                let minus = if down > up && down > 0.0 { down } else { 0.0 };
                (plus, minus)
            })
            .unzip()
    }
}

impl OhlcvIndicator for Adx {
    type Output = AdxOutput;

    fn calculate(&self, bars: &[Bar]) -> Vec<AdxOutput> {
        if bars.len() < self.period() {
            return vec![];
        }

        let (plus_dm, minus_dm) = Self::directional_movement(bars);
        let smooth_tr = wilder_smooth(&true_ranges(bars), self.period);
        let smooth_plus = wilder_smooth(&plus_dm, self.period);
        let smooth_minus = wilder_smooth(&minus_dm, self.period);

        // Zero true range means no movement at all; DI is 0 rather than undefined.
        let di: Vec<(f64, f64)> = smooth_tr
            .iter()
            .zip(smooth_plus.iter().zip(smooth_minus.iter()))
            .map(|(&tr, (&plus, &minus))| {
                if tr == 0.0 {
                    (0.0, 0.0)
                } else {
                    (100.0 * plus / tr, 100.0 * minus / tr)
                }
            })
            .collect();

        let dx: Vec<f64> = di
            .iter()
            .map(|&(plus, minus)| {
                let sum = plus + minus;
                if sum == 0.0 {
                    0.0
                } else {
                    100.0 * (plus - minus).abs() / sum
                }
            })
            .collect();

        let adx = wilder_smooth(&dx, self.period);
        let pad = di.len() - adx.len();

        di.iter()
            .zip(std::iter::repeat(f64::NAN).take(pad).chain(adx))
            .map(|(&(plus_di, minus_di), adx)| AdxOutput {
                adx,
                plus_di,
                minus_di,
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "ADX"
    }
}
