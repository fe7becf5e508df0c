//! OHLCV (Open, High, Low, Close, Volume) data types.

use serde::{Deserialize, Serialize};

use super::Timeframe;
use crate::error::SeriesError;

/// Compact OHLCV bar.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume; may be zero
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Calculate the true range (used for ATR and ADX).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }

    fn validate(&self, index: usize) -> Result<(), SeriesError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        if let Some(&(field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SeriesError::NonFinite { index, field });
        }
        if self.volume < 0.0 {
            return Err(SeriesError::NegativeVolume {
                index,
                volume: self.volume,
            });
        }
        Ok(())
    }
}

/// Immutable, validated time series of bars for one instrument.
///
/// Construction guarantees at least one bar, strictly ascending
/// timestamps and finite OHLCV values.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    symbol: String,
    timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Validate and wrap a set of bars ordered oldest to newest.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }

        for (index, bar) in bars.iter().enumerate() {
            bar.validate(index)?;
        }

        if let Some(index) = bars
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(SeriesError::NonAscending {
                index: index + 1,
                previous: bars[index].timestamp,
                current: bars[index + 1].timestamp,
            });
        }

        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        })
    }

    /// Instrument symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Bar interval.
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for slice parity.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the most recent bar.
    pub fn last(&self) -> &Bar {
        // Non-empty by construction.
        &self.bars[self.bars.len() - 1]
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(timestamp: i64, close: f64) -> Bar {
        Bar::new(timestamp, close, close + 1.0, close - 1.0, close, 1000.0)
    }

    #[test]
    fn test_bar_calculations() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000000.0);

        assert!((bar.typical_price() - 103.333333).abs() < 0.001);
        assert!((bar.range() - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_bar_true_range() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000000.0);

        // Without previous close
        assert!((bar.true_range(None) - 15.0).abs() < 0.001);

        // With previous close that creates gap
        assert!((bar.true_range(Some(90.0)) - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_series_accepts_ascending_bars() {
        let series = BarSeries::new(
            "BTC/USDT",
            Timeframe::Hour4,
            vec![bar(1, 100.5), bar(2, 101.5), bar(3, 102.5)],
        )
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.symbol(), "BTC/USDT");
        assert_eq!(series.last().timestamp, 3);
        assert_eq!(series.closes(), vec![100.5, 101.5, 102.5]);
    }

    #[test]
    fn test_series_rejects_empty() {
        let result = BarSeries::new("X", Timeframe::Daily, vec![]);
        assert_eq!(result, Err(SeriesError::Empty));
    }

    #[test]
    fn test_series_rejects_duplicate_timestamp() {
        let result = BarSeries::new("X", Timeframe::Daily, vec![bar(1, 1.0), bar(2, 2.0), bar(2, 3.0)]);
        assert_eq!(
            result,
            Err(SeriesError::NonAscending {
                index: 2,
                previous: 2,
                current: 2
            })
        );
    }

    #[test]
    fn test_series_rejects_descending_timestamp() {
        let result = BarSeries::new("X", Timeframe::Daily, vec![bar(5, 1.0), bar(4, 2.0)]);
        assert!(matches!(result, Err(SeriesError::NonAscending { index: 1, .. })));
    }

    #[test]
    fn test_series_rejects_non_finite_field() {
        let mut broken = bar(2, 10.0);
        broken.close = f64::NAN;
        let result = BarSeries::new("X", Timeframe::Daily, vec![bar(1, 10.0), broken]);
        assert_eq!(
            result,
            Err(SeriesError::NonFinite {
                index: 1,
                field: "close"
            })
        );
    }

    #[test]
    fn test_series_accepts_zero_volume() {
        let mut quiet = bar(1, 10.0);
        quiet.volume = 0.0;
        assert!(BarSeries::new("X", Timeframe::Daily, vec![quiet]).is_ok());

        quiet.volume = -1.0;
        assert!(matches!(
            BarSeries::new("X", Timeframe::Daily, vec![quiet]),
            Err(SeriesError::NegativeVolume { index: 0, .. })
        ));
    }
}
