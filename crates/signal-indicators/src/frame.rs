//! The fixed indicator battery, aligned to the bar series.
//!
//! [`IndicatorFrame::compute`] runs every indicator over the full series,
//! pads each output so position `i` belongs to bar `i`, and only then
//! applies [`fill_gaps`] to each series. Values filled into warm-up
//! positions are copies, not computations.

use serde::Serialize;
use signal_core::error::SignalError;
use signal_core::traits::{Indicator, MultiOutputIndicator, OhlcvIndicator};
use signal_core::types::BarSeries;
use std::fmt;
use tracing::debug;

use crate::fill::fill_gaps;
use crate::momentum::{Macd, Roc, Rsi};
use crate::moving_average::Ema;
use crate::oscillator::{Cci, Stochastic, WilliamsR};
use crate::snapshot::LatestSnapshot;
use crate::trend::Adx;
use crate::volatility::{Atr, BollingerBands};
use crate::volume::{Mfi, Vwap};

pub const RSI_LENGTH: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BB_LENGTH: usize = 20;
pub const BB_STD_DEVS: f64 = 2.0;
pub const ATR_LENGTH: usize = 14;
pub const ADX_LENGTH: usize = 14;
pub const STOCH_K: usize = 14;
pub const STOCH_SMOOTH_K: usize = 3;
pub const STOCH_D: usize = 3;
pub const CCI_LENGTH: usize = 20;
pub const ROC_LENGTH: usize = 12;
pub const MFI_LENGTH: usize = 14;
pub const EMA_FAST: usize = 50;
pub const EMA_SLOW: usize = 200;
pub const WILLR_LENGTH: usize = 14;

/// Every series the frame produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IndicatorId {
    Rsi,
    Macd,
    MacdSignal,
    MacdHistogram,
    BbUpper,
    BbMiddle,
    BbLower,
    Atr,
    Adx,
    DiPlus,
    DiMinus,
    StochK,
    StochD,
    Vwap,
    Cci,
    Roc,
    Mfi,
    Ema50,
    Ema200,
    WilliamsR,
}

impl IndicatorId {
    pub const ALL: [IndicatorId; 20] = [
        IndicatorId::Rsi,
        IndicatorId::Macd,
        IndicatorId::MacdSignal,
        IndicatorId::MacdHistogram,
        IndicatorId::BbUpper,
        IndicatorId::BbMiddle,
        IndicatorId::BbLower,
        IndicatorId::Atr,
        IndicatorId::Adx,
        IndicatorId::DiPlus,
        IndicatorId::DiMinus,
        IndicatorId::StochK,
        IndicatorId::StochD,
        IndicatorId::Vwap,
        IndicatorId::Cci,
        IndicatorId::Roc,
        IndicatorId::Mfi,
        IndicatorId::Ema50,
        IndicatorId::Ema200,
        IndicatorId::WilliamsR,
    ];

    /// Column name of the series.
    pub fn name(&self) -> &'static str {
        match self {
            IndicatorId::Rsi => "RSI",
            IndicatorId::Macd => "MACD",
            IndicatorId::MacdSignal => "MACD_signal",
            IndicatorId::MacdHistogram => "MACD_hist",
            IndicatorId::BbUpper => "BB_upper",
            IndicatorId::BbMiddle => "BB_middle",
            IndicatorId::BbLower => "BB_lower",
            IndicatorId::Atr => "ATR",
            IndicatorId::Adx => "ADX",
            IndicatorId::DiPlus => "DI_plus",
            IndicatorId::DiMinus => "DI_minus",
            IndicatorId::StochK => "Stoch_K",
            IndicatorId::StochD => "Stoch_D",
            IndicatorId::Vwap => "VWAP",
            IndicatorId::Cci => "CCI",
            IndicatorId::Roc => "ROC",
            IndicatorId::Mfi => "MFI",
            IndicatorId::Ema50 => "EMA_50",
            IndicatorId::Ema200 => "EMA_200",
            IndicatorId::WilliamsR => "Williams_%R",
        }
    }

    /// Bars needed before the first computed value.
    pub fn warmup(&self) -> usize {
        match self {
            IndicatorId::Rsi => Rsi::new(RSI_LENGTH).period(),
            IndicatorId::Macd => Macd::with_periods(MACD_FAST, MACD_SLOW, MACD_SIGNAL).period(),
            IndicatorId::MacdSignal | IndicatorId::MacdHistogram => {
                Macd::with_periods(MACD_FAST, MACD_SLOW, MACD_SIGNAL).signal_period()
            }
            IndicatorId::BbUpper | IndicatorId::BbMiddle | IndicatorId::BbLower => {
                BollingerBands::with_params(BB_LENGTH, BB_STD_DEVS).period()
            }
            IndicatorId::Atr => Atr::new(ATR_LENGTH).period(),
            IndicatorId::Adx => Adx::new(ADX_LENGTH).adx_period(),
            IndicatorId::DiPlus | IndicatorId::DiMinus => Adx::new(ADX_LENGTH).period(),
            IndicatorId::StochK | IndicatorId::StochD => {
                Stochastic::with_periods(STOCH_K, STOCH_SMOOTH_K, STOCH_D).period()
            }
            IndicatorId::Vwap => Vwap::new().period(),
            IndicatorId::Cci => Cci::new(CCI_LENGTH).period(),
            IndicatorId::Roc => Roc::new(ROC_LENGTH).period(),
            IndicatorId::Mfi => Mfi::new(MFI_LENGTH).period(),
            IndicatorId::Ema50 => Ema::new(EMA_FAST).period(),
            IndicatorId::Ema200 => Ema::new(EMA_SLOW).period(),
            IndicatorId::WilliamsR => WilliamsR::new(WILLR_LENGTH).period(),
        }
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One indicator aligned 1:1 with the bars; `None` is undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    id: IndicatorId,
    values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    fn undefined(id: IndicatorId, len: usize) -> Self {
        Self {
            id,
            values: vec![None; len],
        }
    }

    /// Pad an end-aligned indicator output to `len` positions.
    /// Non-finite outputs become undefined.
    pub fn end_aligned(id: IndicatorId, raw: Vec<f64>, len: usize) -> Self {
        let skip = raw.len().saturating_sub(len);
        let pad = len.saturating_sub(raw.len());

        let values = std::iter::repeat(None)
            .take(pad)
            .chain(raw.into_iter().skip(skip).map(|v| v.is_finite().then_some(v)))
            .collect();

        Self { id, values }
    }

    pub fn id(&self) -> IndicatorId {
        self.id
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at the last bar.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// True when no position holds a defined value.
    pub fn is_unavailable(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Count of undefined positions.
    pub fn undefined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    fn fill(&mut self) {
        fill_gaps(&mut self.values);
    }
}

/// All indicator series for one bar series.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    len: usize,
    close: f64,
    series: Vec<IndicatorSeries>,
}

impl IndicatorFrame {
    /// Compute every indicator, then apply the gap-fill policy.
    pub fn compute(bars: &BarSeries) -> Self {
        let mut frame = Self::compute_unfilled(bars);
        frame.series.iter_mut().for_each(IndicatorSeries::fill);

        debug!(
            symbol = bars.symbol(),
            bars = frame.len,
            unavailable = ?frame.unavailable().map(|id| id.name()).collect::<Vec<_>>(),
            "indicator frame computed"
        );

        frame
    }

    /// Compute every indicator without filling warm-up or gap positions.
    pub fn compute_unfilled(bars: &BarSeries) -> Self {
        let len = bars.len();
        let closes = bars.closes();
        let candles = bars.bars();

        let mut frame = Self {
            len,
            close: bars.last().close,
            series: IndicatorId::ALL
                .iter()
                .map(|&id| IndicatorSeries::undefined(id, len))
                .collect(),
        };

        frame.set(IndicatorId::Rsi, Rsi::new(RSI_LENGTH).calculate(&closes));

        let macd = Macd::with_periods(MACD_FAST, MACD_SLOW, MACD_SIGNAL).calculate(&closes);
        frame.set(IndicatorId::Macd, macd.iter().map(|o| o.macd).collect());
        frame.set(IndicatorId::MacdSignal, macd.iter().map(|o| o.signal).collect());
        frame.set(IndicatorId::MacdHistogram, macd.iter().map(|o| o.histogram).collect());

        let bands = BollingerBands::with_params(BB_LENGTH, BB_STD_DEVS).calculate(&closes);
        frame.set(IndicatorId::BbUpper, bands.iter().map(|o| o.upper).collect());
        frame.set(IndicatorId::BbMiddle, bands.iter().map(|o| o.middle).collect());
        frame.set(IndicatorId::BbLower, bands.iter().map(|o| o.lower).collect());

        frame.set(IndicatorId::Atr, Atr::new(ATR_LENGTH).calculate(candles));

        let adx = Adx::new(ADX_LENGTH).calculate(candles);
        frame.set(IndicatorId::Adx, adx.iter().map(|o| o.adx).collect());
        frame.set(IndicatorId::DiPlus, adx.iter().map(|o| o.plus_di).collect());
        frame.set(IndicatorId::DiMinus, adx.iter().map(|o| o.minus_di).collect());

        let stoch = Stochastic::with_periods(STOCH_K, STOCH_SMOOTH_K, STOCH_D).calculate(candles);
        frame.set(IndicatorId::StochK, stoch.iter().map(|o| o.k).collect());
        frame.set(IndicatorId::StochD, stoch.iter().map(|o| o.d).collect());

        frame.set(IndicatorId::Vwap, Vwap::new().calculate(candles));
        frame.set(IndicatorId::Cci, Cci::new(CCI_LENGTH).calculate(candles));
        frame.set(IndicatorId::Roc, Roc::new(ROC_LENGTH).calculate(&closes));
        frame.set(IndicatorId::Mfi, Mfi::new(MFI_LENGTH).calculate(candles));
        frame.set(IndicatorId::Ema50, Ema::new(EMA_FAST).calculate(&closes));
        frame.set(IndicatorId::Ema200, Ema::new(EMA_SLOW).calculate(&closes));
        frame.set(IndicatorId::WilliamsR, WilliamsR::new(WILLR_LENGTH).calculate(candles));

        frame
    }

    fn set(&mut self, id: IndicatorId, raw: Vec<f64>) {
        self.series[id as usize] = IndicatorSeries::end_aligned(id, raw, self.len);
    }

    /// Number of bars (and positions in every series).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get one series by id.
    pub fn series(&self, id: IndicatorId) -> &IndicatorSeries {
        &self.series[id as usize]
    }

    /// Value of one indicator at the last bar.
    pub fn latest(&self, id: IndicatorId) -> Option<f64> {
        self.series(id).latest()
    }

    /// Indicators with no defined value anywhere.
    pub fn unavailable(&self) -> impl Iterator<Item = IndicatorId> + '_ {
        self.series
            .iter()
            .filter(|s| s.is_unavailable())
            .map(IndicatorSeries::id)
    }

    /// Fail for the first listed indicator whose whole series is undefined.
    ///
    /// A series shorter than its warm-up is `InsufficientHistory`; one with
    /// enough bars but only degenerate windows is `NoDefinedValue`.
    pub fn check_history(&self, ids: &[IndicatorId]) -> Result<(), SignalError> {
        let Some(&id) = ids.iter().find(|&&id| self.series(id).is_unavailable()) else {
            return Ok(());
        };

        if self.len < id.warmup() {
            Err(SignalError::InsufficientHistory {
                indicator: id.name(),
                required: id.warmup(),
                available: self.len,
            })
        } else {
            Err(SignalError::NoDefinedValue {
                indicator: id.name(),
                available: self.len,
            })
        }
    }

    /// Final value of every series plus the final close.
    pub fn latest_snapshot(&self) -> LatestSnapshot {
        LatestSnapshot {
            close: self.close,
            rsi: self.latest(IndicatorId::Rsi),
            macd: self.latest(IndicatorId::Macd),
            macd_signal: self.latest(IndicatorId::MacdSignal),
            macd_hist: self.latest(IndicatorId::MacdHistogram),
            bb_upper: self.latest(IndicatorId::BbUpper),
            bb_middle: self.latest(IndicatorId::BbMiddle),
            bb_lower: self.latest(IndicatorId::BbLower),
            atr: self.latest(IndicatorId::Atr),
            adx: self.latest(IndicatorId::Adx),
            di_plus: self.latest(IndicatorId::DiPlus),
            di_minus: self.latest(IndicatorId::DiMinus),
            stoch_k: self.latest(IndicatorId::StochK),
            stoch_d: self.latest(IndicatorId::StochD),
            vwap: self.latest(IndicatorId::Vwap),
            cci: self.latest(IndicatorId::Cci),
            roc: self.latest(IndicatorId::Roc),
            mfi: self.latest(IndicatorId::Mfi),
            ema_50: self.latest(IndicatorId::Ema50),
            ema_200: self.latest(IndicatorId::Ema200),
            williams_r: self.latest(IndicatorId::WilliamsR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::types::{Bar, Timeframe};

    fn make_series(len: usize) -> BarSeries {
        let bars = (0..len)
            .map(|i| {
                let price = 100.0 + (i as f64 * 0.3).sin() * 8.0 + i as f64 * 0.05;
                Bar::new(
                    i as i64 * 14_400_000,
                    price - 0.5,
                    price + 2.0,
                    price - 2.0,
                    price,
                    1_000.0 + (i % 7) as f64 * 150.0,
                )
            })
            .collect();
        BarSeries::new("BTC/USDT", Timeframe::Hour4, bars).unwrap()
    }

    #[test]
    fn test_ids_index_their_own_slot() {
        for (index, id) in IndicatorId::ALL.iter().enumerate() {
            assert_eq!(*id as usize, index);
        }
    }

    #[test]
    fn test_warmup_positions_are_undefined_before_fill() {
        let frame = IndicatorFrame::compute_unfilled(&make_series(250));

        for id in IndicatorId::ALL {
            let series = frame.series(id);
            let warmup = id.warmup();
            assert_eq!(series.len(), 250);
            assert!(
                series.values()[..warmup - 1].iter().all(Option::is_none),
                "{id} defined during warm-up"
            );
            assert!(series.values()[warmup - 1].is_some(), "{id} missing first value");
        }
    }

    #[test]
    fn test_ema_200_first_value_at_bar_200() {
        let frame = IndicatorFrame::compute_unfilled(&make_series(210));
        let ema = frame.series(IndicatorId::Ema200);

        assert_eq!(ema.undefined_count(), 199);
        assert!(ema.values()[199].is_some());
    }

    #[test]
    fn test_full_history_has_no_undefined_after_fill() {
        let frame = IndicatorFrame::compute(&make_series(300));

        for id in IndicatorId::ALL {
            let series = frame.series(id);
            assert_eq!(series.len(), 300);
            assert_eq!(series.undefined_count(), 0, "{id} still has gaps");
        }
        assert!(frame.check_history(&IndicatorId::ALL).is_ok());
    }

    #[test]
    fn test_fill_copies_first_computed_value_backward() {
        let series = make_series(220);
        let raw = IndicatorFrame::compute_unfilled(&series);
        let filled = IndicatorFrame::compute(&series);

        let first = raw.series(IndicatorId::Rsi).values()[14];
        assert!(filled.series(IndicatorId::Rsi).values()[..14]
            .iter()
            .all(|v| *v == first));
    }

    #[test]
    fn test_short_history_leaves_ema_200_unavailable() {
        let frame = IndicatorFrame::compute(&make_series(50));

        assert!(frame.series(IndicatorId::Ema200).is_unavailable());
        assert!(!frame.series(IndicatorId::Ema50).is_unavailable());
        assert_eq!(frame.unavailable().collect::<Vec<_>>(), vec![IndicatorId::Ema200]);

        let snapshot = frame.latest_snapshot();
        assert!(snapshot.ema_200.is_none());
        assert!(snapshot.ema_50.is_some());
        assert!(snapshot.rsi.is_some());
    }

    #[test]
    fn test_check_history_names_the_missing_indicator() {
        let frame = IndicatorFrame::compute(&make_series(10));

        let err = frame
            .check_history(&[IndicatorId::Rsi, IndicatorId::Macd])
            .unwrap_err();
        assert_eq!(
            err,
            SignalError::InsufficientHistory {
                indicator: "RSI",
                required: 15,
                available: 10
            }
        );
    }

    #[test]
    fn test_macd_line_and_di_start_at_their_own_warmup() {
        let frame = IndicatorFrame::compute_unfilled(&make_series(30));

        let first_defined = |id| frame.series(id).values().iter().position(Option::is_some);
        assert_eq!(first_defined(IndicatorId::Macd), Some(25));
        assert_eq!(first_defined(IndicatorId::DiPlus), Some(14));
        assert_eq!(first_defined(IndicatorId::DiMinus), Some(14));
        assert_eq!(first_defined(IndicatorId::Adx), Some(27));
        assert_eq!(first_defined(IndicatorId::MacdSignal), None);

        let filled = IndicatorFrame::compute(&make_series(30));
        assert_eq!(
            filled.unavailable().collect::<Vec<_>>(),
            vec![
                IndicatorId::MacdSignal,
                IndicatorId::MacdHistogram,
                IndicatorId::Ema50,
                IndicatorId::Ema200
            ]
        );
    }

    #[test]
    fn test_degenerate_series_is_not_short_history() {
        let bars = (0..60)
            .map(|i| {
                let price = 100.0 + (i as f64 * 0.3).sin() * 5.0;
                Bar::new(i as i64 * 14_400_000, price, price + 1.0, price - 1.0, price, 0.0)
            })
            .collect();
        let series = BarSeries::new("BTC/USDT", Timeframe::Hour4, bars).unwrap();
        let frame = IndicatorFrame::compute(&series);

        assert_eq!(
            frame.check_history(&[IndicatorId::Rsi, IndicatorId::Mfi]).unwrap_err(),
            SignalError::NoDefinedValue {
                indicator: "MFI",
                available: 60
            }
        );
    }

    #[test]
    fn test_single_bar_is_accepted() {
        let frame = IndicatorFrame::compute(&make_series(1));

        assert_eq!(frame.len(), 1);
        assert!(frame.latest_snapshot().close > 0.0);
        assert!(frame.latest(IndicatorId::Vwap).is_some());
        assert!(frame.latest(IndicatorId::Rsi).is_none());
    }

    #[test]
    fn test_end_aligned_padding() {
        let series = IndicatorSeries::end_aligned(IndicatorId::Roc, vec![1.0, f64::NAN, 3.0], 5);
        assert_eq!(series.values(), &[None, None, Some(1.0), None, Some(3.0)]);
    }
}
