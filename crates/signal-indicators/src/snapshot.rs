//! Latest indicator values handed to the scoring stage.

use serde::{Deserialize, Serialize};

/// Final value of every indicator series plus the final close.
///
/// `None` marks an indicator with no defined value at the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatestSnapshot {
    pub close: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub atr: Option<f64>,
    pub adx: Option<f64>,
    pub di_plus: Option<f64>,
    pub di_minus: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub vwap: Option<f64>,
    pub cci: Option<f64>,
    pub roc: Option<f64>,
    pub mfi: Option<f64>,
    pub ema_50: Option<f64>,
    pub ema_200: Option<f64>,
    pub williams_r: Option<f64>,
}

impl LatestSnapshot {
    /// Snapshot with a close price and no indicator values.
    pub fn new(close: f64) -> Self {
        Self {
            close,
            ..Default::default()
        }
    }
}
