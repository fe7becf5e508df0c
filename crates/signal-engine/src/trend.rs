//! Trend classification from the fast and slow EMAs.

use signal_core::error::SignalError;
use signal_core::types::Trend;
use signal_indicators::IndicatorId;

/// Label the trend from defined EMA values.
pub fn classify(ema_fast: f64, ema_slow: f64) -> Trend {
    if ema_fast > ema_slow {
        Trend::Uptrend
    } else if ema_fast < ema_slow {
        Trend::Downtrend
    } else {
        Trend::Range
    }
}

/// Label the trend from the latest EMA-50 and EMA-200.
///
/// Fails with `ClassificationFailure` when either input is undefined.
pub fn classify_trend(ema_50: Option<f64>, ema_200: Option<f64>) -> Result<Trend, SignalError> {
    let undefined = |id: IndicatorId| SignalError::ClassificationFailure {
        source: Box::new(SignalError::UndefinedSnapshotValue { field: id.name() }),
    };

    let fast = ema_50.ok_or_else(|| undefined(IndicatorId::Ema50))?;
    let slow = ema_200.ok_or_else(|| undefined(IndicatorId::Ema200))?;

    Ok(classify(fast, slow))
}
