//! Composite signal: indicators, trend, score, decision.

use serde::Serialize;
use signal_core::error::SignalError;
use signal_core::types::{BarSeries, Signal, Trend};
use signal_indicators::{IndicatorFrame, LatestSnapshot};
use tracing::{debug, warn};

use crate::scoring::{Rule, ScoreCard};
use crate::trend::classify_trend;

/// Combine trend and score into the final signal.
///
/// BUY needs an uptrend and a positive score, SELL a downtrend and a
/// negative score. Everything else, RANGE included, is HOLD.
pub fn decide(trend: Trend, score: i32) -> Signal {
    match trend {
        Trend::Uptrend if score > 0 => Signal::Buy,
        Trend::Downtrend if score < 0 => Signal::Sell,
        _ => Signal::Hold,
    }
}

/// Everything one successful evaluation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub signal: Signal,
    pub trend: Trend,
    pub score: ScoreCard,
    pub snapshot: LatestSnapshot,
    /// Open time of the last bar evaluated (ms since epoch).
    pub bar_timestamp: i64,
}

/// Stateless signal generator over a bar series.
///
/// Holds no state between calls; evaluating the same series twice gives
/// the same result.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeSignal;

impl CompositeSignal {
    pub fn new() -> Self {
        Self
    }

    /// Run the full pipeline, surfacing any data-quality problem.
    pub fn try_evaluate(&self, series: &BarSeries) -> Result<Evaluation, SignalError> {
        let frame = IndicatorFrame::compute(series);
        frame.check_history(&Rule::scored_indicators())?;

        let snapshot = frame.latest_snapshot();
        let trend = classify_trend(snapshot.ema_50, snapshot.ema_200)?;
        let (signal, score) = self.evaluate_snapshot(&snapshot, trend)?;

        debug!(
            symbol = series.symbol(),
            trend = %trend,
            score = score.total(),
            signal = %signal,
            "evaluation complete"
        );

        Ok(Evaluation {
            signal,
            trend,
            score,
            snapshot,
            bar_timestamp: series.last().timestamp,
        })
    }

    /// Score a snapshot under a known trend.
    pub fn evaluate_snapshot(
        &self,
        snapshot: &LatestSnapshot,
        trend: Trend,
    ) -> Result<(Signal, ScoreCard), SignalError> {
        let score = ScoreCard::score(snapshot)?;
        Ok((decide(trend, score.total()), score))
    }

    /// Run the full pipeline; any data-quality problem yields HOLD.
    pub fn evaluate(&self, series: &BarSeries) -> Signal {
        Self::settle(series.symbol(), &self.try_evaluate(series))
    }

    /// Signal carried by an evaluation outcome, HOLD on error.
    pub fn settle(symbol: &str, outcome: &Result<Evaluation, SignalError>) -> Signal {
        match outcome {
            Ok(evaluation) => evaluation.signal,
            Err(e) => {
                warn!(symbol, error = %e, "evaluation degraded to HOLD");
                Signal::Hold
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::types::{Bar, Timeframe};

    fn make_series(len: usize, slope: f64) -> BarSeries {
        let bars = (0..len)
            .map(|i| {
                let close = 100.0 + i as f64 * slope + (i as f64 * 0.4).sin() * 3.0;
                Bar::new(
                    i as i64 * 14_400_000,
                    close - 0.3,
                    close + 1.5,
                    close - 1.5,
                    close,
                    500.0 + (i % 5) as f64 * 100.0,
                )
            })
            .collect();
        BarSeries::new("BTC/USDT", Timeframe::Hour4, bars).unwrap()
    }

    fn bullish_snapshot() -> LatestSnapshot {
        LatestSnapshot {
            close: 85.0,
            rsi: Some(25.0),
            macd: Some(1.5),
            macd_signal: Some(1.0),
            bb_upper: Some(110.0),
            bb_middle: Some(100.0),
            bb_lower: Some(90.0),
            stoch_k: Some(15.0),
            stoch_d: Some(18.0),
            cci: Some(-120.0),
            mfi: Some(15.0),
            williams_r: Some(-85.0),
            ..LatestSnapshot::new(85.0)
        }
    }

    fn neutral_snapshot() -> LatestSnapshot {
        LatestSnapshot {
            close: 100.0,
            rsi: Some(50.0),
            macd: Some(1.0),
            macd_signal: Some(1.0),
            stoch_k: Some(50.0),
            stoch_d: Some(50.0),
            cci: Some(0.0),
            mfi: Some(50.0),
            williams_r: Some(-50.0),
            ..bullish_snapshot()
        }
    }

    #[test]
    fn test_decide_table() {
        assert_eq!(decide(Trend::Uptrend, 3), Signal::Buy);
        assert_eq!(decide(Trend::Downtrend, -1), Signal::Sell);
        assert_eq!(decide(Trend::Uptrend, -2), Signal::Hold);
        assert_eq!(decide(Trend::Downtrend, 4), Signal::Hold);
        assert_eq!(decide(Trend::Uptrend, 0), Signal::Hold);
        assert_eq!(decide(Trend::Range, 7), Signal::Hold);
        assert_eq!(decide(Trend::Range, -7), Signal::Hold);
    }

    #[test]
    fn test_uptrend_full_bullish_vote_buys() {
        let engine = CompositeSignal::new();
        let (signal, score) = engine
            .evaluate_snapshot(&bullish_snapshot(), Trend::Uptrend)
            .unwrap();

        assert_eq!(score.total(), 7);
        assert_eq!(signal, Signal::Buy);
    }

    #[test]
    fn test_downtrend_with_bullish_vote_holds() {
        let engine = CompositeSignal::new();
        let (signal, score) = engine
            .evaluate_snapshot(&bullish_snapshot(), Trend::Downtrend)
            .unwrap();

        assert_eq!(score.total(), 7);
        assert_eq!(signal, Signal::Hold);
    }

    #[test]
    fn test_uptrend_neutral_vote_holds() {
        let engine = CompositeSignal::new();
        let (signal, score) = engine
            .evaluate_snapshot(&neutral_snapshot(), Trend::Uptrend)
            .unwrap();

        assert_eq!(score.total(), 0);
        assert_eq!(signal, Signal::Hold);
    }

    #[test]
    fn test_short_series_fails_classification_and_holds() {
        let engine = CompositeSignal::new();
        let series = make_series(50, 0.2);

        match engine.try_evaluate(&series) {
            Err(SignalError::ClassificationFailure { source }) => assert_eq!(
                *source,
                SignalError::UndefinedSnapshotValue { field: "EMA_200" }
            ),
            other => panic!("expected classification failure, got {other:?}"),
        }
        assert_eq!(engine.evaluate(&series), Signal::Hold);
    }

    #[test]
    fn test_tiny_series_reports_insufficient_history() {
        let engine = CompositeSignal::new();
        let series = make_series(10, 0.2);

        assert_eq!(
            engine.try_evaluate(&series).unwrap_err(),
            SignalError::InsufficientHistory {
                indicator: "RSI",
                required: 15,
                available: 10
            }
        );
        assert_eq!(engine.evaluate(&series), Signal::Hold);
    }

    #[test]
    fn test_full_history_evaluates() {
        let engine = CompositeSignal::new();
        let series = make_series(300, 0.5);
        let evaluation = engine.try_evaluate(&series).unwrap();

        assert_eq!(evaluation.trend, Trend::Uptrend);
        assert_eq!(
            evaluation.signal,
            decide(evaluation.trend, evaluation.score.total())
        );
        assert_eq!(evaluation.bar_timestamp, series.last().timestamp);
        assert!((evaluation.snapshot.close - series.last().close).abs() < 1e-10);
    }

    #[test]
    fn test_falling_market_is_downtrend() {
        let engine = CompositeSignal::new();
        let evaluation = engine.try_evaluate(&make_series(300, -0.2)).unwrap();

        assert_eq!(evaluation.trend, Trend::Downtrend);
        assert_ne!(evaluation.signal, Signal::Buy);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let engine = CompositeSignal::new();
        let series = make_series(260, 0.1);

        assert_eq!(engine.try_evaluate(&series), engine.try_evaluate(&series));
        assert_eq!(
            engine.evaluate_snapshot(&bullish_snapshot(), Trend::Uptrend),
            engine.evaluate_snapshot(&bullish_snapshot(), Trend::Uptrend)
        );
    }

    #[test]
    fn test_evaluation_serializes() {
        let evaluation = CompositeSignal::new()
            .try_evaluate(&make_series(250, 0.5))
            .unwrap();
        let json = serde_json::to_value(&evaluation).unwrap();

        assert_eq!(json["trend"], "UPTREND");
        assert_eq!(json["score"]["votes"].as_array().unwrap().len(), 7);
    }
}
