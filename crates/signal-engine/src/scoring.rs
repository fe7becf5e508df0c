//! Threshold votes over the latest snapshot.
//!
//! Every rule looks at its own inputs and votes +1 (bullish), -1
//! (bearish) or 0. Comparisons are strict: a value sitting exactly on a
//! threshold does not vote.

use serde::Serialize;
use signal_core::error::SignalError;
use signal_indicators::{IndicatorId, LatestSnapshot};
use std::fmt;
use tracing::debug;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const STOCH_OVERSOLD: f64 = 20.0;
const STOCH_OVERBOUGHT: f64 = 80.0;
const CCI_OVERSOLD: f64 = -100.0;
const CCI_OVERBOUGHT: f64 = 100.0;
const MFI_OVERSOLD: f64 = 20.0;
const MFI_OVERBOUGHT: f64 = 80.0;
const WILLR_OVERSOLD: f64 = -80.0;
const WILLR_OVERBOUGHT: f64 = -20.0;

/// One scoring rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rule {
    Rsi,
    Macd,
    Bollinger,
    Stochastic,
    Cci,
    Mfi,
    WilliamsR,
}

impl Rule {
    pub const ALL: [Rule; 7] = [
        Rule::Rsi,
        Rule::Macd,
        Rule::Bollinger,
        Rule::Stochastic,
        Rule::Cci,
        Rule::Mfi,
        Rule::WilliamsR,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::Rsi => "RSI",
            Rule::Macd => "MACD",
            Rule::Bollinger => "Bollinger",
            Rule::Stochastic => "Stochastic",
            Rule::Cci => "CCI",
            Rule::Mfi => "MFI",
            Rule::WilliamsR => "Williams %R",
        }
    }

    /// Indicator series the rule reads.
    pub fn inputs(&self) -> &'static [IndicatorId] {
        match self {
            Rule::Rsi => &[IndicatorId::Rsi],
            Rule::Macd => &[IndicatorId::Macd, IndicatorId::MacdSignal],
            Rule::Bollinger => &[IndicatorId::BbUpper, IndicatorId::BbLower],
            Rule::Stochastic => &[IndicatorId::StochK, IndicatorId::StochD],
            Rule::Cci => &[IndicatorId::Cci],
            Rule::Mfi => &[IndicatorId::Mfi],
            Rule::WilliamsR => &[IndicatorId::WilliamsR],
        }
    }

    /// Every indicator read by any rule, in rule order.
    pub fn scored_indicators() -> Vec<IndicatorId> {
        Rule::ALL.iter().flat_map(|rule| rule.inputs()).copied().collect()
    }

    /// Vote of this rule on a snapshot.
    pub fn vote(&self, snapshot: &LatestSnapshot) -> Result<i8, SignalError> {
        let vote = match self {
            Rule::Rsi => {
                let rsi = require(snapshot.rsi, IndicatorId::Rsi)?;
                directional(rsi < RSI_OVERSOLD, rsi > RSI_OVERBOUGHT)
            }
            Rule::Macd => {
                let macd = require(snapshot.macd, IndicatorId::Macd)?;
                let signal = require(snapshot.macd_signal, IndicatorId::MacdSignal)?;
                directional(macd > signal, macd < signal)
            }
            Rule::Bollinger => {
                let upper = require(snapshot.bb_upper, IndicatorId::BbUpper)?;
                let lower = require(snapshot.bb_lower, IndicatorId::BbLower)?;
                directional(snapshot.close < lower, snapshot.close > upper)
            }
            Rule::Stochastic => {
                let k = require(snapshot.stoch_k, IndicatorId::StochK)?;
                let d = require(snapshot.stoch_d, IndicatorId::StochD)?;
                directional(
                    k < STOCH_OVERSOLD && d < STOCH_OVERSOLD,
                    k > STOCH_OVERBOUGHT && d > STOCH_OVERBOUGHT,
                )
            }
            Rule::Cci => {
                let cci = require(snapshot.cci, IndicatorId::Cci)?;
                directional(cci < CCI_OVERSOLD, cci > CCI_OVERBOUGHT)
            }
            Rule::Mfi => {
                let mfi = require(snapshot.mfi, IndicatorId::Mfi)?;
                directional(mfi < MFI_OVERSOLD, mfi > MFI_OVERBOUGHT)
            }
            Rule::WilliamsR => {
                let willr = require(snapshot.williams_r, IndicatorId::WilliamsR)?;
                directional(willr < WILLR_OVERSOLD, willr > WILLR_OVERBOUGHT)
            }
        };
        Ok(vote)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn require(value: Option<f64>, id: IndicatorId) -> Result<f64, SignalError> {
    value.ok_or(SignalError::UndefinedSnapshotValue { field: id.name() })
}

fn directional(bullish: bool, bearish: bool) -> i8 {
    if bullish {
        1
    } else if bearish {
        -1
    } else {
        0
    }
}

/// A single rule's contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleVote {
    pub rule: Rule,
    pub vote: i8,
}

/// Per-rule votes and their sum, in `[-7, 7]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    votes: Vec<RuleVote>,
    total: i32,
}

impl ScoreCard {
    /// Run every rule against the snapshot.
    pub fn score(snapshot: &LatestSnapshot) -> Result<Self, SignalError> {
        let votes = Rule::ALL
            .iter()
            .map(|&rule| rule.vote(snapshot).map(|vote| RuleVote { rule, vote }))
            .collect::<Result<Vec<_>, _>>()?;

        for v in votes.iter().filter(|v| v.vote != 0) {
            debug!(rule = v.rule.name(), vote = v.vote, "rule voted");
        }

        let total = votes.iter().map(|v| i32::from(v.vote)).sum();
        Ok(Self { votes, total })
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn votes(&self) -> &[RuleVote] {
        &self.votes
    }

    /// Vote cast by one rule.
    pub fn vote_of(&self, rule: Rule) -> i8 {
        self.votes
            .iter()
            .find(|v| v.rule == rule)
            .map_or(0, |v| v.vote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_snapshot() -> LatestSnapshot {
        LatestSnapshot {
            close: 100.0,
            rsi: Some(50.0),
            macd: Some(1.0),
            macd_signal: Some(1.0),
            bb_upper: Some(110.0),
            bb_middle: Some(100.0),
            bb_lower: Some(90.0),
            stoch_k: Some(50.0),
            stoch_d: Some(50.0),
            cci: Some(0.0),
            mfi: Some(50.0),
            williams_r: Some(-50.0),
            ..LatestSnapshot::new(100.0)
        }
    }

    #[test]
    fn test_neutral_snapshot_scores_zero() {
        let card = ScoreCard::score(&neutral_snapshot()).unwrap();
        assert_eq!(card.total(), 0);
        assert_eq!(card.votes().len(), 7);
    }

    #[test]
    fn test_all_bullish_scores_seven() {
        let snapshot = LatestSnapshot {
            close: 85.0,
            rsi: Some(25.0),
            macd: Some(1.5),
            macd_signal: Some(1.0),
            stoch_k: Some(15.0),
            stoch_d: Some(18.0),
            cci: Some(-120.0),
            mfi: Some(15.0),
            williams_r: Some(-85.0),
            ..neutral_snapshot()
        };
        let card = ScoreCard::score(&snapshot).unwrap();

        assert_eq!(card.total(), 7);
        assert!(Rule::ALL.iter().all(|&rule| card.vote_of(rule) == 1));
    }

    #[test]
    fn test_all_bearish_scores_minus_seven() {
        let snapshot = LatestSnapshot {
            close: 115.0,
            rsi: Some(75.0),
            macd: Some(0.5),
            macd_signal: Some(1.0),
            stoch_k: Some(85.0),
            stoch_d: Some(90.0),
            cci: Some(150.0),
            mfi: Some(85.0),
            williams_r: Some(-10.0),
            ..neutral_snapshot()
        };

        assert_eq!(ScoreCard::score(&snapshot).unwrap().total(), -7);
    }

    #[test]
    fn test_rsi_thresholds_are_strict() {
        for rsi in [30.0, 70.0] {
            let snapshot = LatestSnapshot {
                rsi: Some(rsi),
                ..neutral_snapshot()
            };
            assert_eq!(Rule::Rsi.vote(&snapshot).unwrap(), 0);
        }

        let just_below = LatestSnapshot {
            rsi: Some(29.99),
            ..neutral_snapshot()
        };
        assert_eq!(Rule::Rsi.vote(&just_below).unwrap(), 1);
    }

    #[test]
    fn test_stochastic_needs_both_lines() {
        let snapshot = LatestSnapshot {
            stoch_k: Some(15.0),
            stoch_d: Some(25.0),
            ..neutral_snapshot()
        };
        assert_eq!(Rule::Stochastic.vote(&snapshot).unwrap(), 0);
    }

    #[test]
    fn test_williams_r_boundaries() {
        let at_oversold = LatestSnapshot {
            williams_r: Some(-80.0),
            ..neutral_snapshot()
        };
        let above_overbought = LatestSnapshot {
            williams_r: Some(-19.0),
            ..neutral_snapshot()
        };

        assert_eq!(Rule::WilliamsR.vote(&at_oversold).unwrap(), 0);
        assert_eq!(Rule::WilliamsR.vote(&above_overbought).unwrap(), -1);
    }

    #[test]
    fn test_undefined_input_is_an_error() {
        let snapshot = LatestSnapshot {
            mfi: None,
            ..neutral_snapshot()
        };

        assert_eq!(
            ScoreCard::score(&snapshot).unwrap_err(),
            SignalError::UndefinedSnapshotValue { field: "MFI" }
        );
    }

    #[test]
    fn test_unused_indicators_do_not_vote() {
        let scored = Rule::scored_indicators();

        for id in [
            IndicatorId::Roc,
            IndicatorId::Atr,
            IndicatorId::Adx,
            IndicatorId::DiPlus,
            IndicatorId::DiMinus,
            IndicatorId::Vwap,
        ] {
            assert!(!scored.contains(&id), "{id} should not be scored");
        }
        assert_eq!(
            scored,
            vec![
                IndicatorId::Rsi,
                IndicatorId::Macd,
                IndicatorId::MacdSignal,
                IndicatorId::BbUpper,
                IndicatorId::BbLower,
                IndicatorId::StochK,
                IndicatorId::StochD,
                IndicatorId::Cci,
                IndicatorId::Mfi,
                IndicatorId::WilliamsR,
            ]
        );
    }
}
