//! Composite signal generation.
//!
//! Turns a bar series into one BUY/SELL/HOLD signal:
//! - [`classify_trend`]: EMA-50 vs EMA-200 trend label
//! - [`ScoreCard`]: seven independent threshold votes summed into a score
//! - [`CompositeSignal`]: the full pipeline, fallible or fail-soft

mod composite;
mod scoring;
mod trend;

pub use composite::{decide, CompositeSignal, Evaluation};
pub use scoring::{Rule, RuleVote, ScoreCard};
pub use trend::{classify, classify_trend};
