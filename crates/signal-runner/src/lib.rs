//! Polling loop.
//!
//! Fetches the latest bars from an injected [`BarSource`], evaluates them
//! and publishes one report per cycle.
//!
//! [`BarSource`]: signal_core::traits::BarSource

mod runner;

pub use runner::{RunSummary, Runner, RunnerConfig};
