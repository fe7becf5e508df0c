//! Logging setup and signal reporting.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::{ReportFormat, ReportSink, SignalReport, WriterSink};
