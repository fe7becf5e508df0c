//! Per-evaluation signal reports.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use signal_core::error::SignalError;
use signal_core::types::{Signal, Timeframe, Trend};
use signal_engine::Evaluation;
use std::io::{self, Write};

/// How a report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// `<timestamp> - Latest Signal: <SIGNAL>`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Outcome of one evaluation, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalReport {
    pub evaluated_at: DateTime<Utc>,
    pub symbol: String,
    pub timeframe: Timeframe,
    pub signal: Signal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_bar: Option<DateTime<Utc>>,
    /// Why the signal fell back to HOLD, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

impl SignalReport {
    pub fn new(
        evaluated_at: DateTime<Utc>,
        symbol: impl Into<String>,
        timeframe: Timeframe,
        signal: Signal,
        outcome: &Result<Evaluation, SignalError>,
    ) -> Self {
        let (trend, score, last_bar, degraded) = match outcome {
            Ok(evaluation) => (
                Some(evaluation.trend),
                Some(evaluation.score.total()),
                Utc.timestamp_millis_opt(evaluation.bar_timestamp).single(),
                None,
            ),
            Err(e) => (None, None, None, Some(e.to_string())),
        };

        Self {
            evaluated_at,
            symbol: symbol.into(),
            timeframe,
            signal,
            trend,
            score,
            last_bar,
            degraded,
        }
    }

    /// Plain status line.
    pub fn to_line(&self) -> String {
        format!(
            "{} - Latest Signal: {}",
            self.evaluated_at.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.signal
        )
    }

    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => self.to_line(),
            ReportFormat::Json => {
                serde_json::to_string(self).unwrap_or_else(|_| self.to_line())
            }
        }
    }
}

/// Destination for reports.
pub trait ReportSink: Send {
    fn publish(&mut self, report: &SignalReport) -> io::Result<()>;
}

/// Collects reports in memory.
impl ReportSink for Vec<SignalReport> {
    fn publish(&mut self, report: &SignalReport) -> io::Result<()> {
        self.push(report.clone());
        Ok(())
    }
}

/// Writes one rendered report per line.
pub struct WriterSink<W> {
    writer: W,
    format: ReportFormat,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W, format: ReportFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout(format: ReportFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write + Send> ReportSink for WriterSink<W> {
    fn publish(&mut self, report: &SignalReport) -> io::Result<()> {
        writeln!(self.writer, "{}", report.render(self.format))?;
        self.writer.flush()
    }
}
