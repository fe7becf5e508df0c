//! CSV bar source.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use signal_core::error::DataError;
use signal_core::traits::BarSource;
use signal_core::types::{Bar, Timeframe};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
}

/// Bars replayed from a CSV file.
///
/// The file holds a single instrument; the requested symbol and
/// timeframe are not checked against it.
#[derive(Debug, Clone)]
pub struct CsvBarSource {
    path: PathBuf,
}

impl CsvBarSource {
    /// Create a new CSV source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all bars, sorted oldest first.
    pub fn load_all(&self) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| DataError::Parse(e.to_string()))?;

        let mut bars = Vec::new();

        for (line, result) in reader.deserialize().enumerate() {
            let record: CsvRecord =
                result.map_err(|e| DataError::Parse(format!("row {}: {}", line + 1, e)))?;

            bars.push(Bar::new(
                parse_timestamp(&record.date)?,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        bars.sort_by_key(|b| b.timestamp);

        debug!(path = %self.path.display(), bars = bars.len(), "loaded CSV bars");
        Ok(bars)
    }
}

/// Parse the date formats seen in exported candle files.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M"];
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    for format in DATE_FORMATS {
        if let Some(dt) = NaiveDate::parse_from_str(date_str, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    // Unix timestamp; more than 10 digits means milliseconds
    if let Ok(ts) = date_str.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return ts
            .checked_mul(1000)
            .ok_or_else(|| DataError::Parse(format!("Timestamp out of range: {}", date_str)));
    }

    Err(DataError::Parse(format!("Could not parse date: {}", date_str)))
}

#[async_trait]
impl BarSource for CsvBarSource {
    async fn fetch_bars(
        &self,
        _symbol: &str,
        _timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let mut bars = self.load_all()?;
        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        let skip = bars.len().saturating_sub(limit);
        bars.drain(..skip);
        Ok(bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "signal-data-{}-{}.csv",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1970-01-02").unwrap(), 86_400_000);
        assert_eq!(parse_timestamp("1970-01-01 04:00:00").unwrap(), 14_400_000);
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_timestamp_out_of_range() {
        assert!(matches!(
            parse_timestamp(&i64::MIN.to_string()),
            Err(DataError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CsvBarSource::new("/definitely/not/here.csv"),
            Err(DataError::NoDataAvailable)
        ));
    }

    #[test]
    fn test_load_sorts_and_defaults_volume() {
        let path = write_csv(
            "sorted",
            "timestamp,open,high,low,close\n\
             1970-01-01 08:00:00,3,4,2,3.5\n\
             1970-01-01 04:00:00,1,2,0.5,1.5\n",
        );
        let bars = CsvBarSource::new(&path).unwrap().load_all().unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp, 14_400_000);
        assert!((bars[1].close - 3.5).abs() < 1e-10);
        assert_eq!(bars[0].volume, 0.0);
    }

    #[tokio::test]
    async fn test_fetch_returns_most_recent_bars() {
        let rows: String = (0..10)
            .map(|i| format!("{},{},{},{},{},{}\n", i * 14_400, i, i + 1, i, i, 100))
            .collect();
        let path = write_csv("recent", &format!("Date,Open,High,Low,Close,Volume\n{rows}"));

        let source = CsvBarSource::new(&path).unwrap();
        let bars = source.fetch_bars("BTC/USDT", Timeframe::Hour4, 4).await.unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(bars.len(), 4);
        assert!((bars[0].close - 6.0).abs() < 1e-10);
        assert!((bars[3].close - 9.0).abs() < 1e-10);
    }

    #[test]
    fn test_malformed_row_is_parse_error() {
        let path = write_csv("bad", "date,open,high,low,close\n2024-01-01,abc,1,1,1\n");
        let result = CsvBarSource::new(&path).unwrap().load_all();
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(DataError::Parse(_))));
    }
}
