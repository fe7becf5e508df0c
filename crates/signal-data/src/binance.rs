//! Binance spot klines over the public REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use signal_core::error::DataError;
use signal_core::traits::BarSource;
use signal_core::types::{Bar, Timeframe};
use std::time::Duration;
use tracing::debug;

use crate::rate_limit::RateLimiter;

/// Largest page the klines endpoint returns.
pub const MAX_KLINES: usize = 1000;

/// Binance connection settings.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    pub base_url: String,
    pub rate_limit: Duration,
    pub timeout: Duration,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            rate_limit: Duration::from_millis(1200),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Exchange symbol for a pair such as `BTC/USDT`.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| *c != '/' && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

/// Binance kline source.
pub struct BinanceSource {
    config: BinanceConfig,
    client: Client,
    limiter: RateLimiter,
}

impl BinanceSource {
    pub fn new(config: BinanceConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DataError::Connection(e.to_string()))?;
        let limiter = RateLimiter::new(config.rate_limit);

        Ok(Self {
            config,
            client,
            limiter,
        })
    }

    fn klines_url(&self) -> String {
        format!("{}/api/v3/klines", self.config.base_url.trim_end_matches('/'))
    }
}

/// Convert kline rows into bars.
///
/// Row layout: `[open_time, open, high, low, close, volume, ...]`, prices
/// and volume as decimal strings.
fn parse_klines(rows: &[Vec<Value>]) -> Result<Vec<Bar>, DataError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            if row.len() < 6 {
                return Err(DataError::Parse(format!(
                    "kline {} has {} fields, expected at least 6",
                    i,
                    row.len()
                )));
            }

            let timestamp = row[0]
                .as_i64()
                .ok_or_else(|| DataError::Parse(format!("kline {}: bad open time", i)))?;
            let field = |idx: usize| number(&row[idx]).ok_or_else(|| {
                DataError::Parse(format!("kline {}: bad numeric field {}", i, idx))
            });

            Ok(Bar::new(
                timestamp,
                field(1)?,
                field(2)?,
                field(3)?,
                field(4)?,
                field(5)?,
            ))
        })
        .collect()
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

#[async_trait]
impl BarSource for BinanceSource {
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, DataError> {
        if limit == 0 || limit > MAX_KLINES {
            return Err(DataError::Internal(format!(
                "limit {} outside 1..={}",
                limit, MAX_KLINES
            )));
        }

        let pair = normalize_symbol(symbol);
        let params = [
            ("symbol", pair.clone()),
            ("interval", timeframe.code().to_string()),
            ("limit", limit.to_string()),
        ];

        self.limiter.acquire().await;

        let resp = self
            .client
            .get(self.klines_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| DataError::Connection(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::BAD_REQUEST && message.contains("Invalid symbol") {
                return Err(DataError::SymbolNotFound(symbol.to_string()));
            }
            return Err(DataError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let rows: Vec<Vec<Value>> = resp
            .json()
            .await
            .map_err(|e| DataError::Parse(e.to_string()))?;

        if rows.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        let bars = parse_klines(&rows)?;
        debug!(symbol = %pair, interval = timeframe.code(), bars = bars.len(), "fetched klines");
        Ok(bars)
    }

    fn name(&self) -> &str {
        "binance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("BTC/USDT"), "BTCUSDT");
        assert_eq!(normalize_symbol("eth-usdt"), "ETHUSDT");
        assert_eq!(normalize_symbol("BNBUSDT"), "BNBUSDT");
    }

    #[test]
    fn test_parse_klines() {
        let rows: Vec<Vec<Value>> = serde_json::from_value(json!([
            [1_700_000_000_000_i64, "100.5", "110.0", "99.0", "105.25", "12.5", 1_700_014_399_999_i64, "1300.0", 42, "6.0", "600.0", "0"],
            [1_700_014_400_000_i64, "105.25", "106.0", "101.0", "102.0", "8.0", 1_700_028_799_999_i64, "820.0", 30, "4.0", "400.0", "0"]
        ]))
        .unwrap();

        let bars = parse_klines(&rows).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp, 1_700_000_000_000);
        assert!((bars[0].open - 100.5).abs() < 1e-10);
        assert!((bars[0].close - 105.25).abs() < 1e-10);
        assert!((bars[1].volume - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_parse_klines_rejects_short_rows() {
        let rows = vec![vec![json!(0), json!("1")]];
        assert!(matches!(parse_klines(&rows), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_parse_klines_rejects_bad_numbers() {
        let rows = vec![vec![
            json!(0),
            json!("1"),
            json!("oops"),
            json!("1"),
            json!("1"),
            json!("1"),
        ]];
        assert!(matches!(parse_klines(&rows), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_klines_url_trims_slash() {
        let source = BinanceSource::new(BinanceConfig {
            base_url: "http://localhost:9/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(source.klines_url(), "http://localhost:9/api/v3/klines");
    }

    #[tokio::test]
    async fn test_limit_out_of_range() {
        let source = BinanceSource::new(BinanceConfig::default()).unwrap();
        let result = source.fetch_bars("BTC/USDT", Timeframe::Hour4, 0).await;
        assert!(matches!(result, Err(DataError::Internal(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let source = BinanceSource::new(BinanceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            rate_limit: Duration::from_millis(1),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let result = source.fetch_bars("BTC/USDT", Timeframe::Hour4, 5).await;
        assert!(matches!(result, Err(DataError::Connection(_))));
    }
}
