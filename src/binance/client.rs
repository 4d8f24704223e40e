//! Binance USDⓈ-M futures client for public market data
//!
//! No API key required for public market data endpoints.
//!
//! # Example
//! ```no_run
//! use breakout_scanner::binance::BinanceFuturesClient;
//! use breakout_scanner::market_data::MarketData;
//! use breakout_scanner::{Interval, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BinanceFuturesClient::new();
//!     let candles = client.klines(&Symbol::new("BTCUSDT"), Interval::OneDay, 15).await?;
//!     println!("Fetched {} candles", candles.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::types::{BinanceKline, ExchangeInfo, TickerResponse};
use crate::config::BinanceConfig;
use crate::error::{ScanError, ScanResult};
use crate::market_data::MarketData;
use crate::types::{Candle, Interval, Symbol, Ticker};

/// Maximum klines per request (Binance futures limit)
const MAX_KLINES_PER_REQUEST: u32 = 1500;

/// Binance futures API client
#[derive(Debug, Clone)]
pub struct BinanceFuturesClient {
    client: Client,
    base_url: String,
}

impl Default for BinanceFuturesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BinanceFuturesClient {
    /// Create a client against the production endpoint
    pub fn new() -> Self {
        Self::with_config(&BinanceConfig::default())
    }

    /// Create a client with custom base URL and timeout
    pub fn with_config(config: &BinanceConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        BinanceFuturesClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/fapi/v1/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> ScanResult<T> {
        let url = self.endpoint(path);
        let response = self.client.get(&url).query(params).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::Api { status, body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ScanError::Parse(format!("{} response: {}", path, e)))
    }
}

#[async_trait]
impl MarketData for BinanceFuturesClient {
    async fn tradable_symbols(&self) -> ScanResult<HashSet<Symbol>> {
        let info: ExchangeInfo = self.get_json("exchangeInfo", &[]).await?;
        let tradable = info.tradable_symbols();
        debug!(
            "exchangeInfo: {} symbols, {} tradable",
            info.symbols.len(),
            tradable.len()
        );
        Ok(tradable)
    }

    async fn tickers_24h(&self) -> ScanResult<Vec<Ticker>> {
        let raw: Vec<TickerResponse> = self.get_json("ticker/24hr", &[]).await?;
        Ok(raw.into_iter().map(Ticker::from).collect())
    }

    async fn klines(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: u32,
    ) -> ScanResult<Vec<Candle>> {
        let limit = limit.clamp(1, MAX_KLINES_PER_REQUEST);
        let params = [
            ("symbol", symbol.as_str().to_string()),
            ("interval", interval.as_str().to_string()),
            ("limit", limit.to_string()),
        ];

        debug!(
            "Fetching klines: symbol={}, interval={}, limit={}",
            symbol, interval, limit
        );

        let raw_data: Vec<Vec<serde_json::Value>> = self.get_json("klines", &params).await?;
        let total = raw_data.len();

        let mut candles: Vec<Candle> = raw_data
            .iter()
            .filter_map(|row| BinanceKline::from_raw(row))
            .filter_map(|k| k.to_candle())
            .collect();

        if candles.len() < total {
            warn!(
                "Dropped {} malformed {} klines for {}",
                total - candles.len(),
                interval,
                symbol
            );
        }

        candles.sort_by_key(|c| c.open_time);
        candles.dedup_by_key(|c| c.open_time);

        Ok(candles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = BinanceFuturesClient::new();
        assert_eq!(client.base_url(), "https://fapi.binance.com");
        assert_eq!(
            client.endpoint("klines"),
            "https://fapi.binance.com/fapi/v1/klines"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = BinanceConfig {
            base_url: "http://localhost:8080/".to_string(),
            timeout_secs: 5,
        };
        let client = BinanceFuturesClient::with_config(&config);
        assert_eq!(
            client.endpoint("ticker/24hr"),
            "http://localhost:8080/fapi/v1/ticker/24hr"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let config = BinanceConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
        };
        let client = BinanceFuturesClient::with_config(&config);

        let result = client.tradable_symbols().await;
        assert!(matches!(result, Err(ScanError::Http(_))));
    }
}
