//! Binance USDⓈ-M futures wire types: klines, 24h tickers and exchange info

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::{Candle, Symbol, Ticker};

/// Symbol status that marks a contract as tradable
pub const STATUS_TRADING: &str = "TRADING";

/// Binance kline/candlestick data
/// API returns an array: [open_time, open, high, low, close, volume, close_time,
///                        quote_volume, trades, taker_buy_base, taker_buy_quote, ignore]
#[derive(Debug, Clone)]
pub struct BinanceKline {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: i64,
}

impl BinanceKline {
    /// Parse from raw JSON array returned by Binance API
    pub fn from_raw(raw: &[serde_json::Value]) -> Option<Self> {
        if raw.len() < 7 {
            return None;
        }

        Some(BinanceKline {
            open_time: raw[0].as_i64()?,
            open: raw[1].as_str()?.parse().ok()?,
            high: raw[2].as_str()?.parse().ok()?,
            low: raw[3].as_str()?.parse().ok()?,
            close: raw[4].as_str()?.parse().ok()?,
            volume: raw[5].as_str()?.parse().ok()?,
            close_time: raw[6].as_i64()?,
        })
    }

    pub fn to_candle(&self) -> Option<Candle> {
        Some(Candle {
            open_time: DateTime::from_timestamp_millis(self.open_time)?,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        })
    }
}

/// Entry of `GET /fapi/v1/ticker/24hr`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerResponse {
    pub symbol: String,
    #[serde(deserialize_with = "deserialize_f64_or_string")]
    pub last_price: f64,
    #[serde(deserialize_with = "deserialize_f64_or_string")]
    pub price_change_percent: f64,
    #[serde(deserialize_with = "deserialize_f64_or_string")]
    pub quote_volume: f64,
}

impl From<TickerResponse> for Ticker {
    fn from(t: TickerResponse) -> Self {
        Ticker {
            symbol: Symbol::new(t.symbol),
            last_price: t.last_price,
            price_change_percent: t.price_change_percent,
            quote_volume: t.quote_volume,
        }
    }
}

/// Subset of `GET /fapi/v1/exchangeInfo`
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
}

impl ExchangeInfo {
    /// Symbols currently in `TRADING` status
    pub fn tradable_symbols(&self) -> HashSet<Symbol> {
        self.symbols
            .iter()
            .filter(|s| s.status == STATUS_TRADING)
            .map(|s| Symbol::new(s.symbol.clone()))
            .collect()
    }
}

// Custom deserializer for f64 that can handle string representation
fn deserialize_f64_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct F64OrString;

    impl<'de> Visitor<'de> for F64OrString {
        type Value = f64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number or a string representing a number")
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.parse().map_err(de::Error::custom)
        }
    }

    deserializer.deserialize_any(F64OrString)
}
