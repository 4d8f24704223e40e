//! Core data types used across the scanner

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV candlestick data, ordered oldest first wherever a slice is passed around
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Trading pair symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Symbol(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

/// Candle interval used by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    OneHour,
    OneDay,
}

impl Interval {
    /// Binance interval code
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 24h rolling ticker snapshot, refreshed every cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: Symbol,
    pub last_price: f64,
    pub price_change_percent: f64,
    /// Traded volume in quote asset units (USDT)
    pub quote_volume: f64,
}

/// Outcome of the daily breakout check for one symbol
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BreakoutResult {
    pub confirmed: bool,
    /// Today's close relative to yesterday's high, in percent (2 decimals)
    pub change_from_high_pct: f64,
    pub atr: f64,
    pub prev_high: f64,
    pub today_close: f64,
    /// `prev_high + atr`
    pub breakout_level: f64,
}

impl BreakoutResult {
    /// Zeroed, unconfirmed result
    pub fn unconfirmed() -> Self {
        Self::default()
    }
}

/// RSI momentum band, display only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiZone {
    pub fn label(&self) -> &'static str {
        match self {
            RsiZone::Oversold => "🟢 Oversold",
            RsiZone::Neutral => "⚪ Neutral",
            RsiZone::Overbought => "🔴 Overbought",
        }
    }
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Summary of one scan-and-alert cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub candidates: usize,
    pub confirmed: usize,
    pub dispatched: usize,
    pub failed_dispatches: usize,
    pub skipped_seen: usize,
    pub evaluation_errors: usize,
}
