//! Market data seam used by the scanner and the breakout detector

use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::ScanResult;
use crate::types::{Candle, Interval, Symbol, Ticker};

/// Read-only market data source
///
/// Implementations surface every failure as `ScanError`; deciding how to
/// degrade is left to the caller.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Symbols currently open for trading
    async fn tradable_symbols(&self) -> ScanResult<HashSet<Symbol>>;

    /// 24h ticker statistics for every listed symbol
    async fn tickers_24h(&self) -> ScanResult<Vec<Ticker>>;

    /// Most recent `limit` candles, oldest first. The last candle may still be forming.
    async fn klines(&self, symbol: &Symbol, interval: Interval, limit: u32)
        -> ScanResult<Vec<Candle>>;
}
