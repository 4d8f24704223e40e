//! Market scanner: builds the per-cycle candidate list
//!
//! 1. tradable symbol set from exchange metadata (empty set aborts the cycle)
//! 2. 24h tickers for every symbol
//! 3. quote suffix, tradable, liquidity, price and leveraged-token filters
//! 4. rank by 24h % change, largest gainers first
//! 5. keep the top N

use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ScannerConfig;
use crate::error::{ScanError, ScanResult};
use crate::market_data::MarketData;
use crate::types::{Symbol, Ticker};

/// Why a ticker was dropped by [`filter_candidates`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    QuoteAsset,
    NotTradable,
    LowVolume,
    LowPrice,
    LeveragedToken,
}

/// Check a single ticker against the scanner filters
pub fn check_ticker(
    ticker: &Ticker,
    tradable: &HashSet<Symbol>,
    config: &ScannerConfig,
) -> Result<(), Rejection> {
    let name = ticker.symbol.as_str();

    if !name.ends_with(config.quote_suffix.as_str()) {
        return Err(Rejection::QuoteAsset);
    }
    if !tradable.contains(&ticker.symbol) {
        return Err(Rejection::NotTradable);
    }
    if ticker.quote_volume < config.min_quote_volume {
        return Err(Rejection::LowVolume);
    }
    if ticker.last_price < config.min_price {
        return Err(Rejection::LowPrice);
    }
    if config
        .excluded_markers
        .iter()
        .any(|marker| name.contains(marker.as_str()))
    {
        return Err(Rejection::LeveragedToken);
    }

    Ok(())
}

/// Tickers passing every filter, in input order
pub fn filter_candidates(
    tickers: Vec<Ticker>,
    tradable: &HashSet<Symbol>,
    config: &ScannerConfig,
) -> Vec<Ticker> {
    tickers
        .into_iter()
        .filter(|t| match check_ticker(t, tradable, config) {
            Ok(()) => true,
            Err(reason) => {
                debug!("{} rejected: {:?}", t.symbol, reason);
                false
            }
        })
        .collect()
}

/// Sort by 24h % change descending (stable for ties) and keep the first `top_n`
pub fn rank_candidates(candidates: Vec<Ticker>, top_n: usize) -> Vec<Ticker> {
    candidates
        .into_iter()
        .sorted_by_key(|t| Reverse(OrderedFloat(t.price_change_percent)))
        .take(top_n)
        .collect()
}

/// Fetches the universe and produces ranked candidates
#[derive(Clone)]
pub struct MarketScanner {
    market: Arc<dyn MarketData>,
    config: ScannerConfig,
}

impl MarketScanner {
    pub fn new(market: Arc<dyn MarketData>, config: ScannerConfig) -> Self {
        Self { market, config }
    }

    /// Ranked top-N candidates for this cycle
    ///
    /// Errors when the tradable set cannot be fetched or comes back empty, so
    /// the caller never runs a partial scan.
    pub async fn scan(&self) -> ScanResult<Vec<Ticker>> {
        let tradable = self.market.tradable_symbols().await?;
        if tradable.is_empty() {
            return Err(ScanError::NoTradableSymbols);
        }

        let tickers = self.market.tickers_24h().await?;
        let total = tickers.len();

        let filtered = filter_candidates(tickers, &tradable, &self.config);
        let passed = filtered.len();
        let ranked = rank_candidates(filtered, self.config.top_n);

        info!(
            "Universe: {} tradable, {} tickers, {} passed filters, {} selected",
            tradable.len(),
            total,
            passed,
            ranked.len()
        );

        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(symbol: &str, price: f64, change: f64, volume: f64) -> Ticker {
        Ticker {
            symbol: Symbol::new(symbol),
            last_price: price,
            price_change_percent: change,
            quote_volume: volume,
        }
    }

    fn tradable(symbols: &[&str]) -> HashSet<Symbol> {
        symbols.iter().map(|s| Symbol::new(*s)).collect()
    }

    #[test]
    fn test_leveraged_marker_excluded() {
        let config = ScannerConfig::default();
        let t = ticker("BTCUPUSDT", 10.0, 5.0, 50_000_000.0);
        let set = tradable(&["BTCUPUSDT"]);

        assert_eq!(
            check_ticker(&t, &set, &config),
            Err(Rejection::LeveragedToken)
        );
    }

    #[test]
    fn test_marker_matches_anywhere_in_symbol() {
        // Substring semantics: a legit name containing "UP" is dropped too
        let config = ScannerConfig::default();
        let set = tradable(&["JUPUSDT", "HALFUSDT", "ETHBEARUSDT"]);

        for name in ["JUPUSDT", "HALFUSDT", "ETHBEARUSDT"] {
            let t = ticker(name, 1.0, 1.0, 20_000_000.0);
            assert_eq!(
                check_ticker(&t, &set, &config),
                Err(Rejection::LeveragedToken)
            );
        }
    }

    #[test]
    fn test_volume_boundary() {
        let config = ScannerConfig::default();
        let set = tradable(&["ETHUSDT"]);

        let at = ticker("ETHUSDT", 3000.0, 1.0, 10_000_000.0);
        assert_eq!(check_ticker(&at, &set, &config), Ok(()));

        let below = ticker("ETHUSDT", 3000.0, 1.0, 9_999_999.99);
        assert_eq!(
            check_ticker(&below, &set, &config),
            Err(Rejection::LowVolume)
        );
    }

    #[test]
    fn test_price_boundary() {
        let config = ScannerConfig::default();
        let set = tradable(&["PEPEUSDT"]);

        let at = ticker("PEPEUSDT", 0.000001, 1.0, 20_000_000.0);
        assert_eq!(check_ticker(&at, &set, &config), Ok(()));

        let below = ticker("PEPEUSDT", 0.0000009, 1.0, 20_000_000.0);
        assert_eq!(check_ticker(&below, &set, &config), Err(Rejection::LowPrice));
    }

    #[test]
    fn test_quote_asset_and_tradable() {
        let config = ScannerConfig::default();
        let set = tradable(&["ETHBTC", "SOLUSDT"]);

        let wrong_quote = ticker("ETHBTC", 0.05, 1.0, 50_000_000.0);
        assert_eq!(
            check_ticker(&wrong_quote, &set, &config),
            Err(Rejection::QuoteAsset)
        );

        let not_listed = ticker("XRPUSDT", 0.5, 1.0, 50_000_000.0);
        assert_eq!(
            check_ticker(&not_listed, &set, &config),
            Err(Rejection::NotTradable)
        );
    }

    #[test]
    fn test_filter_keeps_input_order() {
        let config = ScannerConfig::default();
        let set = tradable(&["AUSDT", "BUSDT", "CUSDT"]);
        let tickers = vec![
            ticker("AUSDT", 1.0, 3.0, 20_000_000.0),
            ticker("BUSDT", 1.0, 9.0, 1_000.0),
            ticker("CUSDT", 1.0, 1.0, 20_000_000.0),
        ];

        let filtered = filter_candidates(tickers, &set, &config);
        let names: Vec<&str> = filtered.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(names, vec!["AUSDT", "CUSDT"]);
    }

    #[test]
    fn test_ranking_descending() {
        let candidates = vec![
            ticker("AUSDT", 1.0, 5.0, 0.0),
            ticker("BUSDT", 1.0, -2.0, 0.0),
            ticker("CUSDT", 1.0, 10.0, 0.0),
            ticker("DUSDT", 1.0, 3.0, 0.0),
        ];

        let ranked = rank_candidates(candidates.clone(), 30);
        let changes: Vec<f64> = ranked.iter().map(|t| t.price_change_percent).collect();
        assert_eq!(changes, vec![10.0, 5.0, 3.0, -2.0]);

        let top2 = rank_candidates(candidates, 2);
        let changes: Vec<f64> = top2.iter().map(|t| t.price_change_percent).collect();
        assert_eq!(changes, vec![10.0, 5.0]);
    }

    #[test]
    fn test_ranking_is_stable_for_ties() {
        let candidates = vec![
            ticker("FIRSTUSDT", 1.0, 4.0, 0.0),
            ticker("SECONDUSDT", 1.0, 4.0, 0.0),
        ];
        let ranked = rank_candidates(candidates, 30);
        assert_eq!(ranked[0].symbol.as_str(), "FIRSTUSDT");
        assert_eq!(ranked[1].symbol.as_str(), "SECONDUSDT");
    }
}
