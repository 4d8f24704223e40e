//! One scan-and-alert cycle
//!
//! Scanner → (breakout check → RSI → alert) for each candidate, strictly in
//! ranking order. Per-symbol failures are logged and counted; only a failed
//! universe fetch aborts the cycle.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::alert::{AlertDispatcher, BreakoutAlert};
use crate::breakout::BreakoutDetector;
use crate::config::Config;
use crate::error::ScanResult;
use crate::indicators::{classify_rsi_with, rsi_from_candles};
use crate::market_data::MarketData;
use crate::scanner::MarketScanner;
use crate::seen_cache::SeenCoinsCache;
use crate::telegram::Notifier;
use crate::types::{CycleReport, Interval, Symbol};

pub struct BreakoutPipeline {
    config: Arc<Config>,
    market: Arc<dyn MarketData>,
    scanner: MarketScanner,
    detector: BreakoutDetector,
    dispatcher: AlertDispatcher,
}

impl BreakoutPipeline {
    pub fn new(
        config: Arc<Config>,
        market: Arc<dyn MarketData>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let scanner = MarketScanner::new(market.clone(), config.scanner.clone());
        let detector = BreakoutDetector::new(market.clone(), config.indicators.atr_period);

        let mut dispatcher = AlertDispatcher::new(notifier, config.alerts.dispatch_pause());
        if config.seen_cache.enabled {
            dispatcher = dispatcher.with_seen_cache(SeenCoinsCache::new(&config.seen_cache.path));
        }

        Self {
            config,
            market,
            scanner,
            detector,
            dispatcher,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// RSI on the hourly timeframe; 0.0 when history is short
    pub async fn hourly_rsi(&self, symbol: &Symbol) -> ScanResult<f64> {
        let period = self.config.indicators.rsi_period;
        let hourly = self
            .market
            .klines(symbol, Interval::OneHour, (period + 1) as u32)
            .await?;
        Ok(rsi_from_candles(&hourly, period))
    }

    /// Run one full cycle
    ///
    /// Errors only when the candidate universe cannot be built.
    pub async fn run_cycle(&self) -> ScanResult<CycleReport> {
        info!("🔄 Checking for confirmed daily breakout signals...");

        let candidates = self.scanner.scan().await?;
        let mut report = CycleReport {
            candidates: candidates.len(),
            ..Default::default()
        };

        info!(
            "Scanning {} high-volume gainers for confirmed breakouts...",
            candidates.len()
        );

        let seen: HashSet<Symbol> = self
            .dispatcher
            .seen_cache()
            .map(|cache| cache.load_today())
            .unwrap_or_default();

        let indicators = &self.config.indicators;

        for ticker in candidates {
            let symbol = &ticker.symbol;

            if seen.contains(symbol) {
                debug!("{} already alerted today, skipping", symbol);
                report.skipped_seen += 1;
                continue;
            }

            let breakout = match self.detector.evaluate(symbol).await {
                Ok(result) => result,
                Err(e) => {
                    warn!("Breakout check failed for {}: {}", symbol, e);
                    report.evaluation_errors += 1;
                    continue;
                }
            };

            if !breakout.confirmed {
                debug!(
                    "{}: no breakout (close {} vs level {})",
                    symbol, breakout.today_close, breakout.breakout_level
                );
                continue;
            }
            report.confirmed += 1;

            let rsi = match self.hourly_rsi(symbol).await {
                Ok(value) => value,
                Err(e) => {
                    warn!("RSI fetch failed for {}: {}", symbol, e);
                    0.0
                }
            };
            let rsi_zone =
                classify_rsi_with(rsi, indicators.rsi_oversold, indicators.rsi_overbought);

            let alert = BreakoutAlert {
                ticker: ticker.clone(),
                breakout,
                rsi,
                rsi_zone,
                atr_period: indicators.atr_period,
            };

            if self.dispatcher.dispatch(&alert).await {
                report.dispatched += 1;
            } else {
                report.failed_dispatches += 1;
            }
        }

        info!(
            "✅ Sent {} breakout alerts ({} confirmed, {} failed, {} errors)",
            report.dispatched, report.confirmed, report.failed_dispatches, report.evaluation_errors
        );

        Ok(report)
    }
}
