//! Daily breakout confirmation
//!
//! A breakout is confirmed when today's close is at or above yesterday's
//! high plus ATR(14):
//!
//! ```text
//! breakout_level       = yesterday.high + ATR
//! confirmed            = today.close >= breakout_level
//! change_from_high_pct = (today.close - yesterday.high) / yesterday.high * 100
//! ```
//!
//! "Today" is the most recent daily candle returned by the exchange. Depending
//! on when the cycle runs it is usually still forming, so its close is the
//! current price. The check deliberately does not wait for the daily close.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{ScanError, ScanResult};
use crate::indicators::{atr, round_to};
use crate::market_data::MarketData;
use crate::types::{BreakoutResult, Candle, Interval, Symbol};

/// Pure confirmation over daily candles (oldest first) and a precomputed ATR
///
/// Uses the last two candles as yesterday and today. Fewer than two candles,
/// or a non-positive previous high, give `BreakoutResult::unconfirmed()`.
pub fn confirm_breakout(daily: &[Candle], atr: f64) -> BreakoutResult {
    let [.., yesterday, today] = daily else {
        return BreakoutResult::unconfirmed();
    };

    if yesterday.high <= 0.0 {
        return BreakoutResult::unconfirmed();
    }

    let breakout_level = yesterday.high + atr;
    let change = (today.close - yesterday.high) / yesterday.high * 100.0;

    BreakoutResult {
        confirmed: today.close >= breakout_level,
        change_from_high_pct: round_to(change, 2),
        atr,
        prev_high: yesterday.high,
        today_close: today.close,
        breakout_level,
    }
}

/// Fetches daily candles and confirms breakouts for one symbol at a time
#[derive(Clone)]
pub struct BreakoutDetector {
    market: Arc<dyn MarketData>,
    atr_period: usize,
}

impl BreakoutDetector {
    pub fn new(market: Arc<dyn MarketData>, atr_period: usize) -> Self {
        Self { market, atr_period }
    }

    /// Daily candles requested per evaluation: enough for ATR, and the last two
    /// double as yesterday/today.
    pub fn daily_window(&self) -> u32 {
        (self.atr_period + 1) as u32
    }

    /// Evaluate the breakout for `symbol`, surfacing fetch and data errors
    ///
    /// A short history that still has two candles is not an error: ATR falls
    /// back to 0 and the level is yesterday's high.
    pub async fn evaluate(&self, symbol: &Symbol) -> ScanResult<BreakoutResult> {
        let daily = self
            .market
            .klines(symbol, Interval::OneDay, self.daily_window())
            .await?;

        if daily.len() < 2 {
            return Err(ScanError::InsufficientData {
                symbol: symbol.to_string(),
                needed: 2,
                got: daily.len(),
            });
        }

        let atr_value = atr(&daily, self.atr_period);
        if atr_value == 0.0 {
            debug!(
                "{}: ATR({}) unavailable with {} daily candles",
                symbol,
                self.atr_period,
                daily.len()
            );
        }

        Ok(confirm_breakout(&daily, atr_value))
    }

    /// Like [`evaluate`](Self::evaluate) but logs failures and degrades to an
    /// unconfirmed result.
    pub async fn evaluate_or_unconfirmed(&self, symbol: &Symbol) -> BreakoutResult {
        match self.evaluate(symbol).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Breakout check failed for {}: {}", symbol, e);
                BreakoutResult::unconfirmed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashSet;

    use crate::types::Ticker;

    fn day(i: i64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            open_time: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::days(i),
            open: low,
            high,
            low,
            close,
            volume: 1.0,
        }
    }

    struct FixedMarket {
        daily: Option<Vec<Candle>>,
    }

    #[async_trait]
    impl MarketData for FixedMarket {
        async fn tradable_symbols(&self) -> ScanResult<HashSet<Symbol>> {
            Ok(HashSet::new())
        }

        async fn tickers_24h(&self) -> ScanResult<Vec<Ticker>> {
            Ok(vec![])
        }

        async fn klines(
            &self,
            _symbol: &Symbol,
            _interval: Interval,
            limit: u32,
        ) -> ScanResult<Vec<Candle>> {
            match &self.daily {
                Some(candles) => {
                    let skip = candles.len().saturating_sub(limit as usize);
                    Ok(candles[skip..].to_vec())
                }
                None => Err(ScanError::Api {
                    status: 503,
                    body: "unavailable".into(),
                }),
            }
        }
    }

    #[test]
    fn test_confirmed_at_exact_level() {
        let daily = vec![day(0, 100.0, 95.0, 98.0), day(1, 106.0, 99.0, 105.0)];
        let result = confirm_breakout(&daily, 5.0);

        assert!(result.confirmed);
        assert_eq!(result.change_from_high_pct, 5.0);
        assert_eq!(result.atr, 5.0);
        assert_eq!(result.breakout_level, 105.0);
    }

    #[test]
    fn test_just_below_level_is_unconfirmed() {
        let daily = vec![day(0, 100.0, 95.0, 98.0), day(1, 106.0, 99.0, 104.99)];
        let result = confirm_breakout(&daily, 5.0);

        assert!(!result.confirmed);
        assert_eq!(result.change_from_high_pct, 4.99);
    }

    #[test]
    fn test_negative_change_below_previous_high() {
        let daily = vec![day(0, 200.0, 180.0, 190.0), day(1, 195.0, 170.0, 180.0)];
        let result = confirm_breakout(&daily, 3.0);

        assert!(!result.confirmed);
        assert_eq!(result.change_from_high_pct, -10.0);
    }

    #[test]
    fn test_uses_last_two_candles() {
        let daily = vec![
            day(0, 1000.0, 900.0, 950.0),
            day(1, 100.0, 95.0, 98.0),
            day(2, 112.0, 99.0, 110.0),
        ];
        let result = confirm_breakout(&daily, 5.0);

        assert_eq!(result.prev_high, 100.0);
        assert_eq!(result.today_close, 110.0);
        assert!(result.confirmed);
    }

    #[test]
    fn test_fewer_than_two_candles() {
        assert_eq!(confirm_breakout(&[], 5.0), BreakoutResult::unconfirmed());
        let single = vec![day(0, 100.0, 90.0, 95.0)];
        assert_eq!(confirm_breakout(&single, 5.0), BreakoutResult::unconfirmed());
    }

    #[test]
    fn test_zero_previous_high_is_unconfirmed() {
        let daily = vec![day(0, 0.0, 0.0, 0.0), day(1, 1.0, 0.5, 1.0)];
        assert_eq!(confirm_breakout(&daily, 0.0), BreakoutResult::unconfirmed());
    }

    #[tokio::test]
    async fn test_detector_combines_atr_and_confirmation() {
        // 14 flat days with a 2.0 range, then today closes 3% above yesterday's high
        let mut daily: Vec<Candle> = (0..14).map(|i| day(i, 101.0, 99.0, 100.0)).collect();
        daily.push(day(14, 104.0, 100.0, 104.03));

        let detector = BreakoutDetector::new(Arc::new(FixedMarket { daily: Some(daily) }), 14);
        let result = detector.evaluate(&Symbol::new("TESTUSDT")).await.unwrap();

        // 13 TRs of 2.0 plus today's max(4.0, 4.0, 0.0)
        assert_relative_eq!(result.atr, round_to((13.0 * 2.0 + 4.0) / 14.0, 4));
        assert_eq!(result.prev_high, 101.0);
        assert!(result.confirmed);
        assert_eq!(result.change_from_high_pct, 3.0);
    }

    #[tokio::test]
    async fn test_detector_short_history_uses_zero_atr() {
        let daily = vec![day(0, 100.0, 95.0, 98.0), day(1, 101.0, 99.0, 100.5)];
        let detector = BreakoutDetector::new(Arc::new(FixedMarket { daily: Some(daily) }), 14);

        let result = detector.evaluate(&Symbol::new("NEWUSDT")).await.unwrap();
        assert_eq!(result.atr, 0.0);
        assert!(result.confirmed);
    }

    #[tokio::test]
    async fn test_detector_distinguishes_unavailable_data() {
        let symbol = Symbol::new("TESTUSDT");

        let detector = BreakoutDetector::new(Arc::new(FixedMarket { daily: None }), 14);
        assert!(matches!(
            detector.evaluate(&symbol).await,
            Err(ScanError::Api { status: 503, .. })
        ));
        assert_eq!(
            detector.evaluate_or_unconfirmed(&symbol).await,
            BreakoutResult::unconfirmed()
        );

        let detector = BreakoutDetector::new(
            Arc::new(FixedMarket {
                daily: Some(vec![day(0, 1.0, 1.0, 1.0)]),
            }),
            14,
        );
        assert!(matches!(
            detector.evaluate(&symbol).await,
            Err(ScanError::InsufficientData { got: 1, .. })
        ));
    }
}
