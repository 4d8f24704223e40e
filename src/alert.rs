//! Alert rendering and dispatch

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::indicators::round_to;
use crate::seen_cache::SeenCoinsCache;
use crate::telegram::Notifier;
use crate::types::{BreakoutResult, RsiZone, Ticker};

/// Everything needed to render one breakout alert
#[derive(Debug, Clone)]
pub struct BreakoutAlert {
    pub ticker: Ticker,
    pub breakout: BreakoutResult,
    pub rsi: f64,
    pub rsi_zone: RsiZone,
    pub atr_period: usize,
}

impl BreakoutAlert {
    /// Telegram Markdown message
    pub fn render(&self) -> String {
        format!(
            "🚀 *DAILY BREAKOUT*\n\n\
             🔥 *{symbol}*\n\
             💰 *Price:* {price}\n\
             📈 *24h Change:* {change}%\n\
             🎯 *Close vs Prev High:* {from_high:+.2}%\n\
             📏 *ATR({period}):* {atr}\n\
             ✅ *Breakout Level:* `{level}` (prev high + ATR)\n\
             📊 *RSI(1H):* {rsi} ({zone})",
            symbol = self.ticker.symbol,
            price = self.ticker.last_price,
            change = self.ticker.price_change_percent,
            from_high = self.breakout.change_from_high_pct,
            period = self.atr_period,
            atr = self.breakout.atr,
            level = round_to(self.breakout.breakout_level, 8),
            rsi = self.rsi,
            zone = self.rsi_zone,
        )
    }
}

/// Render the alert text for a confirmed breakout with ATR(14)
pub fn format_alert(ticker: &Ticker, breakout: &BreakoutResult, rsi: f64, rsi_zone: RsiZone) -> String {
    BreakoutAlert {
        ticker: ticker.clone(),
        breakout: *breakout,
        rsi,
        rsi_zone,
        atr_period: crate::indicators::DEFAULT_PERIOD,
    }
    .render()
}

/// Sends alerts through a [`Notifier`] with a fixed pause after each success
#[derive(Clone)]
pub struct AlertDispatcher {
    notifier: Arc<dyn Notifier>,
    pause: Duration,
    seen: Option<SeenCoinsCache>,
}

impl AlertDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, pause: Duration) -> Self {
        Self {
            notifier,
            pause,
            seen: None,
        }
    }

    /// Record every delivered alert in the day-keyed dedup file
    pub fn with_seen_cache(mut self, cache: SeenCoinsCache) -> Self {
        self.seen = Some(cache);
        self
    }

    pub fn seen_cache(&self) -> Option<&SeenCoinsCache> {
        self.seen.as_ref()
    }

    /// Send one alert. Returns `true` if it was delivered.
    ///
    /// Failures are logged and swallowed so the cycle carries on.
    pub async fn dispatch(&self, alert: &BreakoutAlert) -> bool {
        let symbol = &alert.ticker.symbol;

        if let Err(e) = self.notifier.send(&alert.render()).await {
            error!("Alert send failed for {}: {}", symbol, e);
            return false;
        }

        info!(
            "📤 Alert sent: {} {:+.2}% over prev high, ATR={}, RSI={} ({})",
            symbol,
            alert.breakout.change_from_high_pct,
            alert.breakout.atr,
            alert.rsi,
            alert.rsi_zone
        );

        if let Some(cache) = &self.seen {
            if let Err(e) = cache.record(symbol) {
                warn!("Failed to record {} in seen cache: {}", symbol, e);
            }
        }

        sleep(self.pause).await;
        true
    }
}
