//! Technical indicators for the breakout scanner
//!
//! Both indicators work on a fixed recent window and use plain arithmetic
//! means (no Wilder smoothing). The means go through the `ta` crate's
//! `SimpleMovingAverage`.
//!
//! - ATR: mean True Range over the last `period` transitions, 4 decimals
//! - RSI: `100 - 100 / (1 + avg_gain / avg_loss)` over the last `period` changes, 2 decimals
//!
//! Insufficient data yields `0.0`, the neutral "unavailable" value.

use ta::indicators::SimpleMovingAverage;
use ta::Next;

use crate::types::{Candle, RsiZone};

/// Default lookback for both ATR and RSI
pub const DEFAULT_PERIOD: usize = 14;

/// RSI returned when the window holds no losses
pub const RSI_NO_LOSS: f64 = 100.0;

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Arithmetic mean of `values` via a full-window SMA
fn mean(values: &[f64]) -> f64 {
    let mut sma = match SimpleMovingAverage::new(values.len()) {
        Ok(i) => i,
        Err(_) => return 0.0,
    };

    values.iter().fold(0.0, |_, &v| sma.next(v))
}

// =============================================================================
// Volatility
// =============================================================================

/// True Range for each transition between consecutive candles
///
/// `TR_i = max(high_i - low_i, |high_i - close_{i-1}|, |low_i - close_{i-1}|)`,
/// so `n` candles give `n - 1` values.
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    candles
        .windows(2)
        .map(|pair| {
            let prev_close = pair[0].close;
            let c = &pair[1];
            let hl = c.high - c.low;
            let hc = (c.high - prev_close).abs();
            let lc = (c.low - prev_close).abs();
            hl.max(hc).max(lc)
        })
        .collect()
}

/// Average True Range over the most recent `period + 1` candles
///
/// Returns `0.0` when fewer than `period + 1` candles are supplied.
pub fn atr(candles: &[Candle], period: usize) -> f64 {
    if period == 0 || candles.len() < period + 1 {
        return 0.0;
    }

    let window = &candles[candles.len() - (period + 1)..];
    let tr = true_range(window);

    round_to(mean(&tr), 4)
}

// =============================================================================
// Momentum
// =============================================================================

/// RSI from simple-mean gains and losses over the last `period` changes
///
/// Returns `0.0` for fewer than `period + 1` closes and `100.0` when the
/// window has no losses.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return 0.0;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let recent = &changes[changes.len() - period..];

    let gains: Vec<f64> = recent.iter().map(|&c| c.max(0.0)).collect();
    let losses: Vec<f64> = recent.iter().map(|&c| (-c).max(0.0)).collect();

    let avg_gain = mean(&gains);
    let avg_loss = mean(&losses);

    if avg_loss == 0.0 {
        return RSI_NO_LOSS;
    }

    let rs = avg_gain / avg_loss;
    round_to(100.0 - 100.0 / (1.0 + rs), 2)
}

/// RSI over candle closes
pub fn rsi_from_candles(candles: &[Candle], period: usize) -> f64 {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    rsi(&closes, period)
}

/// Classify RSI into display bands using the standard 30/70 thresholds
pub fn classify_rsi(rsi: f64) -> RsiZone {
    classify_rsi_with(rsi, 30.0, 70.0)
}

/// Classify RSI with custom thresholds (strict inequalities on both sides)
pub fn classify_rsi_with(rsi: f64, oversold: f64, overbought: f64) -> RsiZone {
    if rsi < oversold {
        RsiZone::Oversold
    } else if rsi > overbought {
        RsiZone::Overbought
    } else {
        RsiZone::Neutral
    }
}

// =============================================================================
// Tests
// =============================================================================
