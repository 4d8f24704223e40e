//! Configuration management
//!
//! Handles loading and parsing of JSON configuration files with environment
//! variable support for the Telegram credentials. Every section has defaults,
//! so a missing file or a partial JSON document is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{ScanError, ScanResult};

/// Number of ranked gainers evaluated per cycle
pub const DEFAULT_TOP_N: usize = 30;

/// Env var holding the Telegram bot token
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";

/// Env var holding the Telegram chat id
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub indicators: IndicatorConfig,
    pub binance: BinanceConfig,
    pub telegram: TelegramConfig,
    pub alerts: AlertConfig,
    pub seen_cache: SeenCacheConfig,
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Load configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        Ok(config)
    }

    /// Load from an optional file, then apply `.env` and process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Config::default(),
        };

        dotenv::dotenv().ok();
        config.apply_env_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Overwrite credentials with values from `lookup` when present
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_BOT_TOKEN).filter(|v| !v.is_empty()) {
            self.telegram.bot_token = Some(token);
        }
        if let Some(chat_id) = lookup(ENV_CHAT_ID).filter(|v| !v.is_empty()) {
            self.telegram.chat_id = Some(chat_id);
        }
    }

    /// Reject values the scanner cannot run with
    pub fn validate(&self, require_telegram: bool) -> ScanResult<()> {
        if self.scanner.top_n == 0 {
            return Err(ScanError::Config("scanner.top_n must be > 0".into()));
        }
        if self.scanner.quote_suffix.is_empty() {
            return Err(ScanError::Config("scanner.quote_suffix must not be empty".into()));
        }
        if self.indicators.atr_period == 0 || self.indicators.rsi_period == 0 {
            return Err(ScanError::Config("indicator periods must be > 0".into()));
        }
        if self.indicators.rsi_oversold >= self.indicators.rsi_overbought {
            return Err(ScanError::Config(format!(
                "rsi_oversold ({}) must be below rsi_overbought ({})",
                self.indicators.rsi_oversold, self.indicators.rsi_overbought
            )));
        }
        if self.schedule.interval_secs == 0 {
            return Err(ScanError::Config("schedule.interval_secs must be > 0".into()));
        }
        if require_telegram && self.telegram.credentials().is_none() {
            return Err(ScanError::Config(format!(
                "Telegram credentials missing: set {} and {}",
                ENV_BOT_TOKEN, ENV_CHAT_ID
            )));
        }
        Ok(())
    }
}

/// Candidate universe filters and ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub quote_suffix: String,
    pub min_quote_volume: f64,
    pub min_price: f64,
    /// Leveraged-token markers; any substring match excludes the symbol
    pub excluded_markers: Vec<String>,
    pub top_n: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            quote_suffix: "USDT".to_string(),
            min_quote_volume: 10_000_000.0,
            min_price: 0.000001,
            excluded_markers: ["BEAR", "BULL", "UP", "DOWN", "HALF"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub atr_period: usize,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        IndicatorConfig {
            atr_period: 14,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

/// Binance USDⓈ-M futures REST settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BinanceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        BinanceConfig {
            base_url: "https://fapi.binance.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl BinanceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    pub api_base: String,
    pub parse_mode: String,
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        TelegramConfig {
            bot_token: None,
            chat_id: None,
            api_base: "https://api.telegram.org".to_string(),
            parse_mode: "Markdown".to_string(),
            timeout_secs: 30,
        }
    }
}

impl TelegramConfig {
    /// `(bot_token, chat_id)` when both are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.bot_token.as_deref(), self.chat_id.as_deref()) {
            (Some(token), Some(chat)) if !token.is_empty() && !chat.is_empty() => {
                Some((token, chat))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Pause after every successful send
    pub dispatch_pause_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        AlertConfig {
            dispatch_pause_ms: 1000,
        }
    }
}

impl AlertConfig {
    pub fn dispatch_pause(&self) -> Duration {
        Duration::from_millis(self.dispatch_pause_ms)
    }
}

/// Day-keyed dedup of alerted symbols. Off by default: repeated alerts are allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeenCacheConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for SeenCacheConfig {
    fn default() -> Self {
        SeenCacheConfig {
            enabled: false,
            path: "seen_daily_breakouts.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig { interval_secs: 900 }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
