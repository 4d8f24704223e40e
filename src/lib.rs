//! Daily Breakout Scanner
//!
//! Scans Binance USDⓈ-M futures every 15 minutes for confirmed daily
//! breakouts (today's close at or above yesterday's high plus ATR(14)) among
//! the top liquid gainers, and pushes an alert with hourly RSI context to a
//! Telegram chat.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use breakout_scanner::binance::BinanceFuturesClient;
//! use breakout_scanner::pipeline::BreakoutPipeline;
//! use breakout_scanner::telegram::LogNotifier;
//! use breakout_scanner::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(Config::default());
//!     let market = Arc::new(BinanceFuturesClient::with_config(&config.binance));
//!     let pipeline = BreakoutPipeline::new(config, market, Arc::new(LogNotifier));
//!     let report = pipeline.run_cycle().await?;
//!     println!("{} alerts", report.dispatched);
//!     Ok(())
//! }
//! ```

pub mod alert;
pub mod binance;
pub mod breakout;
pub mod config;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod pipeline;
pub mod scanner;
pub mod scheduler;
pub mod seen_cache;
pub mod telegram;
pub mod types;

pub use config::Config;
pub use error::{ScanError, ScanResult};
pub use types::*;
