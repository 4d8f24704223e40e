//! Binance USDⓈ-M futures API client
//! No API key needed for public market data endpoints.

mod client;
mod types;

pub use client::BinanceFuturesClient;
pub use types::*;
