//! Outbound messaging
//!
//! `Notifier` is the seam the alert dispatcher sends through. Two
//! implementations ship with the crate:
//! - [`TelegramNotifier`]: Bot API `sendMessage` with Markdown rendering
//! - [`LogNotifier`]: logs the message instead of sending it (dry runs)

mod client;

pub use client::{LogNotifier, TelegramNotifier};

use async_trait::async_trait;

use crate::error::ScanResult;

/// Sends a formatted message to the configured channel
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> ScanResult<()>;
}
