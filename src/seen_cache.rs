//! Day-keyed dedup of alerted symbols
//!
//! Persisted as a flat JSON object mapping a UTC date (`YYYY-MM-DD`) to the
//! symbols already alerted that day:
//!
//! ```json
//! { "2024-03-01": ["SOLUSDT", "WIFUSDT"] }
//! ```
//!
//! A missing or unreadable file is treated as empty. The file is the source of
//! truth across restarts; nothing is cached in memory between calls.

use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ScanResult;
use crate::types::Symbol;

type SeenRecord = BTreeMap<String, Vec<String>>;

/// `YYYY-MM-DD` key for a date
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone)]
pub struct SeenCoinsCache {
    path: PathBuf,
}

impl SeenCoinsCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Symbols alerted today (UTC)
    pub fn load_today(&self) -> HashSet<Symbol> {
        self.load_on(Utc::now().date_naive())
    }

    pub fn load_on(&self, date: NaiveDate) -> HashSet<Symbol> {
        self.read_record()
            .remove(&date_key(date))
            .unwrap_or_default()
            .into_iter()
            .map(Symbol::new)
            .collect()
    }

    /// Record `symbol` as alerted today. Returns `false` if it was already there.
    pub fn record(&self, symbol: &Symbol) -> ScanResult<bool> {
        self.record_on(symbol, Utc::now().date_naive())
    }

    pub fn record_on(&self, symbol: &Symbol, date: NaiveDate) -> ScanResult<bool> {
        let mut record = self.read_record();
        let day = record.entry(date_key(date)).or_default();

        if day.iter().any(|s| s == symbol.as_str()) {
            return Ok(false);
        }
        day.push(symbol.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(&record)?)?;
        debug!("Recorded {} in {}", symbol, self.path.display());

        Ok(true)
    }

    fn read_record(&self) -> SeenRecord {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return SeenRecord::new(),
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(
                "Ignoring corrupt seen-coins file {}: {}",
                self.path.display(),
                e
            );
            SeenRecord::new()
        })
    }
}
