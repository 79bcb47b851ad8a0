//! # Typed Records
//!
//! The three logical records on top of a [`KeyValueStore`].
//!
//! ## Keys and Encodings
//! ```text
//! ┌──────────────────────────────┬────────────────────────┬──────────────────┐
//! │ key                          │ value                  │ default on read  │
//! ├──────────────────────────────┼────────────────────────┼──────────────────┤
//! │ receipts_app.receipts        │ JSON Receipt[]         │ []               │
//! │ receipts_app.settings        │ JSON BusinessSettings  │ all fields empty │
//! │ receipts_app.next_receipt    │ decimal text, "113"    │ absent (None)    │
//! └──────────────────────────────┴────────────────────────┴──────────────────┘
//! ```
//!
//! ## Soft Failure
//! Reads never fail. A missing value, a value that is not JSON, a value of
//! the wrong shape, and a store read error all collapse into
//! [`Decoded::UseDefault`]. Corruption is logged with `warn!` and is not
//! reported to the caller.
//!
//! Writes do fail: a write error is returned as [`DbError`](crate::DbError).

use receipts_core::{BusinessSettings, Receipt};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::store::KeyValueStore;

// =============================================================================
// Keys
// =============================================================================

pub const RECEIPTS_KEY: &str = "receipts_app.receipts";
pub const SETTINGS_KEY: &str = "receipts_app.settings";
pub const NEXT_RECEIPT_KEY: &str = "receipts_app.next_receipt";

// =============================================================================
// Decoding
// =============================================================================

/// Outcome of decoding a stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Value(T),
    UseDefault,
}

impl<T> Decoded<T> {
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Decoded::Value(v) => v,
            Decoded::UseDefault => T::default(),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Decoded::Value(v) => Some(v),
            Decoded::UseDefault => None,
        }
    }
}

/// Decodes a JSON record. Every failure is `UseDefault`.
pub fn decode_json<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Decoded<T> {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Decoded::UseDefault;
    };
    match serde_json::from_str(raw) {
        Ok(value) => Decoded::Value(value),
        Err(e) => {
            warn!(key, error = %e, "Stored record is corrupt, using default");
            Decoded::UseDefault
        }
    }
}

/// Decodes the counter text.
///
/// Accepts a non-negative integer, also written as an integral decimal
/// (`"12"`, `" 12 "`, `"12.0"`). Anything else is `UseDefault`.
pub fn decode_counter(raw: Option<&str>) -> Decoded<u64> {
    let Some(text) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Decoded::UseDefault;
    };
    if let Ok(n) = text.parse::<u64>() {
        return Decoded::Value(n);
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Decoded::Value(f as u64)
        }
        _ => {
            warn!(key = NEXT_RECEIPT_KEY, value = text, "Stored counter is not a number, ignoring");
            Decoded::UseDefault
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// Typed access to the three records.
#[derive(Debug, Clone)]
pub struct Records<S> {
    store: S,
}

impl<S: KeyValueStore> Records<S> {
    pub fn new(store: S) -> Self {
        Records { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads a raw value; a read error is treated as absent.
    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Store read failed, treating record as absent");
                None
            }
        }
    }

    /// Receipt list, newest first. Empty when missing or corrupt.
    pub async fn load_receipts(&self) -> Vec<Receipt> {
        let raw = self.read(RECEIPTS_KEY).await;
        let receipts: Vec<Receipt> = decode_json(RECEIPTS_KEY, raw.as_deref()).unwrap_or_default();
        debug!(count = receipts.len(), "Loaded receipts");
        receipts
    }

    pub async fn save_receipts(&self, receipts: &[Receipt]) -> DbResult<()> {
        let encoded = serde_json::to_string(receipts)?;
        self.store.set(RECEIPTS_KEY, &encoded).await
    }

    /// Settings, with missing fields filled by their defaults.
    pub async fn load_settings(&self) -> BusinessSettings {
        let raw = self.read(SETTINGS_KEY).await;
        decode_json(SETTINGS_KEY, raw.as_deref()).unwrap_or_default()
    }

    pub async fn save_settings(&self, settings: &BusinessSettings) -> DbResult<()> {
        let encoded = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, &encoded).await
    }

    /// The next-receipt counter, `None` if it was never set.
    pub async fn load_next_receipt(&self) -> Option<u64> {
        let raw = self.read(NEXT_RECEIPT_KEY).await;
        decode_counter(raw.as_deref()).into_option()
    }

    pub async fn save_next_receipt(&self, next: u64) -> DbResult<()> {
        self.store.set(NEXT_RECEIPT_KEY, &next.to_string()).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
