use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Outcome of fetching exchange rates: what arrived, and what did not.
#[derive(Debug, Clone, Default)]
pub struct RateFetch {
    /// Number of network requests made
    pub requested: usize,
    pub rates: HashMap<String, f64>,
    pub failures: Vec<FetchFailure>,
}

/// Outcome of fetching asset prices.
#[derive(Debug, Clone, Default)]
pub struct PriceFetch {
    /// Number of network requests made (cash is resolved locally and not counted)
    pub requested: usize,
    /// asset id → new `current_price`
    pub prices: HashMap<Uuid, f64>,
    pub failures: Vec<FetchFailure>,
}

/// A single item that could not be fetched. Its previous value is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchFailure {
    /// Quote symbol that was requested (e.g., "2330.TW", "USDTWD=X")
    pub symbol: String,
    pub message: String,
}

/// Summary of a completed refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshReport {
    pub refreshed_at: DateTime<Utc>,
    pub rates_updated: usize,
    pub prices_updated: usize,
    pub failures: Vec<FetchFailure>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Shared "refresh in progress" marker.
///
/// Clones observe the same flag, so a UI can poll it while the tracker is busy.
#[derive(Debug, Clone, Default)]
pub struct RefreshFlag {
    active: Arc<AtomicBool>,
}

impl RefreshFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Claim the flag. Returns `None` if another refresh holds it.
    pub fn try_begin(&self) -> Option<RefreshGuard> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard {
                active: Arc::clone(&self.active),
            })
    }
}

/// Clears the refresh flag when dropped, whatever way the refresh ended.
#[derive(Debug)]
pub struct RefreshGuard {
    active: Arc<AtomicBool>,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}
