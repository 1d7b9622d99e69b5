//! Node store counters.
//!
//! Each store owns its counters and its own on/off switch; counting is a
//! relaxed atomic increment so interning from many builder threads never
//! serializes on metrics.
//!
//! # Usage
//!
//! ```ignore
//! store.metrics().set_enabled(false);
//!
//! let stats = store.metrics().snapshot();
//! println!("{} created, {} hits", stats.created, stats.hits);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Live counters owned by a `NodeStore`.
#[derive(Debug)]
pub struct StoreMetrics {
    enabled: AtomicBool,
    created: AtomicU64,
    hits: AtomicU64,
    collisions: AtomicU64,
}

/// Point-in-time copy of `StoreMetrics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Branches allocated by `intern`.
    pub created: u64,
    /// `intern` calls answered by an existing node (sentinels included).
    pub hits: u64,
    /// Branches in `created` whose fingerprint already named another node.
    pub collisions: u64,
}

impl StoreStats {
    /// Total `intern` calls seen.
    pub fn interned(&self) -> u64 {
        self.created + self.hits
    }

    /// Fraction of `intern` calls that reused an existing node.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.interned();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl Default for StoreMetrics {
    fn default() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            created: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            collisions: AtomicU64::new(0),
        }
    }
}

impl StoreMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Turn counting on or off for this store only.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_created(&self) {
        if self.is_enabled() {
            self.created.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_hit(&self) {
        if self.is_enabled() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_collision(&self) {
        if self.is_enabled() {
            self.collisions.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> StoreStats {
        StoreStats {
            created: self.created.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
        }
    }

    /// Zero all counters.
    pub fn reset(&self) {
        self.created.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.collisions.store(0, Ordering::Relaxed);
    }
}
