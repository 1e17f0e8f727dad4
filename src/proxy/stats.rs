//! Proxy Statistics
//!
//! Lock-free counters for cache and forwarding activity.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters owned by the proxy
#[derive(Debug, Default)]
pub struct ProxyStats {
    hits: AtomicU64,
    misses: AtomicU64,
    forwarded: AtomicU64,
    backend_failures: AtomicU64,
}

/// Point-in-time copy of `ProxyStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// GETs answered from the cache
    pub hits: u64,
    /// GETs that had to go to the backend
    pub misses: u64,
    /// Requests sent to the backend
    pub forwarded: u64,
    /// Backend exchanges that failed
    pub backend_failures: u64,
}

impl ProxyStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_forward(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_backend_failure(&self) {
        self.backend_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            backend_failures: self.backend_failures.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// hits / (hits + misses), or 0.0 before any GET
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
