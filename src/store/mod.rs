//! Store Module
//!
//! In-memory key/value mapping with insertion timestamps.
//!
//! ## Responsibilities
//! - Upsert values (last write wins)
//! - Age-bounded lookups on a monotonic clock
//! - Key enumeration for DUMP
//! - Explicit eviction of stale entries
//!
//! ## Data Structure Choice
//! HashMap wrapped in a parking_lot RwLock:
//! - Key order carries no meaning, DUMP sorts its snapshot
//! - Many concurrent readers, writers serialized
//!
//! Two independent instances exist at runtime: the backend's authoritative
//! store and the proxy's cache. They only ever meet over the wire.

mod table;

pub use table::KeyValueStore;

use std::time::{Duration, Instant};

/// Value stored in the KeyValueStore
///
/// Replaced wholesale on overwrite, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The stored value
    pub value: String,

    /// When the value was stored (monotonic)
    pub stored_at: Instant,
}

impl Entry {
    pub fn new(value: String) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    /// Time since the entry was stored
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    /// An entry exactly `max_age` old is still fresh
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.age() <= max_age
    }
}
