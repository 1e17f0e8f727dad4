//! KeyValueStore implementation
//!
//! HashMap-based store with RwLock for concurrency.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use parking_lot::RwLock;

use super::Entry;
use crate::error::{Result, TierError};

/// Thread-safe string key/value store
///
/// Shared between connection handlers through an `Arc`.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl KeyValueStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key` (write lock)
    ///
    /// Replaces any existing entry with a fresh timestamp. Fails with
    /// `Storage` only when the map cannot grow.
    pub fn store_value(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let entry = Entry::new(value.into());

        let mut entries = self.entries.write();
        if !entries.contains_key(&key) {
            entries.try_reserve(1).map_err(|e| {
                TierError::Storage(format!("cannot grow store for key {}: {}", key, e))
            })?;
        }
        entries.insert(key, entry);
        Ok(())
    }

    /// Look up a value (read lock)
    ///
    /// With `max_age`, entries older than the bound are reported missing.
    /// Expired entries are left in place.
    pub fn get_value(&self, key: &str, max_age: Option<Duration>) -> Option<String> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;

        match max_age {
            Some(max_age) if !entry.is_fresh(max_age) => None,
            _ => Some(entry.value.clone()),
        }
    }

    /// Get a copy of the whole entry, regardless of age
    pub fn get_entry(&self, key: &str) -> Option<Entry> {
        self.entries.read().get(key).cloned()
    }

    /// Snapshot of every key currently present, regardless of age
    pub fn keys(&self) -> BTreeSet<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Remove entries older than `max_age`, returning how many went
    pub fn evict_older_than(&self, max_age: Duration) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(max_age));
        before - entries.len()
    }

    /// Get entry count
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
