//! Proxy Module
//!
//! Caching proxy in front of a single backend.
//!
//! ## Routing Policy
//! - **PUT**: write-through. Always forwarded; the cache is updated only
//!   after the backend acknowledges with `key=value`.
//! - **GET**: cache-aside. Served from the cache while the entry is no
//!   older than `max_cache_age`, otherwise forwarded and the answer cached.
//!   Not-found answers and other failure replies are never cached.
//! - **Everything else**: passthrough, never cached.
//!
//! A failed backend exchange is always reported to the client as
//! `Error contacting backend.`; the cache is never used to mask it.

mod stats;

pub use stats::{ProxyStats, StatsSnapshot};

use std::sync::Arc;
use std::time::Duration;

use crate::error::{Result, TierError};
use crate::network::{exchange, CommandHandler, Connector};
use crate::protocol::{parse_command, Command, CommandType, Response};
use crate::store::KeyValueStore;

/// Caching proxy over a backend reached through `C`
pub struct CachingProxy<C> {
    /// Opens one backend transport per forwarded request
    connector: C,

    /// Local cache, never the backend's store
    cache: Arc<KeyValueStore>,

    /// Staleness bound for cache hits
    max_cache_age: Duration,

    stats: ProxyStats,
}

impl<C: Connector> CachingProxy<C> {
    /// Create a proxy with an empty cache
    pub fn new(connector: C, max_cache_age: Duration) -> Self {
        Self::with_cache(connector, Arc::new(KeyValueStore::new()), max_cache_age)
    }

    /// Create a proxy over an existing cache store
    pub fn with_cache(connector: C, cache: Arc<KeyValueStore>, max_cache_age: Duration) -> Self {
        Self {
            connector,
            cache,
            max_cache_age,
            stats: ProxyStats::new(),
        }
    }

    /// Route one command line and produce the client's response
    ///
    /// Errors are transport failures only; every other outcome is a
    /// response line.
    pub fn route(&self, line: &str) -> Result<Response> {
        let line = line.trim_end();
        let command = parse_command(line);
        tracing::trace!(?command, "proxy dispatch");

        match command.command_type() {
            CommandType::Put => self.put(line, &command),
            CommandType::Get => self.get(line, &command),
            _ => self.forward(line),
        }
    }

    /// Write-through
    fn put(&self, line: &str, command: &Command) -> Result<Response> {
        let response = self.forward(line)?;

        let Some(key) = command.key() else {
            return Ok(response);
        };
        let value = command.value();

        if response == Response::stored(key, value) {
            if let Err(e) = self.cache.store_value(key, value) {
                // Backend has the write; a stale cache entry ages out
                tracing::warn!(key, error = %e, "cache update after PUT failed");
            }
        } else {
            tracing::debug!(key, response = %response, "backend did not acknowledge PUT");
        }

        Ok(response)
    }

    /// Cache-aside
    fn get(&self, line: &str, command: &Command) -> Result<Response> {
        let Some(key) = command.key() else {
            return self.forward(line);
        };

        if let Some(value) = self.cache.get_value(key, Some(self.max_cache_age)) {
            self.stats.record_hit();
            tracing::debug!(key, "cache hit");
            return Ok(Response::new(value));
        }

        self.stats.record_miss();
        tracing::debug!(key, "cache miss");

        let response = self.forward(line)?;
        if response.is_failure() {
            tracing::debug!(key, response = %response, "backend failure reply not cached");
            return Ok(response);
        }

        if let Err(e) = self.cache.store_value(key, response.as_str()) {
            tracing::warn!(key, error = %e, "cache fill failed");
        }
        Ok(response)
    }

    /// Send `line` to the backend over a fresh transport
    fn forward(&self, line: &str) -> Result<Response> {
        self.stats.record_forward();

        let mut transport = self.connector.connect().map_err(TierError::transport)?;
        let answer = Response::new(exchange(&mut transport, line).map_err(TierError::transport)?);
        if answer == Response::server_busy() {
            return Err(TierError::Transport("backend at connection cap".to_string()));
        }
        Ok(answer)
    }

    /// Get the cache store
    pub fn cache(&self) -> &Arc<KeyValueStore> {
        &self.cache
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl<C: Connector> CommandHandler for CachingProxy<C> {
    fn handle_line(&self, line: &str) -> Response {
        match self.route(line) {
            Ok(response) => response,
            Err(e) => {
                self.stats.record_backend_failure();
                tracing::warn!(error = %e, "backend exchange failed");
                Response::backend_unavailable()
            }
        }
    }
}
