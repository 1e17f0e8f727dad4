//! Configuration for TierKV
//!
//! Centralized configuration with sensible defaults. Set once at startup
//! and shared read-only afterwards.

use std::time::Duration;

use crate::error::{Result, TierError};
use crate::protocol::MAX_RESPONSE_LEN;

/// Main configuration shared by the backend and the proxy
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Host both listeners bind to
    pub listen_host: String,

    /// Port the backend listens on
    pub backend_port: u16,

    /// Port the proxy listens on
    pub proxy_port: u16,

    /// Backend host as seen by the proxy
    pub backend_host: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    /// Connect/read/write timeout for proxy-to-backend exchanges (milliseconds)
    pub backend_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Longest command line accepted from a client (bytes, delimiter excluded)
    pub max_command_len: usize,

    /// Longest response line the proxy accepts from the backend
    pub max_response_len: usize,

    /// Read buffer capacity per connection (tuning hint only)
    pub read_chunk_size: usize,

    // -------------------------------------------------------------------------
    // Cache Configuration
    // -------------------------------------------------------------------------
    /// Staleness bound for values served from the proxy cache
    pub max_cache_age: Duration,

    /// How often the proxy evicts stale cache entries (None = never)
    pub cache_sweep_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_host: "127.0.0.1".to_string(),
            backend_port: 7777,
            proxy_port: 8888,
            backend_host: "localhost".to_string(),
            max_connections: 1024,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            backend_timeout_ms: 5000,
            max_command_len: 64 * 1024,          // 64 KiB
            max_response_len: MAX_RESPONSE_LEN,
            read_chunk_size: 256,
            max_cache_age: Duration::from_secs(60),
            cache_sweep_interval: Some(Duration::from_secs(60)),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Address the proxy connects to
    pub fn backend_addr(&self) -> String {
        format!("{}:{}", self.backend_host, self.backend_port)
    }

    /// Address the backend binds to
    pub fn backend_listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.backend_port)
    }

    /// Address the proxy binds to
    pub fn proxy_listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.proxy_port)
    }

    pub fn backend_timeout(&self) -> Option<Duration> {
        millis(self.backend_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    /// Reject settings no server can run with
    pub fn validate(&self) -> Result<()> {
        if self.max_command_len == 0 {
            return Err(TierError::Config("max_command_len must be > 0".to_string()));
        }
        if self.max_response_len == 0 {
            return Err(TierError::Config("max_response_len must be > 0".to_string()));
        }
        if self.read_chunk_size == 0 {
            return Err(TierError::Config("read_chunk_size must be > 0".to_string()));
        }
        if self.max_connections == 0 {
            return Err(TierError::Config("max_connections must be > 0".to_string()));
        }
        if self.backend_host.is_empty() {
            return Err(TierError::Config("backend_host must not be empty".to_string()));
        }
        if matches!(self.cache_sweep_interval, Some(d) if d.is_zero()) {
            return Err(TierError::Config(
                "cache_sweep_interval must be > 0 when set".to_string(),
            ));
        }
        Ok(())
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the host both listeners bind to
    pub fn listen_host(mut self, host: impl Into<String>) -> Self {
        self.config.listen_host = host.into();
        self
    }

    /// Set the backend listen port
    pub fn backend_port(mut self, port: u16) -> Self {
        self.config.backend_port = port;
        self
    }

    /// Set the proxy listen port
    pub fn proxy_port(mut self, port: u16) -> Self {
        self.config.proxy_port = port;
        self
    }

    /// Set the backend host the proxy forwards to
    pub fn backend_host(mut self, host: impl Into<String>) -> Self {
        self.config.backend_host = host.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the proxy-to-backend timeout (in milliseconds)
    pub fn backend_timeout_ms(mut self, ms: u64) -> Self {
        self.config.backend_timeout_ms = ms;
        self
    }

    /// Set the command length cap (in bytes)
    pub fn max_command_len(mut self, len: usize) -> Self {
        self.config.max_command_len = len;
        self
    }

    /// Set the backend response length cap (in bytes)
    pub fn max_response_len(mut self, len: usize) -> Self {
        self.config.max_response_len = len;
        self
    }

    /// Set the per-connection read buffer size (in bytes)
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size;
        self
    }

    /// Set the cache staleness bound
    pub fn max_cache_age(mut self, age: Duration) -> Self {
        self.config.max_cache_age = age;
        self
    }

    /// Set the cache sweep interval (None disables the sweeper)
    pub fn cache_sweep_interval(mut self, interval: Option<Duration>) -> Self {
        self.config.cache_sweep_interval = interval;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
