//! Client
//!
//! One-shot helper for talking to a backend or proxy: every request opens
//! a new connection, sends one line and returns the one-line answer.

use std::time::Duration;

use crate::error::{ProtocolError, Result};
use crate::network::{exchange, Connector, TcpConnector};
use crate::protocol::DUMP_SEPARATOR;

/// Line-protocol client
#[derive(Debug, Clone)]
pub struct Client {
    connector: TcpConnector,
}

impl Client {
    /// Client for `host:port`
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            connector: TcpConnector::new(addr),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connector = self.connector.with_timeout(timeout);
        self
    }

    /// Send a raw command line and return the response line
    pub fn send(&self, line: &str) -> Result<String> {
        let mut transport = self.connector.connect()?;
        exchange(&mut transport, line)
    }

    /// `PUT key value`
    pub fn put(&self, key: &str, value: &str) -> Result<String> {
        check_key(key)?;
        self.send(&format!("PUT {} {}", key, value))
    }

    /// `GET key`
    pub fn get(&self, key: &str) -> Result<String> {
        check_key(key)?;
        self.send(&format!("GET {}", key))
    }

    /// `DUMP`, split on the separator
    pub fn dump(&self) -> Result<Vec<String>> {
        let line = self.send("DUMP")?;
        Ok(line
            .split(DUMP_SEPARATOR)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect())
    }
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || key.chars().any(|c| c.is_whitespace() || c == DUMP_SEPARATOR) {
        return Err(ProtocolError::InvalidKey(key.to_string()).into());
    }
    Ok(())
}
