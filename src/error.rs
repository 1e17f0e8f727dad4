//! Error types for TierKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using TierError
pub type Result<T> = std::result::Result<T, TierError>;

/// Unified error type for TierKV operations
#[derive(Debug, Error)]
pub enum TierError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    /// Proxy-to-backend exchange failed (connect, reset, timeout, bad answer)
    #[error("Transport error: {0}")]
    Transport(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Framing failures of the line protocol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Stream ended before a newline was seen
    #[error("stream ended after {read} bytes without a newline")]
    Truncated { read: usize },

    /// No newline within the configured cap
    #[error("line exceeds {limit} bytes without a newline")]
    TooLong { limit: usize },

    #[error("response text contains an embedded newline")]
    EmbeddedNewline,

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    /// Keys are single tokens: non-empty, no whitespace, no DUMP separator
    #[error("invalid key {0:?}")]
    InvalidKey(String),
}

impl TierError {
    /// Wrap any error as a transport failure
    pub fn transport(err: impl std::fmt::Display) -> Self {
        TierError::Transport(err.to_string())
    }

    /// True for I/O kinds that mean the peer went away
    pub fn is_disconnect(&self) -> bool {
        match self {
            TierError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
            ),
            TierError::Protocol(ProtocolError::Truncated { read: 0 }) => true,
            _ => false,
        }
    }

    /// True for read/write timeouts (WouldBlock on Unix, TimedOut on Windows)
    pub fn is_timeout(&self) -> bool {
        match self {
            TierError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}
