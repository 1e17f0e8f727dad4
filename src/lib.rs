//! # TierKV
//!
//! A two-tier in-memory key-value service:
//! - A backend store answering a line-oriented text protocol
//! - A caching proxy with write-through PUTs and TTL-bounded cache-aside GETs
//! - Thread-per-connection, one command per connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Clients                               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  VERB [KEY] [REMAINDER...]\n
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Caching Proxy                             │
//! │     PUT: write-through   GET: cache-aside   *: passthrough   │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │ new connection
//!            ▼                                  │ per forward
//!   ┌─────────────────┐                         ▼
//!   │  KeyValueStore  │               ┌──────────────────┐
//!   │    (cache)      │               │  Backend Handler │
//!   └─────────────────┘               └────────┬─────────┘
//!                                              │
//!                                              ▼
//!                                     ┌─────────────────┐
//!                                     │  KeyValueStore  │
//!                                     │ (authoritative) │
//!                                     └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod store;
pub mod backend;
pub mod proxy;
pub mod network;
pub mod tasks;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ProtocolError, Result, TierError};
pub use config::Config;
pub use backend::BackendHandler;
pub use proxy::CachingProxy;
pub use store::KeyValueStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TierKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
