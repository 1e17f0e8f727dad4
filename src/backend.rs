//! Backend Module
//!
//! The authoritative command handler that sits behind the proxy.
//!
//! ## Responsibilities
//! - Route parsed commands to PUT / GET / DUMP
//! - Turn every outcome, including failures, into one response line
//!
//! The backend never expires values: GET looks up without an age bound.

use std::sync::Arc;

use crate::network::CommandHandler;
use crate::protocol::{parse_command, Command, CommandType, Response, DUMP_SEPARATOR};
use crate::store::KeyValueStore;

/// Dispatches commands against the authoritative store
#[derive(Debug, Clone)]
pub struct BackendHandler {
    store: Arc<KeyValueStore>,
}

impl BackendHandler {
    /// Create a handler over an empty store
    pub fn new() -> Self {
        Self::with_store(Arc::new(KeyValueStore::new()))
    }

    /// Create a handler over an existing store
    pub fn with_store(store: Arc<KeyValueStore>) -> Self {
        Self { store }
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers. Always yields exactly one
    /// response.
    pub fn execute(&self, command: &Command) -> Response {
        match command.command_type() {
            CommandType::Put => self.put(command),
            CommandType::Get => self.get(command),
            CommandType::Dump => self.dump(),
            CommandType::Unknown => {
                Response::unknown_command(command.verb.as_deref().unwrap_or_default())
            }
            CommandType::Empty => Response::empty_command(),
        }
    }

    /// PUT key value...
    ///
    /// Keys holding the DUMP separator are refused so DUMP stays parseable.
    fn put(&self, command: &Command) -> Response {
        let Some(key) = command.key() else {
            return Response::missing_key("PUT");
        };
        if key.contains(DUMP_SEPARATOR) {
            return Response::error(&format!("Key may not contain '{}'.", DUMP_SEPARATOR));
        }
        let value = command.value();

        match self.store.store_value(key, value) {
            Ok(()) => Response::stored(key, value),
            Err(e) => {
                tracing::warn!(key, error = %e, "PUT failed");
                Response::storage_failure(key, value)
            }
        }
    }

    /// GET key
    fn get(&self, command: &Command) -> Response {
        let Some(key) = command.key() else {
            return Response::missing_key("GET");
        };

        match self.store.get_value(key, None) {
            Some(value) => Response::new(value),
            None => Response::not_found(key),
        }
    }

    /// DUMP: every key, sorted, comma-joined
    fn dump(&self) -> Response {
        Response::keys(self.store.keys())
    }

    /// Get the underlying store
    pub fn store(&self) -> &Arc<KeyValueStore> {
        &self.store
    }
}

impl Default for BackendHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for BackendHandler {
    fn handle_line(&self, line: &str) -> Response {
        let command = parse_command(line);
        tracing::trace!(?command, "backend dispatch");
        self.execute(&command)
    }
}
