//! Network Module
//!
//! TCP server, backend connector and the transport seam between them.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One thread per accepted connection, one command per connection
//! - Commands routed through a `CommandHandler` (backend or proxy)
//! - Sockets hidden behind `Transport` so handlers can be driven in memory

mod transport;
mod connection;
mod server;

pub use transport::{exchange, Connector, LineTransport, TcpConnector, TcpTransport, Transport};
pub use connection::{serve_one, Connection};
pub use server::{Server, ShutdownHandle};

use std::sync::Arc;

use crate::protocol::Response;

/// Single dispatch entry point for one received command line
pub trait CommandHandler: Send + Sync {
    /// Produce exactly one response for `line` (delimiter already stripped)
    fn handle_line(&self, line: &str) -> Response;
}

impl<H: CommandHandler + ?Sized> CommandHandler for Arc<H> {
    fn handle_line(&self, line: &str) -> Response {
        (**self).handle_line(line)
    }
}
