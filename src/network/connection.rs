//! Connection Handler
//!
//! Handles individual client connections.

use std::net::TcpStream;
use std::sync::Arc;

use super::{CommandHandler, TcpTransport, Transport};
use crate::config::Config;
use crate::error::{ProtocolError, Result, TierError};
use crate::protocol::Response;

/// Serve exactly one command over `transport`
///
/// Reads one line, dispatches it, writes one response. A line that cannot
/// be framed gets a best-effort error response and the error is returned.
/// A peer that hangs up before sending anything is not an error.
pub fn serve_one<T, H>(transport: &mut T, handler: &H) -> Result<()>
where
    T: Transport + ?Sized,
    H: CommandHandler + ?Sized,
{
    let line = match transport.read_line() {
        Ok(line) => line,
        Err(e) if e.is_disconnect() => return Ok(()),
        Err(TierError::Protocol(err)) => {
            let _ = transport.write_line(Response::protocol_error(&err).as_str());
            return Err(err.into());
        }
        Err(e) => return Err(e),
    };

    tracing::trace!(command = %line, "received");

    let response = handler.handle_line(&line);

    match transport.write_line(response.as_str()) {
        Err(TierError::Protocol(ProtocolError::EmbeddedNewline)) => {
            tracing::warn!("dropping response with embedded newline");
            transport.write_line(Response::error("Response could not be encoded.").as_str())
        }
        other => other,
    }
}

/// Handles a single client connection
pub struct Connection<H: ?Sized> {
    /// Line transport over the accepted stream
    transport: TcpTransport,

    /// Dispatch target (backend or proxy)
    handler: Arc<H>,

    /// Peer address for logging
    peer_addr: String,
}

impl<H: CommandHandler + ?Sized> Connection<H> {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O and configures timeouts
    pub fn new(stream: TcpStream, handler: Arc<H>, config: &Config) -> Result<Self> {
        let transport = TcpTransport::tcp(
            stream,
            config.max_command_len,
            config.read_chunk_size,
            config.read_timeout(),
            config.write_timeout(),
        )?;
        let peer_addr = transport.peer_addr();

        Ok(Self {
            transport,
            handler,
            peer_addr,
        })
    }

    /// Handle the connection: one command, one response, then close
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        match serve_one(&mut self.transport, &*self.handler) {
            Ok(()) => {
                tracing::debug!("Connection from {} done", self.peer_addr);
                Ok(())
            }
            Err(e) if e.is_disconnect() => {
                // Client went away before the response could be sent
                tracing::debug!("Client {} disconnected: {}", self.peer_addr, e);
                Ok(())
            }
            Err(e) if e.is_timeout() => {
                tracing::debug!("Timeout for client {}", self.peer_addr);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Error serving {}: {}", self.peer_addr, e);
                Err(e)
            }
        }
    }
}
