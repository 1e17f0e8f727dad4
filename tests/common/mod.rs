//! Shared test helpers
//!
//! An in-memory stand-in backend reachable through a fake `Connector`, and
//! helpers to run real servers on ephemeral ports.

#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tierkv::error::{ProtocolError, Result, TierError};
use tierkv::network::{CommandHandler, Connector, Server, ShutdownHandle, Transport};
use tierkv::protocol::Response;
use tierkv::{BackendHandler, Config, KeyValueStore};

// =============================================================================
// In-memory backend
// =============================================================================

/// How the fake backend behaves on the next connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// Answers every command
    Up,
    /// Refuses connections
    Refusing,
    /// Accepts the command, then closes without answering
    HangUp,
    /// Answers every command with the connection-cap rejection
    Busy,
}

/// Backend handler plus a log of every line it received
pub struct FakeBackend {
    handler: BackendHandler,
    mode: Mutex<BackendMode>,
    calls: AtomicUsize,
    received: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            handler: BackendHandler::new(),
            mode: Mutex::new(BackendMode::Up),
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        })
    }

    /// The backend's authoritative store
    pub fn store(&self) -> &Arc<KeyValueStore> {
        self.handler.store()
    }

    pub fn set_mode(&self, mode: BackendMode) {
        *self.mode.lock() = mode;
    }

    /// Number of commands that reached the backend
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }

    pub fn connector(self: &Arc<Self>) -> FakeConnector {
        FakeConnector {
            backend: Arc::clone(self),
        }
    }
}

pub struct FakeConnector {
    backend: Arc<FakeBackend>,
}

impl Connector for FakeConnector {
    type Transport = FakeTransport;

    fn connect(&self) -> Result<FakeTransport> {
        if *self.backend.mode.lock() == BackendMode::Refusing {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "backend down").into());
        }
        Ok(FakeTransport {
            backend: Arc::clone(&self.backend),
            pending: None,
        })
    }
}

/// One connection to the fake backend
pub struct FakeTransport {
    backend: Arc<FakeBackend>,
    pending: Option<String>,
}

impl Transport for FakeTransport {
    fn read_line(&mut self) -> Result<String> {
        self.pending
            .take()
            .ok_or_else(|| TierError::Protocol(ProtocolError::Truncated { read: 0 }))
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        self.backend.calls.fetch_add(1, Ordering::SeqCst);
        self.backend.received.lock().push(text.to_string());

        match *self.backend.mode.lock() {
            BackendMode::Up => {
                self.pending = Some(self.backend.handler.handle_line(text).into_string());
            }
            BackendMode::Busy => {
                self.pending = Some(Response::server_busy().into_string());
            }
            BackendMode::Refusing | BackendMode::HangUp => {}
        }
        Ok(())
    }
}

// =============================================================================
// Real servers
// =============================================================================

/// A server running on its own thread
pub struct RunningServer {
    pub addr: SocketAddr,
    shutdown: ShutdownHandle,
    thread: Option<JoinHandle<Result<()>>>,
}

impl RunningServer {
    pub fn addr_string(&self) -> String {
        self.addr.to_string()
    }

    pub fn stop(mut self) {
        self.stop_inner();
    }

    fn stop_inner(&mut self) {
        self.shutdown.shutdown();
        if let Some(thread) = self.thread.take() {
            thread.join().unwrap().unwrap();
        }
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.stop_inner();
        }
    }
}

/// Bind `handler` on an ephemeral loopback port and serve in the background
pub fn spawn_server<H>(handler: Arc<H>, config: Config) -> RunningServer
where
    H: CommandHandler + 'static,
{
    let server = Server::bind("127.0.0.1:0", handler, config).unwrap();
    let addr = server.local_addr();
    let shutdown = server.shutdown_handle();
    let thread = thread::spawn(move || server.run());

    RunningServer {
        addr,
        shutdown,
        thread: Some(thread),
    }
}

/// Test config with short timeouts
pub fn test_config() -> Config {
    Config::builder()
        .read_timeout_ms(2000)
        .write_timeout_ms(2000)
        .backend_timeout_ms(2000)
        .build()
}
