//! TCP Server
//!
//! Accepts connections and hands each one to its own thread.

use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::{CommandHandler, Connection};
use crate::config::Config;
use crate::error::Result;
use crate::protocol::{encode_response, Response};

/// Pause after a failed `accept` (e.g. EMFILE) before retrying
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// TCP server for a backend or a proxy
pub struct Server<H: ?Sized> {
    config: Config,
    handler: Arc<H>,
    listener: TcpListener,
    local_addr: SocketAddr,

    /// Connections currently being served
    active: Arc<AtomicUsize>,

    shutdown: Arc<AtomicBool>,
}

/// Stops a running server from another thread
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Signal the server to stop accepting
    ///
    /// The accept loop only checks the flag between connections, so a
    /// throwaway connection is made to wake it.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);

        let mut wake = self.addr;
        if wake.ip().is_unspecified() {
            wake.set_ip(match wake.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            });
        }
        let _ = TcpStream::connect(wake);
    }
}

/// Decrements the active count when a connection thread ends
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<H: CommandHandler + ?Sized + 'static> Server<H> {
    /// Bind a listener on `addr`
    pub fn bind(addr: &str, handler: Arc<H>, config: Config) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(addr)?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Listening on {}", local_addr);

        Ok(Self {
            config,
            handler,
            listener,
            local_addr,
            active: Arc::new(AtomicUsize::new(0)),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            addr: self.local_addr,
        }
    }

    /// Accept connections until shut down (blocking)
    pub fn run(&self) -> Result<()> {
        let next_id = AtomicU64::new(0);

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(ACCEPT_BACKOFF);
                    continue;
                }
            };

            if self.active.load(Ordering::SeqCst) >= self.config.max_connections {
                tracing::warn!(
                    "Rejecting connection: {} connections active",
                    self.config.max_connections
                );
                reject_busy(stream);
                continue;
            }

            self.active.fetch_add(1, Ordering::SeqCst);
            let guard = ActiveGuard(Arc::clone(&self.active));
            let handler = Arc::clone(&self.handler);
            let config = self.config.clone();
            let id = next_id.fetch_add(1, Ordering::Relaxed);

            let spawned = thread::Builder::new()
                .name(format!("tierkv-conn-{}", id))
                .spawn(move || {
                    let _guard = guard;
                    match Connection::new(stream, handler, &config) {
                        Ok(mut connection) => {
                            let _ = connection.handle();
                        }
                        Err(e) => tracing::warn!("Connection setup failed: {}", e),
                    }
                });

            if let Err(e) = spawned {
                tracing::error!("Failed to spawn connection thread: {}", e);
            }
        }

        tracing::info!("Server on {} stopped", self.local_addr);
        Ok(())
    }
}

/// Best-effort busy answer before dropping the stream
fn reject_busy(mut stream: TcpStream) {
    if let Ok(bytes) = encode_response(Response::server_busy().as_str()) {
        let _ = stream.write_all(&bytes);
    }
}
