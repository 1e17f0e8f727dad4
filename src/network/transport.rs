//! Transport
//!
//! Line-level I/O over any byte stream, plus the TCP connector the proxy
//! uses to reach the backend.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, TierError};
use crate::protocol::{read_command, write_response, MAX_RESPONSE_LEN, READ_CHUNK_SIZE};

/// Reads and writes whole protocol lines
pub trait Transport {
    /// Read one line, delimiter stripped
    fn read_line(&mut self) -> Result<String>;

    /// Write one line, delimiter appended
    fn write_line(&mut self, text: &str) -> Result<()>;
}

/// Opens a fresh transport to the backend for every forwarded request
pub trait Connector: Send + Sync {
    type Transport: Transport;

    fn connect(&self) -> Result<Self::Transport>;
}

/// Send one line and wait for the one-line answer
pub fn exchange<T: Transport + ?Sized>(transport: &mut T, line: &str) -> Result<String> {
    transport.write_line(line)?;
    transport.read_line()
}

// =============================================================================
// LineTransport
// =============================================================================

/// `Transport` over a buffered reader and a writer
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,

    /// Longest line accepted by `read_line`
    max_line_len: usize,
}

impl<R: BufRead, W: Write> LineTransport<R, W> {
    pub fn new(reader: R, writer: W, max_line_len: usize) -> Self {
        Self {
            reader,
            writer,
            max_line_len,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<R: BufRead, W: Write> Transport for LineTransport<R, W> {
    fn read_line(&mut self) -> Result<String> {
        read_command(&mut self.reader, self.max_line_len)
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        write_response(&mut self.writer, text)
    }
}

/// Buffered TCP transport
pub type TcpTransport = LineTransport<BufReader<TcpStream>, BufWriter<TcpStream>>;

impl LineTransport<BufReader<TcpStream>, BufWriter<TcpStream>> {
    /// Wrap a connected stream
    ///
    /// Disables Nagle's algorithm and applies the given timeouts.
    pub fn tcp(
        stream: TcpStream,
        max_line_len: usize,
        read_chunk_size: usize,
        read_timeout: Option<Duration>,
        write_timeout: Option<Duration>,
    ) -> Result<Self> {
        stream.set_nodelay(true)?;
        stream.set_read_timeout(read_timeout)?;
        stream.set_write_timeout(write_timeout)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;

        Ok(Self::new(
            BufReader::with_capacity(read_chunk_size, read_stream),
            BufWriter::new(stream),
            max_line_len,
        ))
    }

    /// Peer address for logging
    pub fn peer_addr(&self) -> String {
        self.reader
            .get_ref()
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

// =============================================================================
// TcpConnector
// =============================================================================

/// Connects to `host:port` over TCP
#[derive(Debug, Clone)]
pub struct TcpConnector {
    addr: String,

    /// Applied to connect, read and write
    timeout: Option<Duration>,

    max_response_len: usize,
}

impl TcpConnector {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: None,
            max_response_len: MAX_RESPONSE_LEN,
        }
    }

    /// Connector for the configured backend
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.backend_addr())
            .with_timeout(config.backend_timeout())
            .with_max_response_len(config.max_response_len)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_response_len(mut self, len: usize) -> Self {
        self.max_response_len = len;
        self
    }

    fn open_stream(&self) -> Result<TcpStream> {
        let Some(timeout) = self.timeout else {
            return Ok(TcpStream::connect(&self.addr)?);
        };

        // connect_timeout takes a single SocketAddr, so try each resolution
        let mut last_err = None;
        for addr in self.addr.to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }

        Err(match last_err {
            Some(e) => e.into(),
            None => TierError::Transport(format!("{} resolved to no addresses", self.addr)),
        })
    }
}

impl Connector for TcpConnector {
    type Transport = TcpTransport;

    fn connect(&self) -> Result<TcpTransport> {
        let stream = self.open_stream()?;
        TcpTransport::tcp(
            stream,
            self.max_response_len,
            READ_CHUNK_SIZE,
            self.timeout,
            self.timeout,
        )
    }
}
