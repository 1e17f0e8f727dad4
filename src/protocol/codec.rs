//! Protocol codec
//!
//! Parsing, framing and encoding for the line protocol.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────────────────────────────────┬──────┐
//! │ VERB [KEY] [REMAINDER...]            │ \n   │
//! └──────────────────────────────────────┴──────┘
//! ```
//!
//! Requests and responses share the same framing: UTF-8 text with no
//! embedded newline, terminated by exactly one `\n`.

use std::io::{BufRead, ErrorKind, Write};

use bytes::BytesMut;

use super::Command;
use crate::error::{ProtocolError, Result};

/// Line delimiter
pub const DELIMITER: u8 = b'\n';

/// Default command length cap (64 KiB)
pub const MAX_COMMAND_LEN: usize = 64 * 1024;

/// Default cap on a response line read from a server (a DUMP can be large)
pub const MAX_RESPONSE_LEN: usize = 16 * 1024 * 1024;

/// Default read buffer size per connection
pub const READ_CHUNK_SIZE: usize = 256;

/// Separator between keys in a DUMP response
pub const DUMP_SEPARATOR: char = ',';

// =============================================================================
// Command Parsing
// =============================================================================

/// Split a command line into verb, key and remainder
///
/// Trailing whitespace (including a telnet `\r`) is trimmed, then the line
/// is split on single spaces. Everything after the key is kept as one
/// remainder string, so `PUT k a b` carries the value `a b`.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim_end();
    if trimmed.is_empty() {
        return Command::default();
    }

    let mut parts = trimmed.splitn(3, ' ');
    Command {
        verb: parts.next().map(str::to_string),
        key: parts.next().map(str::to_string),
        remainder: parts.next().map(str::to_string),
    }
}

// =============================================================================
// Encoding / Decoding
// =============================================================================

/// Encode a response: the text plus exactly one trailing newline
pub fn encode_response(text: &str) -> Result<Vec<u8>> {
    encode_line(text)
}

/// Encode a command line for sending to a server
pub fn encode_command(line: &str) -> Result<Vec<u8>> {
    encode_line(line)
}

fn encode_line(text: &str) -> Result<Vec<u8>> {
    if text.as_bytes().contains(&DELIMITER) {
        return Err(ProtocolError::EmbeddedNewline.into());
    }

    let mut message = Vec::with_capacity(text.len() + 1);
    message.extend_from_slice(text.as_bytes());
    message.push(DELIMITER);
    Ok(message)
}

/// Decode one encoded response back into its text
///
/// The buffer must hold exactly one newline-terminated line.
pub fn decode_response(mut bytes: &[u8]) -> Result<String> {
    let text = read_command(&mut bytes, usize::MAX)?;
    if !bytes.is_empty() {
        return Err(ProtocolError::EmbeddedNewline.into());
    }
    Ok(text)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one newline-terminated line from a stream
///
/// Blocks until the delimiter arrives. The delimiter is stripped and no
/// byte past it is consumed. Fails with `Truncated` on EOF before the
/// delimiter and with `TooLong` once more than `max_len` bytes arrive
/// without one.
pub fn read_command<R: BufRead>(reader: &mut R, max_len: usize) -> Result<String> {
    let mut line = BytesMut::with_capacity(READ_CHUNK_SIZE.min(max_len));

    loop {
        let available = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        if available.is_empty() {
            return Err(ProtocolError::Truncated { read: line.len() }.into());
        }

        match available.iter().position(|&b| b == DELIMITER) {
            Some(pos) => {
                if line.len() + pos > max_len {
                    return Err(ProtocolError::TooLong { limit: max_len }.into());
                }
                line.extend_from_slice(&available[..pos]);
                reader.consume(pos + 1);
                break;
            }
            None => {
                let taken = available.len();
                if line.len() + taken > max_len {
                    return Err(ProtocolError::TooLong { limit: max_len }.into());
                }
                line.extend_from_slice(available);
                reader.consume(taken);
            }
        }
    }

    let text = std::str::from_utf8(&line).map_err(|_| ProtocolError::InvalidUtf8)?;
    Ok(text.to_string())
}

/// Read one response line from a stream
pub fn read_response<R: BufRead>(reader: &mut R, max_len: usize) -> Result<String> {
    read_command(reader, max_len)
}

/// Write a command line to a stream
pub fn write_command<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    let bytes = encode_command(line)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Write a response line to a stream
pub fn write_response<W: Write>(writer: &mut W, text: &str) -> Result<()> {
    let bytes = encode_response(text)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
