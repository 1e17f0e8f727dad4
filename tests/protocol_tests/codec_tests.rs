//! Codec Tests
//!
//! Tests for line framing, response encoding and stream helpers.

use std::io::{BufReader, Cursor, Read};

use proptest::prelude::*;
use tierkv::error::{ProtocolError, TierError};
use tierkv::protocol::{
    decode_response, encode_command, encode_response, read_command, read_response,
    write_command, write_response, MAX_COMMAND_LEN,
};

fn protocol_error(err: TierError) -> ProtocolError {
    match err {
        TierError::Protocol(e) => e,
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

// =============================================================================
// read_command Tests
// =============================================================================

#[test]
fn test_read_command_strips_delimiter() {
    let mut cursor = Cursor::new(b"GET Fred\n".to_vec());
    let line = read_command(&mut cursor, MAX_COMMAND_LEN).unwrap();
    assert_eq!(line, "GET Fred");
}

#[test]
fn test_read_command_does_not_consume_past_delimiter() {
    let mut cursor = Cursor::new(b"GET a\nGET b\n".to_vec());

    assert_eq!(read_command(&mut cursor, MAX_COMMAND_LEN).unwrap(), "GET a");
    assert_eq!(read_command(&mut cursor, MAX_COMMAND_LEN).unwrap(), "GET b");
}

#[test]
fn test_read_command_empty_line() {
    let mut cursor = Cursor::new(b"\n".to_vec());
    assert_eq!(read_command(&mut cursor, MAX_COMMAND_LEN).unwrap(), "");
}

#[test]
fn test_read_command_truncated() {
    let mut cursor = Cursor::new(b"PUT a b".to_vec());
    let err = read_command(&mut cursor, MAX_COMMAND_LEN).unwrap_err();
    assert_eq!(protocol_error(err), ProtocolError::Truncated { read: 7 });
}

#[test]
fn test_read_command_empty_stream() {
    let mut cursor = Cursor::new(Vec::new());
    let err = read_command(&mut cursor, MAX_COMMAND_LEN).unwrap_err();
    assert!(err.is_disconnect());
    assert_eq!(protocol_error(err), ProtocolError::Truncated { read: 0 });
}

#[test]
fn test_read_command_too_long() {
    let mut cursor = Cursor::new(b"abcdefgh".to_vec());
    let err = read_command(&mut cursor, 5).unwrap_err();
    assert_eq!(protocol_error(err), ProtocolError::TooLong { limit: 5 });
}

#[test]
fn test_read_command_too_long_with_late_delimiter() {
    let mut cursor = Cursor::new(b"hello!\n".to_vec());
    let err = read_command(&mut cursor, 5).unwrap_err();
    assert_eq!(protocol_error(err), ProtocolError::TooLong { limit: 5 });
}

#[test]
fn test_read_command_exactly_at_limit() {
    let mut cursor = Cursor::new(b"hello\n".to_vec());
    assert_eq!(read_command(&mut cursor, 5).unwrap(), "hello");
}

#[test]
fn test_read_command_across_small_chunks() {
    // A 1-byte buffer forces the line to be assembled chunk by chunk
    let data = b"PUT Fred Office Hours are 12:30\nrest".to_vec();
    let mut reader = BufReader::with_capacity(1, Cursor::new(data));

    let line = read_command(&mut reader, MAX_COMMAND_LEN).unwrap();
    assert_eq!(line, "PUT Fred Office Hours are 12:30");

    let mut rest = String::new();
    reader.read_to_string(&mut rest).unwrap();
    assert_eq!(rest, "rest");
}

#[test]
fn test_read_command_limit_applies_across_chunks() {
    let data = vec![b'x'; 1000];
    let mut reader = BufReader::with_capacity(16, Cursor::new(data));
    let err = read_command(&mut reader, 100).unwrap_err();
    assert_eq!(protocol_error(err), ProtocolError::TooLong { limit: 100 });
}

#[test]
fn test_read_command_invalid_utf8() {
    let mut cursor = Cursor::new(vec![0xFF, 0xFE, b'\n']);
    let err = read_command(&mut cursor, MAX_COMMAND_LEN).unwrap_err();
    assert_eq!(protocol_error(err), ProtocolError::InvalidUtf8);
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_response_appends_newline() {
    assert_eq!(encode_response("Fred=hi").unwrap(), b"Fred=hi\n");
}

#[test]
fn test_encode_empty_response() {
    assert_eq!(encode_response("").unwrap(), b"\n");
}

#[test]
fn test_encode_response_rejects_embedded_newline() {
    let err = encode_response("two\nlines").unwrap_err();
    assert_eq!(protocol_error(err), ProtocolError::EmbeddedNewline);
}

#[test]
fn test_encode_command_rejects_embedded_newline() {
    assert!(encode_command("GET a\nGET b").is_err());
}

#[test]
fn test_decode_response() {
    assert_eq!(decode_response(b"value\n").unwrap(), "value");
}

#[test]
fn test_decode_response_missing_newline() {
    let err = decode_response(b"value").unwrap_err();
    assert_eq!(protocol_error(err), ProtocolError::Truncated { read: 5 });
}

#[test]
fn test_decode_response_trailing_data() {
    let err = decode_response(b"one\ntwo\n").unwrap_err();
    assert_eq!(protocol_error(err), ProtocolError::EmbeddedNewline);
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_write_read_command() {
    let mut buffer = Vec::new();
    write_command(&mut buffer, "PUT key value").unwrap();
    assert_eq!(buffer, b"PUT key value\n");

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_command(&mut cursor, MAX_COMMAND_LEN).unwrap(), "PUT key value");
}

#[test]
fn test_stream_multiple_responses() {
    let responses = ["key=value", "", "Error. Input x was not found.", "a,b,c"];

    let mut buffer = Vec::new();
    for resp in &responses {
        write_response(&mut buffer, resp).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &responses {
        assert_eq!(read_response(&mut cursor, MAX_COMMAND_LEN).unwrap(), *expected);
    }
}

#[test]
fn test_write_response_with_newline_writes_nothing() {
    let mut buffer = Vec::new();
    assert!(write_response(&mut buffer, "bad\n").is_err());
    assert!(buffer.is_empty());
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Decoding an encoded response yields the original text
    #[test]
    fn prop_response_round_trip(text in "[^\n]{0,200}") {
        let encoded = encode_response(&text).unwrap();
        prop_assert_eq!(encoded.last(), Some(&b'\n'));
        prop_assert_eq!(decode_response(&encoded).unwrap(), text);
    }
}
