//! Command Parsing Tests
//!
//! Tests verify:
//! - Verb / key / remainder splitting
//! - Absent parts for short lines
//! - Trailing whitespace handling
//! - Command classification

use proptest::prelude::*;
use tierkv::protocol::{parse_command, Command, CommandType, Response};

fn parts(command: &Command) -> (Option<&str>, Option<&str>, Option<&str>) {
    (
        command.verb.as_deref(),
        command.key.as_deref(),
        command.remainder.as_deref(),
    )
}

// =============================================================================
// Splitting Tests
// =============================================================================

#[test]
fn test_parse_full_command() {
    let command = parse_command("PUT a b c");
    assert_eq!(parts(&command), (Some("PUT"), Some("a"), Some("b c")));
}

#[test]
fn test_parse_verb_only() {
    let command = parse_command("GET");
    assert_eq!(parts(&command), (Some("GET"), None, None));
}

#[test]
fn test_parse_empty_line() {
    let command = parse_command("");
    assert_eq!(parts(&command), (None, None, None));
    assert_eq!(command.command_type(), CommandType::Empty);
}

#[test]
fn test_parse_whitespace_only_line() {
    let command = parse_command("   \t ");
    assert_eq!(parts(&command), (None, None, None));
}

#[test]
fn test_parse_verb_and_key() {
    let command = parse_command("GET Fred");
    assert_eq!(parts(&command), (Some("GET"), Some("Fred"), None));
}

#[test]
fn test_parse_long_remainder() {
    let command = parse_command("PUT Fred Office Hours are 12:30");
    assert_eq!(
        parts(&command),
        (Some("PUT"), Some("Fred"), Some("Office Hours are 12:30"))
    );
}

#[test]
fn test_parse_trims_trailing_whitespace() {
    let command = parse_command("GET Fred  \r");
    assert_eq!(parts(&command), (Some("GET"), Some("Fred"), None));

    let command = parse_command("PUT k v w \t");
    assert_eq!(parts(&command), (Some("PUT"), Some("k"), Some("v w")));
}

#[test]
fn test_parse_keeps_inner_spacing_of_remainder() {
    let command = parse_command("PUT k a  b");
    assert_eq!(command.remainder.as_deref(), Some("a  b"));
}

#[test]
fn test_parse_empty_key_token() {
    // Double space after the verb yields an empty key token
    let command = parse_command("PUT  value");
    assert_eq!(command.key.as_deref(), Some(""));
    assert_eq!(command.key(), None);
}

// =============================================================================
// Classification Tests
// =============================================================================

#[test]
fn test_command_types() {
    assert_eq!(parse_command("PUT a b").command_type(), CommandType::Put);
    assert_eq!(parse_command("GET a").command_type(), CommandType::Get);
    assert_eq!(parse_command("DUMP").command_type(), CommandType::Dump);
    assert_eq!(parse_command("FOO bar").command_type(), CommandType::Unknown);
}

#[test]
fn test_verbs_are_case_sensitive() {
    assert_eq!(parse_command("get a").command_type(), CommandType::Unknown);
    assert_eq!(parse_command("Put a b").command_type(), CommandType::Unknown);
}

#[test]
fn test_value_defaults_to_empty() {
    assert_eq!(parse_command("PUT k").value(), "");
    assert_eq!(parse_command("PUT k v").value(), "v");
}

// =============================================================================
// Response Classification Tests
// =============================================================================

#[test]
fn test_failure_replies() {
    assert!(Response::not_found("k").is_failure());
    assert!(Response::server_busy().is_failure());
    assert!(Response::missing_key("GET").is_failure());
    assert!(Response::storage_failure("k", "v").is_failure());
    assert!(Response::backend_unavailable().is_failure());
    assert_eq!(Response::server_busy().as_str(), "Error. Server busy.");
}

#[test]
fn test_values_are_not_failures() {
    assert!(!Response::new("Office Hours").is_failure());
    assert!(!Response::new("").is_failure());
    assert!(!Response::new("Errors happen").is_failure());
    assert!(!Response::stored("k", "v").is_failure());
}

// =============================================================================
// Properties
// =============================================================================

fn token() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_:.=-]{1,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Rejoining the parts reproduces the trimmed line
    #[test]
    fn prop_parts_rejoin_to_line(tokens in prop::collection::vec(token(), 1..8)) {
        let line = tokens.join(" ");
        let command = parse_command(&line);

        let rejoined: Vec<&str> = [
            command.verb.as_deref(),
            command.key.as_deref(),
            command.remainder.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        prop_assert_eq!(rejoined.join(" "), line);
    }

    /// Verb and key are always the first two tokens
    #[test]
    fn prop_verb_and_key_are_leading_tokens(tokens in prop::collection::vec(token(), 1..8)) {
        let command = parse_command(&tokens.join(" "));

        prop_assert_eq!(command.verb.as_deref(), Some(tokens[0].as_str()));
        prop_assert_eq!(command.key.as_deref(), tokens.get(1).map(String::as_str));
        prop_assert_eq!(command.remainder.is_some(), tokens.len() > 2);
    }
}
