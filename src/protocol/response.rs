//! Response definitions
//!
//! Every response is one line of text. The builders below are the only
//! place the protocol's reply wording lives.

use std::fmt;

use super::DUMP_SEPARATOR;
use crate::error::ProtocolError;

/// A single-line response to send to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    text: String,
}

impl Response {
    /// Wrap arbitrary text (e.g. a value read from the store)
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Acknowledge a PUT: `key=value`
    pub fn stored(key: &str, value: &str) -> Self {
        Self::new(format!("{}={}", key, value))
    }

    /// GET miss: `Error. Input key was not found.`
    pub fn not_found(key: &str) -> Self {
        Self::new(format!("Error. Input {} was not found.", key))
    }

    /// DUMP answer: keys joined with the dump separator
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (i, key) in keys.into_iter().enumerate() {
            if i > 0 {
                text.push(DUMP_SEPARATOR);
            }
            text.push_str(key.as_ref());
        }
        Self::new(text)
    }

    /// Verb outside the dispatch table: `Unknown command VERB`
    pub fn unknown_command(verb: &str) -> Self {
        Self::new(format!("Unknown command {}", verb))
    }

    /// PUT or GET sent without a key
    pub fn missing_key(verb: &str) -> Self {
        Self::error(&format!("{} requires a key.", verb))
    }

    /// Blank command line
    pub fn empty_command() -> Self {
        Self::error("Empty command.")
    }

    /// The store refused a write
    pub fn storage_failure(key: &str, value: &str) -> Self {
        Self::new(format!("Error while storing [{}={}].", key, value))
    }

    /// The proxy could not complete an exchange with the backend
    pub fn backend_unavailable() -> Self {
        Self::new("Error contacting backend.")
    }

    /// Connection refused because the server is at its connection cap
    pub fn server_busy() -> Self {
        Self::error("Server busy.")
    }

    /// A command that could not be framed or decoded
    pub fn protocol_error(err: &ProtocolError) -> Self {
        Self::error(&format!("Malformed command: {}.", err))
    }

    /// Generic error line: `Error. <message>`
    pub fn error(message: &str) -> Self {
        Self::new(format!("Error. {}", message))
    }

    /// Check whether this line is one of the failure replies a server
    /// produces (`Error. ...`, storage failure, backend unavailable)
    ///
    /// A stored value with one of these prefixes is indistinguishable
    /// from a failure and is treated as one.
    pub fn is_failure(&self) -> bool {
        self.text.starts_with("Error. ")
            || self.text.starts_with("Error while storing [")
            || *self == Self::backend_unavailable()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<String> for Response {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
