//! Command definitions
//!
//! Represents one parsed command line.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Put,
    Get,
    Dump,
    /// Any verb outside the dispatch table
    Unknown,
    /// Blank line
    Empty,
}

impl CommandType {
    /// Classify a verb. Matching is case-sensitive.
    pub fn from_verb(verb: &str) -> Self {
        match verb {
            "PUT" => CommandType::Put,
            "GET" => CommandType::Get,
            "DUMP" => CommandType::Dump,
            _ => CommandType::Unknown,
        }
    }
}

/// A parsed command: `VERB [KEY] [REMAINDER...]`
///
/// Each part is `None` when the line has too few tokens. Produced fresh
/// for every received line and never retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    /// First token
    pub verb: Option<String>,

    /// Second token
    pub key: Option<String>,

    /// Every token after the key, rejoined with single spaces
    pub remainder: Option<String>,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self.verb.as_deref() {
            Some(verb) => CommandType::from_verb(verb),
            None => CommandType::Empty,
        }
    }

    /// The key, treating an empty token as missing
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }

    /// The value carried by a PUT; no remainder stores an empty string
    pub fn value(&self) -> &str {
        self.remainder.as_deref().unwrap_or("")
    }
}
