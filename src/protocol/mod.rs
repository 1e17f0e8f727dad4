//! Protocol Module
//!
//! Defines the wire protocol shared by clients, the proxy and the backend.
//!
//! ## Protocol Format (ASCII, line oriented)
//!
//! One command per connection, one response per command.
//!
//! ```text
//! Request:  VERB [KEY] [REMAINDER...]\n
//! Response: <single line>\n
//! ```
//!
//! ### Commands
//! - `PUT key v1 v2 ...` - value is `v1 v2 ...`; answers `key=value`
//! - `GET key`           - answers the raw value or `Error. Input key was not found.`
//! - `DUMP`              - answers all keys joined with `,` (possibly empty)
//! - anything else       - answers `Unknown command VERB`

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::Response;
pub use codec::{
    decode_response, encode_command, encode_response, parse_command, read_command,
    read_response, write_command, write_response, DELIMITER, DUMP_SEPARATOR, MAX_COMMAND_LEN,
    MAX_RESPONSE_LEN, READ_CHUNK_SIZE,
};
