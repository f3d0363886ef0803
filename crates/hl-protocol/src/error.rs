//! Protocol error types

use thiserror::Error;

/// Errors that can occur while reading or writing protocol lines
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Blank line where a message was expected
    #[error("Empty message")]
    Empty,

    /// Line does not start with a recognized command
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Command value is not a decimal integer
    #[error("Invalid integer: {0:?}")]
    InvalidInteger(String),

    /// Line is not one of the reply tokens
    #[error("Unknown reply: {0}")]
    UnknownReply(String),

    /// Line exceeds the maximum accepted length
    #[error("Line too long: exceeds maximum of {max} bytes")]
    LineTooLong { max: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// Whether this error is caused by the peer's input rather than the transport
    pub fn is_malformed(&self) -> bool {
        !matches!(self, ProtocolError::Io(_))
    }
}
