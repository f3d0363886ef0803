//! Core error types for hilo

use hl_protocol::{ProtocolError, Reply};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for hilo sessions
#[derive(Error, Debug)]
pub enum GameError {
    /// Protocol error
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bad session bootstrap line (secret or case count)
    #[error("Invalid bootstrap: {0}")]
    Bootstrap(String),

    /// Secret outside the playable range
    #[error("Secret {value} outside [{min}, {max}]")]
    InvalidSecret { value: i64, min: i64, max: i64 },

    /// Unreadable referee test input
    #[error("Invalid test input: {0}")]
    InvalidTests(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    /// Process exit code for a session that failed with this error
    ///
    /// `2` marks a protocol violation by the peer, `3` an exceeded query
    /// budget, `1` everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            GameError::Protocol(e) if e.is_malformed() => 2,
            GameError::Bootstrap(_) | GameError::InvalidSecret { .. } => 2,
            GameError::Session(SessionError::QueryLimitExceeded { .. }) => 3,
            GameError::Session(SessionError::UnexpectedEof)
            | GameError::Session(SessionError::UnexpectedReply { .. }) => 2,
            _ => 1,
        }
    }
}

/// Session-related errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// More queries than the budget allows
    #[error("Query limit exceeded: more than {limit} queries")]
    QueryLimitExceeded { limit: u32 },

    /// Request after the session ended
    #[error("Session already terminated")]
    Terminated,

    /// Peer closed the stream before the session ended
    #[error("Stream closed before the session ended")]
    UnexpectedEof,

    /// Reply that does not fit the pending request
    #[error("Unexpected reply {got}: expected {expected}")]
    UnexpectedReply { expected: &'static str, got: Reply },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let malformed = GameError::from(ProtocolError::UnknownCommand("hello".into()));
        assert_eq!(malformed.exit_code(), 2);

        let io = GameError::from(ProtocolError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe",
        )));
        assert_eq!(io.exit_code(), 1);

        let limit = GameError::from(SessionError::QueryLimitExceeded { limit: 10 });
        assert_eq!(limit.exit_code(), 3);

        let bootstrap = GameError::Bootstrap("missing secret".into());
        assert_eq!(bootstrap.exit_code(), 2);
    }
}
