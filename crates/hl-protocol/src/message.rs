//! Message types for the hilo protocol
//!
//! Every message is a single line of text. The contestant sends requests,
//! the judge answers each one with exactly one reply.
//!
//! # Message Flow
//!
//! 1. Optionally, the contestant sends `MAX_QUERIES` and the judge replies
//!    with the query budget (`10`)
//! 2. The contestant sends `? <v>`, the judge replies `<`, `>` or `=`
//! 3. The contestant sends `! <v>`, the judge replies `AC` or `WA` and the
//!    session ends

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Number of queries a contestant may issue before it must answer
pub const QUERY_BUDGET: u32 = 10;

/// Smallest possible secret
pub const SECRET_MIN: i64 = 1;

/// Largest possible secret
pub const SECRET_MAX: i64 = 1000;

/// Capability probe asking for the query budget
pub const MAX_QUERIES_TOKEN: &str = "MAX_QUERIES";

/// Contestant to judge messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Three-way comparison of a value against the secret (`? <v>`)
    Query(i64),
    /// Final claim for the secret's value (`! <v>`)
    Answer(i64),
    /// Ask for the query budget (`MAX_QUERIES`)
    MaxQueries,
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Query(v) => write!(f, "? {}", v),
            Request::Answer(v) => write!(f, "! {}", v),
            Request::MaxQueries => f.write_str(MAX_QUERIES_TOKEN),
        }
    }
}

impl FromStr for Request {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        if line.is_empty() {
            return Err(ProtocolError::Empty);
        }
        if line == MAX_QUERIES_TOKEN {
            return Ok(Request::MaxQueries);
        }

        // The value may follow the sigil with or without separating whitespace
        if let Some(rest) = line.strip_prefix('?') {
            return parse_value(rest).map(Request::Query);
        }
        if let Some(rest) = line.strip_prefix('!') {
            return parse_value(rest).map(Request::Answer);
        }

        Err(ProtocolError::UnknownCommand(line.to_string()))
    }
}

fn parse_value(rest: &str) -> Result<i64, ProtocolError> {
    let token = rest.trim_start();
    token
        .parse::<i64>()
        .map_err(|_| ProtocolError::InvalidInteger(token.to_string()))
}

/// Judge to contestant messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    /// Secret is less than the queried value (`<`)
    Less,
    /// Secret is greater than the queried value (`>`)
    Greater,
    /// Secret equals the queried value (`=`)
    Equal,
    /// Final answer is correct (`AC`)
    Accepted,
    /// Final answer is wrong (`WA`)
    Rejected,
    /// Query budget, in reply to `MAX_QUERIES`
    Budget(u32),
}

impl Reply {
    /// Whether this reply ends the session
    pub fn is_terminal(&self) -> bool {
        matches!(self, Reply::Accepted | Reply::Rejected)
    }

    /// Whether this reply answers a comparison query
    pub fn is_comparison(&self) -> bool {
        self.ordering().is_some()
    }

    /// Ordering of the secret relative to the queried value
    pub fn ordering(&self) -> Option<Ordering> {
        match self {
            Reply::Less => Some(Ordering::Less),
            Reply::Greater => Some(Ordering::Greater),
            Reply::Equal => Some(Ordering::Equal),
            _ => None,
        }
    }
}

/// Builds a comparison reply from `secret.cmp(&value)`
impl From<Ordering> for Reply {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Reply::Less,
            Ordering::Greater => Reply::Greater,
            Ordering::Equal => Reply::Equal,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Less => f.write_str("<"),
            Reply::Greater => f.write_str(">"),
            Reply::Equal => f.write_str("="),
            Reply::Accepted => f.write_str("AC"),
            Reply::Rejected => f.write_str("WA"),
            Reply::Budget(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for Reply {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(ProtocolError::Empty),
            "<" => Ok(Reply::Less),
            ">" => Ok(Reply::Greater),
            "=" => Ok(Reply::Equal),
            "AC" => Ok(Reply::Accepted),
            "WA" => Ok(Reply::Rejected),
            other => other
                .parse::<u32>()
                .map(Reply::Budget)
                .map_err(|_| ProtocolError::UnknownReply(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_display() {
        assert_eq!(Request::Query(500).to_string(), "? 500");
        assert_eq!(Request::Answer(3).to_string(), "! 3");
        assert_eq!(Request::MaxQueries.to_string(), "MAX_QUERIES");
    }

    #[test]
    fn test_request_parse() {
        assert_eq!("? 500".parse::<Request>().unwrap(), Request::Query(500));
        assert_eq!("! 1000".parse::<Request>().unwrap(), Request::Answer(1000));
        assert_eq!("MAX_QUERIES".parse::<Request>().unwrap(), Request::MaxQueries);
    }

    #[test]
    fn test_request_parse_loose_spacing() {
        assert_eq!("?500".parse::<Request>().unwrap(), Request::Query(500));
        assert_eq!("!   7  ".parse::<Request>().unwrap(), Request::Answer(7));
        assert_eq!("  ? -4\r".parse::<Request>().unwrap(), Request::Query(-4));
    }

    #[test]
    fn test_request_parse_malformed() {
        assert!(matches!(
            "? abc".parse::<Request>(),
            Err(ProtocolError::InvalidInteger(t)) if t == "abc"
        ));
        assert!(matches!(
            "!".parse::<Request>(),
            Err(ProtocolError::InvalidInteger(_))
        ));
        assert!(matches!(
            "? 5 6".parse::<Request>(),
            Err(ProtocolError::InvalidInteger(_))
        ));
        assert!(matches!(
            "guess 5".parse::<Request>(),
            Err(ProtocolError::UnknownCommand(_))
        ));
        assert!(matches!(
            "max_queries".parse::<Request>(),
            Err(ProtocolError::UnknownCommand(_))
        ));
        assert!(matches!("   ".parse::<Request>(), Err(ProtocolError::Empty)));
    }

    #[test]
    fn test_reply_parse() {
        assert_eq!("<".parse::<Reply>().unwrap(), Reply::Less);
        assert_eq!(">".parse::<Reply>().unwrap(), Reply::Greater);
        assert_eq!("=".parse::<Reply>().unwrap(), Reply::Equal);
        assert_eq!("AC".parse::<Reply>().unwrap(), Reply::Accepted);
        assert_eq!("WA".parse::<Reply>().unwrap(), Reply::Rejected);
        assert_eq!("10".parse::<Reply>().unwrap(), Reply::Budget(10));
    }

    #[test]
    fn test_reply_parse_unknown() {
        assert!(matches!(
            "ac".parse::<Reply>(),
            Err(ProtocolError::UnknownReply(_))
        ));
        assert!(matches!(
            "-1".parse::<Reply>(),
            Err(ProtocolError::UnknownReply(_))
        ));
    }

    #[test]
    fn test_reply_terminal() {
        assert!(Reply::Accepted.is_terminal());
        assert!(Reply::Rejected.is_terminal());
        assert!(!Reply::Equal.is_terminal());
        assert!(!Reply::Budget(10).is_terminal());
        assert!(Reply::Less.is_comparison());
        assert!(!Reply::Budget(10).is_comparison());
    }

    #[test]
    fn test_reply_from_ordering() {
        assert_eq!(Reply::from(3i64.cmp(&500)), Reply::Less);
        assert_eq!(Reply::from(3i64.cmp(&2)), Reply::Greater);
        assert_eq!(Reply::from(3i64.cmp(&3)), Reply::Equal);
        assert_eq!(Reply::Less.ordering(), Some(Ordering::Less));
        assert_eq!(Reply::Accepted.ordering(), None);
    }
}
