//! hl-protocol: Line protocol for the hilo guessing game
//!
//! This crate defines the text messages exchanged between a judge, which
//! holds a secret integer, and a contestant, which narrows it down with
//! comparison queries before committing a final answer.

pub mod codec;
pub mod error;
pub mod message;

pub use codec::{LineCodec, MAX_LINE_LENGTH};
pub use error::ProtocolError;
pub use message::{Reply, Request, MAX_QUERIES_TOKEN, QUERY_BUDGET, SECRET_MAX, SECRET_MIN};
