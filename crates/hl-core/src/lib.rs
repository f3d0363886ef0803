//! hl-core: Judge, contestant and referee for the hilo guessing game
//!
//! The judge and the contestant are plain state machines. The session
//! drivers in [`session`] run them over a [`Channel`], which works with any
//! pair of async byte streams: stdin/stdout, child process pipes or an
//! in-memory duplex.

pub mod channel;
pub mod config;
pub mod error;
pub mod judge;
pub mod referee;
pub mod session;
pub mod solver;
pub mod traits;
pub mod types;

pub use channel::Channel;
pub use error::{GameError, SessionError};
pub use judge::{Judge, JudgeState};
pub use solver::{BinarySearch, Contestant};
pub use traits::Strategy;
pub use types::{Interval, Outcome, Secret};
