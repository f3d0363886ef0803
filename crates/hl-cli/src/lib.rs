//! hilo: Command-line interface for the hilo guessing game
//!
//! Provides the `hilo` binary: the judge and the solver speak the line
//! protocol on stdin/stdout, `play` runs both in memory and `referee`
//! drives an external contestant program.

pub mod commands;
pub mod output;
