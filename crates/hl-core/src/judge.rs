//! Judge state machine
//!
//! The judge holds one secret for one session and answers requests until
//! the contestant submits a final answer. Malformed lines never reach the
//! judge: the session driver rejects them before calling [`Judge::handle`].

use hl_protocol::{Reply, Request};

use crate::error::SessionError;
use crate::types::{Outcome, Secret};

/// Judge session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeState {
    /// Waiting for the next request
    AwaitingCommand,
    /// Final answer received; no further requests are processed
    Terminated { outcome: Outcome, answer: i64 },
    /// Session ended on a protocol failure, without a verdict
    Aborted,
}

impl JudgeState {
    /// Whether the judge still accepts requests
    pub fn is_open(&self) -> bool {
        matches!(self, JudgeState::AwaitingCommand)
    }
}

/// Arbitrates one session for one secret
#[derive(Debug)]
pub struct Judge {
    secret: Secret,
    budget: u32,
    enforce_budget: bool,
    queries: u32,
    state: JudgeState,
}

impl Judge {
    /// Create a judge enforcing `budget` queries
    pub fn new(secret: Secret, budget: u32) -> Self {
        Self {
            secret,
            budget,
            enforce_budget: true,
            queries: 0,
            state: JudgeState::AwaitingCommand,
        }
    }

    /// Enable or disable the query budget check
    pub fn with_budget_enforced(mut self, enforce: bool) -> Self {
        self.enforce_budget = enforce;
        self
    }

    pub fn secret(&self) -> Secret {
        self.secret
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn state(&self) -> JudgeState {
        self.state
    }

    /// Number of comparison queries answered so far
    pub fn queries_used(&self) -> u32 {
        self.queries
    }

    /// End the session without a verdict after a protocol violation
    pub fn abort(&mut self) {
        if self.state.is_open() {
            self.state = JudgeState::Aborted;
        }
    }

    /// Answer a single request
    ///
    /// An `Answer` terminates the session with `AC` or `WA`. When the budget
    /// is enforced, the query after the last allowed one terminates the
    /// session with [`SessionError::QueryLimitExceeded`] and no reply.
    pub fn handle(&mut self, request: Request) -> Result<Reply, SessionError> {
        if !self.state.is_open() {
            return Err(SessionError::Terminated);
        }

        match request {
            Request::MaxQueries => Ok(Reply::Budget(self.budget)),
            Request::Query(value) => {
                if self.enforce_budget && self.queries >= self.budget {
                    tracing::warn!(limit = self.budget, "query budget exhausted");
                    self.state = JudgeState::Aborted;
                    return Err(SessionError::QueryLimitExceeded { limit: self.budget });
                }
                self.queries += 1;
                Ok(Reply::from(self.secret.compare(value)))
            }
            Request::Answer(value) => {
                let outcome = if value == self.secret.value() {
                    Outcome::Accepted
                } else {
                    Outcome::Rejected
                };
                self.state = JudgeState::Terminated {
                    outcome,
                    answer: value,
                };
                Ok(match outcome {
                    Outcome::Accepted => Reply::Accepted,
                    Outcome::Rejected => Reply::Rejected,
                })
            }
        }
    }
}
