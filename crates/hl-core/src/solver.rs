//! Contestant side: binary search over the secret range
//!
//! [`BinarySearch`] narrows a closed interval with three-way comparisons.
//! [`Contestant`] wraps any [`Strategy`] with the query budget and turns it
//! into the request sequence of one session.

use std::cmp::Ordering;

use hl_protocol::{Reply, Request};

use crate::error::SessionError;
use crate::traits::Strategy;
use crate::types::Interval;

/// Binary search with a three-way comparator
///
/// Always queries the midpoint of the remaining interval, including a
/// collapsed one-value interval, so every success is confirmed by `=`.
/// With an honest judge the secret stays inside the interval after every
/// step. If a reply would empty the interval, the search stops and keeps the
/// last non-empty interval for its best guess.
#[derive(Debug, Clone)]
pub struct BinarySearch {
    interval: Interval,
    found: Option<i64>,
    inconsistent: bool,
}

impl BinarySearch {
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            found: None,
            inconsistent: interval.is_empty(),
        }
    }

    /// Current candidate range
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Whether replies contradicted each other and the search gave up
    pub fn is_inconsistent(&self) -> bool {
        self.inconsistent
    }
}

impl Default for BinarySearch {
    fn default() -> Self {
        Self::new(Interval::full())
    }
}

impl Strategy for BinarySearch {
    fn next_guess(&self) -> Option<i64> {
        if self.found.is_some() || self.inconsistent {
            return None;
        }
        Some(self.interval.midpoint())
    }

    fn observe(&mut self, guess: i64, ordering: Ordering) {
        let narrowed = match ordering {
            Ordering::Equal => {
                self.found = Some(guess);
                return;
            }
            Ordering::Less => self.interval.below(guess),
            Ordering::Greater => self.interval.above(guess),
        };

        if narrowed.is_empty() {
            tracing::warn!(
                interval = %self.interval,
                guess,
                "reply empties the search range, keeping last valid bounds"
            );
            self.inconsistent = true;
        } else {
            self.interval = narrowed;
        }
    }

    fn found(&self) -> Option<i64> {
        self.found
    }

    fn best_guess(&self) -> i64 {
        self.interval.lo
    }
}

/// Contestant state machine for one session
#[derive(Debug)]
pub struct Contestant<S> {
    strategy: S,
    budget: u32,
    queries: u32,
    pending: Option<i64>,
    answer: Option<i64>,
}

impl<S: Strategy> Contestant<S> {
    pub fn new(strategy: S, budget: u32) -> Self {
        Self {
            strategy,
            budget,
            queries: 0,
            pending: None,
            answer: None,
        }
    }

    /// Replace the budget, e.g. with the value obtained from `MAX_QUERIES`
    pub fn set_budget(&mut self, budget: u32) {
        self.budget = budget;
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Number of queries answered so far
    pub fn queries(&self) -> u32 {
        self.queries
    }

    /// Submitted final answer, once `next_request` returned it
    pub fn answer(&self) -> Option<i64> {
        self.answer
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Next request to send
    ///
    /// Returns a query while the budget lasts and the strategy has something
    /// to ask, otherwise the final answer.
    pub fn next_request(&mut self) -> Request {
        if self.queries < self.budget {
            if let Some(guess) = self.strategy.next_guess() {
                self.pending = Some(guess);
                return Request::Query(guess);
            }
        }

        let answer = self.strategy.answer();
        self.answer = Some(answer);
        Request::Answer(answer)
    }

    /// Feed the judge's reply to the pending query
    pub fn observe(&mut self, reply: Reply) -> Result<(), SessionError> {
        let guess = self.pending.take().ok_or(SessionError::UnexpectedReply {
            expected: "no reply before a query",
            got: reply,
        })?;
        let ordering = reply.ordering().ok_or(SessionError::UnexpectedReply {
            expected: "one of <, >, =",
            got: reply,
        })?;

        self.queries += 1;
        tracing::debug!(guess, reply = %reply, queries = self.queries, "observed reply");
        self.strategy.observe(guess, ordering);
        Ok(())
    }
}
