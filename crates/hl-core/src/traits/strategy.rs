//! Search strategy trait

use std::cmp::Ordering;

/// Abstraction over how a contestant chooses its queries
///
/// A strategy only sees three-way comparison results. Budget accounting and
/// the wire exchange live in [`Contestant`](crate::Contestant) and the
/// session drivers.
pub trait Strategy {
    /// Value to query next, or `None` once no further query is useful
    fn next_guess(&self) -> Option<i64>;

    /// Record the ordering of the secret relative to `guess`
    fn observe(&mut self, guess: i64, ordering: Ordering);

    /// Value confirmed equal to the secret, if any
    fn found(&self) -> Option<i64>;

    /// Final answer to submit: the confirmed value or the best remaining guess
    fn answer(&self) -> i64 {
        self.found().unwrap_or_else(|| self.best_guess())
    }

    /// Best guess when no query was answered with equality
    fn best_guess(&self) -> i64;
}
