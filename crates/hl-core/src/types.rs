//! Core types for hilo

use std::cmp::Ordering;
use std::fmt;

use hl_protocol::{SECRET_MAX, SECRET_MIN};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// The judge's hidden value, fixed for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Secret(i64);

impl Secret {
    /// Create a secret, rejecting values outside `[SECRET_MIN, SECRET_MAX]`
    pub fn new(value: i64) -> Result<Self, GameError> {
        if !(SECRET_MIN..=SECRET_MAX).contains(&value) {
            return Err(GameError::InvalidSecret {
                value,
                min: SECRET_MIN,
                max: SECRET_MAX,
            });
        }
        Ok(Self(value))
    }

    /// Draw a uniformly random secret from the playable range
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(SECRET_MIN..=SECRET_MAX))
    }

    /// Get the raw value
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Ordering of the secret relative to `value`
    pub fn compare(&self, value: i64) -> Ordering {
        self.0.cmp(&value)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed integer range `[lo, hi]` that still may contain the secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: i64,
    pub hi: i64,
}

impl Interval {
    /// Create a new interval (may be empty if `lo > hi`)
    pub fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    /// The full playable range
    pub fn full() -> Self {
        Self::new(SECRET_MIN, SECRET_MAX)
    }

    /// No value can lie in the interval
    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    /// Number of values in the interval
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.hi.abs_diff(self.lo) + 1
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Floor of the arithmetic mean of the bounds
    ///
    /// Only meaningful for a non-empty interval.
    pub fn midpoint(&self) -> i64 {
        self.lo + (self.hi - self.lo) / 2
    }

    /// Values strictly below `value`
    pub fn below(&self, value: i64) -> Self {
        Self::new(self.lo, value - 1)
    }

    /// Values strictly above `value`
    pub fn above(&self, value: i64) -> Self {
        Self::new(value + 1, self.hi)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// How a session that reached a final answer ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Final answer equal to the secret
    Accepted,
    /// Final answer different from the secret
    Rejected,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted => write!(f, "accepted"),
            Outcome::Rejected => write!(f, "rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_secret_range() {
        assert!(Secret::new(1).is_ok());
        assert!(Secret::new(1000).is_ok());
        assert!(matches!(
            Secret::new(0),
            Err(GameError::InvalidSecret { value: 0, .. })
        ));
        assert!(Secret::new(1001).is_err());
    }

    #[test]
    fn test_random_secret_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let secret = Secret::random(&mut rng);
            assert!(Interval::full().contains(secret.value()));
        }
    }

    #[test]
    fn test_interval_midpoint() {
        assert_eq!(Interval::full().midpoint(), 500);
        assert_eq!(Interval::new(876, 1000).midpoint(), 938);
        assert_eq!(Interval::new(7, 7).midpoint(), 7);
        assert_eq!(Interval::new(-3, 0).midpoint(), -2);
    }

    #[test]
    fn test_interval_narrowing() {
        let full = Interval::full();
        assert_eq!(full.below(500), Interval::new(1, 499));
        assert_eq!(full.above(500), Interval::new(501, 1000));
        assert!(Interval::new(4, 4).below(4).is_empty());
        assert_eq!(Interval::new(4, 3).len(), 0);
        assert_eq!(full.len(), 1000);
    }
}
