//! Referee configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::serde_utils::duration_millis;

/// Configuration for refereeing an external contestant program
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefereeConfig {
    /// Wall-clock limit for the whole interaction, in milliseconds
    #[serde(with = "duration_millis")]
    pub time_limit: Duration,

    /// Write the number of cases as the first line to the program
    pub send_case_count: bool,

    /// Write `AC`/`WA` back to the program after each answer
    pub forward_verdict: bool,

    /// Maximum number of stderr characters kept in a runtime error report
    pub stderr_limit: usize,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_millis(2000),
            send_case_count: true,
            forward_verdict: false,
            stderr_limit: 1000,
        }
    }
}
