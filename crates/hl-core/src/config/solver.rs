//! Solver configuration

use hl_protocol::QUERY_BUDGET;
use serde::{Deserialize, Serialize};

/// Configuration for the contestant role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Budget assumed when the judge is not probed
    pub max_queries: u32,

    /// Ask the judge for its budget with `MAX_QUERIES` before searching
    pub probe_budget: bool,

    /// Read the `AC`/`WA` line after submitting the answer
    pub read_verdict: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_queries: QUERY_BUDGET,
            probe_budget: false,
            read_verdict: true,
        }
    }
}
