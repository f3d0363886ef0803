//! Judge configuration

use hl_protocol::QUERY_BUDGET;
use serde::{Deserialize, Serialize};

/// Configuration for the judge role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    /// Query budget announced in reply to `MAX_QUERIES`
    pub max_queries: u32,

    /// Terminate the session when the contestant exceeds the budget
    pub enforce_budget: bool,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            max_queries: QUERY_BUDGET,
            enforce_budget: true,
        }
    }
}
