//! Judge command implementation

use anyhow::Result;

use hl_core::config::JudgeConfig;
use hl_core::session::{read_secret, run_judge};
use hl_core::{Channel, Judge, Secret};

/// Judge one session over stdin/stdout
///
/// Without `secret`, the first input line bootstraps the secret.
pub async fn judge_command(config: &JudgeConfig, secret: Option<i64>) -> Result<()> {
    let mut channel = Channel::new(tokio::io::stdin(), tokio::io::stdout());

    let secret = match secret {
        Some(value) => Secret::new(value)?,
        None => read_secret(&mut channel).await?,
    };

    let mut judge =
        Judge::new(secret, config.max_queries).with_budget_enforced(config.enforce_budget);
    let report = run_judge(&mut judge, &mut channel).await?;

    tracing::debug!(
        outcome = %report.outcome,
        queries = report.queries,
        "judge finished"
    );
    Ok(())
}
