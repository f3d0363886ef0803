//! Solve command implementation

use anyhow::Result;

use hl_core::config::SolverConfig;
use hl_core::session::{run_contestant, run_contestant_cases};
use hl_core::{BinarySearch, Channel, Contestant};

/// Play the contestant over stdin/stdout
///
/// With `cases`, the first input line is the number of sessions to play.
pub async fn solve_command(config: &SolverConfig, cases: bool) -> Result<()> {
    let mut channel = Channel::new(tokio::io::stdin(), tokio::io::stdout());

    if cases {
        let reports = run_contestant_cases(&mut channel, config).await?;
        tracing::debug!(cases = reports.len(), "all cases answered");
        return Ok(());
    }

    let mut contestant = Contestant::new(BinarySearch::default(), config.max_queries);
    let report = run_contestant(&mut contestant, &mut channel, config).await?;
    match report.verdict {
        Some(verdict) => tracing::debug!(answer = report.answer, %verdict, "session finished"),
        None => tracing::debug!(answer = report.answer, "session finished without verdict"),
    }
    Ok(())
}
