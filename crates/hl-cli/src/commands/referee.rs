//! Referee command implementation

use anyhow::{Context, Result};

use hl_core::config::HiloConfig;
use hl_core::referee::Referee;
use hl_core::Secret;

use crate::output::print_report;

/// Run a contestant program against the judge
///
/// `command` is the program followed by its arguments. Returns whether the
/// verdict is Accepted.
pub async fn referee_command(
    config: &HiloConfig,
    secrets: &[Secret],
    command: &[String],
    json: bool,
) -> Result<bool> {
    let (program, args) = command
        .split_first()
        .context("No contestant program given")?;

    let referee = Referee::new(program, config.judge.max_queries, config.referee.clone()).args(args);
    let report = referee
        .run(secrets)
        .await
        .with_context(|| format!("Failed to run contestant {:?}", program))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(report.verdict.is_accepted())
}
