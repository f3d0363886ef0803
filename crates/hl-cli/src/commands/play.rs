//! Play command implementation

use anyhow::{Context, Result};

use hl_core::config::HiloConfig;
use hl_core::session::play;
use hl_core::Secret;

use crate::output::{format_plays, print_error, print_success};

/// Run the built-in solver against the built-in judge for each secret
///
/// Returns whether every session was accepted.
pub async fn play_command(config: &HiloConfig, secrets: &[Secret], json: bool) -> Result<bool> {
    let mut reports = Vec::with_capacity(secrets.len());
    for secret in secrets {
        let report = play(*secret, &config.judge, &config.solver)
            .await
            .with_context(|| format!("Session with secret {} failed", secret))?;
        reports.push(report);
    }

    let accepted = reports.iter().filter(|r| r.outcome.is_accepted()).count();
    let passed = accepted == reports.len();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("{}", format_plays(&reports));
        if passed {
            print_success(&format!("All {} session(s) accepted", reports.len()));
        } else {
            print_error(&format!(
                "{} of {} session(s) accepted",
                accepted,
                reports.len()
            ));
        }
    }

    Ok(passed)
}
