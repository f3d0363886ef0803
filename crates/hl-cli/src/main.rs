//! hilo CLI
//!
//! Single binary for every role of the guessing game:
//! - Judge (holds the secret, answers on stdin/stdout)
//! - Solver (binary-search contestant on stdin/stdout)
//! - Play (both roles in memory)
//! - Referee (judges an external contestant program)

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hilo::commands;
use hilo::output::print_error;
use hl_core::GameError;

#[derive(Parser)]
#[command(name = "hilo")]
#[command(author, version, about = "Interactive number guessing game")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Judge one session on stdin/stdout (the judge holds the secret)
    Judge {
        /// Secret value; read from the first input line when omitted
        #[arg(short, long)]
        secret: Option<i64>,
        /// Keep answering queries beyond the budget
        #[arg(long)]
        no_enforce: bool,
    },

    /// Solve sessions on stdin/stdout with binary search (contestant role)
    Solve {
        /// Read the number of sessions from the first input line
        #[arg(long)]
        cases: bool,
        /// Ask the judge for its query budget first
        #[arg(long)]
        probe: bool,
        /// Do not wait for the AC/WA line after answering
        #[arg(long)]
        no_verdict: bool,
    },

    /// Play the built-in solver against the built-in judge in memory
    Play {
        /// Secret to play (repeatable)
        #[arg(short, long = "secret")]
        secrets: Vec<i64>,
        /// Number of random secrets to add
        #[arg(short, long)]
        random: Option<usize>,
        /// Seed for random secrets
        #[arg(long)]
        seed: Option<u64>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Judge an external contestant program
    Referee {
        /// Secret for one case (repeatable)
        #[arg(short, long = "secret")]
        secrets: Vec<i64>,
        /// Test input file: case count, then one secret per line
        #[arg(short, long)]
        tests: Option<PathBuf>,
        /// Number of random secrets to add
        #[arg(short, long)]
        random: Option<usize>,
        /// Seed for random secrets
        #[arg(long)]
        seed: Option<u64>,
        /// Time limit in milliseconds (overrides config)
        #[arg(long)]
        time_limit: Option<u64>,
        /// Do not send the case count line to the program
        #[arg(long)]
        no_case_count: bool,
        /// Write AC/WA back to the program after each answer
        #[arg(long)]
        forward_verdict: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Contestant program and its arguments
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Get specific config value
    Get { key: String },
    /// Set config value
    Set { key: String, value: String },
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr: stdout carries the protocol for judge and solve
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Exit status for a failed command, using the session error when there is one
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<GameError>()
        .map(GameError::exit_code)
        .unwrap_or(1)
}

fn passed(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.as_ref();

    match cli.command {
        Commands::Judge { secret, no_enforce } => {
            let mut settings = commands::load_settings(config_path)?;
            if no_enforce {
                settings.judge.enforce_budget = false;
            }
            commands::judge_command(&settings.judge, secret).await?;
        }

        Commands::Solve {
            cases,
            probe,
            no_verdict,
        } => {
            let mut settings = commands::load_settings(config_path)?;
            if probe {
                settings.solver.probe_budget = true;
            }
            if no_verdict {
                settings.solver.read_verdict = false;
            }
            commands::solve_command(&settings.solver, cases).await?;
        }

        Commands::Play {
            secrets,
            random,
            seed,
            json,
        } => {
            let settings = commands::load_settings(config_path)?;
            let secrets = commands::select_secrets(&secrets, None, random, seed)?;
            let ok = commands::play_command(&settings, &secrets, json).await?;
            return Ok(passed(ok));
        }

        Commands::Referee {
            secrets,
            tests,
            random,
            seed,
            time_limit,
            no_case_count,
            forward_verdict,
            json,
            command,
        } => {
            let mut settings = commands::load_settings(config_path)?;
            if let Some(ms) = time_limit {
                settings.referee.time_limit = std::time::Duration::from_millis(ms);
            }
            if no_case_count {
                settings.referee.send_case_count = false;
            }
            if forward_verdict {
                settings.referee.forward_verdict = true;
            }
            settings.validate()?;

            let secrets = commands::select_secrets(&secrets, tests.as_deref(), random, seed)?;
            let ok = commands::referee_command(&settings, &secrets, &command, json).await?;
            return Ok(passed(ok));
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_show(config_path)?,
            ConfigAction::Get { key } => commands::config_get(config_path, &key)?,
            ConfigAction::Set { key, value } => commands::config_set(config_path, &key, &value)?,
            ConfigAction::Init { force } => commands::config_init(config_path, force)?,
            ConfigAction::Path => {
                let path = config_path
                    .cloned()
                    .unwrap_or_else(hl_core::config::default_config_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
