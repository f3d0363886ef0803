//! Referee for external contestant programs
//!
//! The referee spawns a contestant program, plays the judge for one or more
//! cases over the program's stdin/stdout, and turns the interaction into a
//! single [`Verdict`]. Each case gets a fresh [`Judge`] with the query budget
//! enforced, and the whole interaction runs under one wall-clock limit.

use std::ffi::OsString;
use std::fmt;
use std::process::Stdio;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::process::Command;

use crate::channel::Channel;
use crate::config::RefereeConfig;
use crate::error::{GameError, SessionError};
use crate::judge::Judge;
use crate::session::judge_session;
use crate::types::{Outcome, Secret};

/// Final judgement of a refereed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// Every case answered correctly
    Accepted,
    /// A case ended with a wrong answer
    WrongAnswer { case: usize },
    /// A case used more queries than allowed
    QueryLimitExceeded { case: usize, limit: u32 },
    /// The program wrote a line that is not a request
    ProtocolViolation { case: usize, detail: String },
    /// The interaction did not finish in time
    TimeLimitExceeded,
    /// The program crashed, exited early or could not be talked to
    RuntimeError { message: String },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    fn runtime(message: impl Into<String>) -> Self {
        Verdict::RuntimeError {
            message: message.into(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "Accepted"),
            Verdict::WrongAnswer { case } => write!(f, "Wrong Answer on test {}", case),
            Verdict::QueryLimitExceeded { case, limit } => write!(
                f,
                "Query Limit Exceeded on test {} (limit is {} per test)",
                case, limit
            ),
            Verdict::ProtocolViolation { case, detail } => {
                write!(f, "Protocol Violation on test {}: {}", case, detail)
            }
            Verdict::TimeLimitExceeded => write!(f, "Time Limit Exceeded"),
            Verdict::RuntimeError { message } => write!(f, "Runtime Error: {}", message),
        }
    }
}

/// Outcome of one completed case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    pub case: usize,
    pub secret: i64,
    pub answer: i64,
    pub queries: u32,
    pub outcome: Outcome,
}

/// Everything the referee learned about a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefereeReport {
    pub verdict: Verdict,
    pub cases: Vec<CaseResult>,
    pub elapsed_ms: u64,
}

/// Parse referee test input: a case count, then one secret per line
pub fn parse_test_input(content: &str) -> Result<Vec<Secret>, GameError> {
    let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());

    let header = lines
        .next()
        .ok_or_else(|| GameError::InvalidTests("empty test input".to_string()))?;
    let count = header
        .parse::<usize>()
        .map_err(|_| GameError::InvalidTests(format!("bad case count: {:?}", header)))?;

    let secrets = lines
        .map(|line| {
            line.parse::<i64>()
                .map_err(|_| GameError::InvalidTests(format!("bad secret: {:?}", line)))
                .and_then(Secret::new)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if secrets.len() != count {
        return Err(GameError::InvalidTests(format!(
            "expected {} secrets, found {}",
            count,
            secrets.len()
        )));
    }
    Ok(secrets)
}

/// Runs a contestant program against the built-in judge
#[derive(Debug, Clone)]
pub struct Referee {
    program: OsString,
    args: Vec<OsString>,
    budget: u32,
    config: RefereeConfig,
}

impl Referee {
    /// Create a referee for `program` with the given per-case query budget
    pub fn new(program: impl Into<OsString>, budget: u32, config: RefereeConfig) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            budget,
            config,
        }
    }

    /// Arguments passed to the program
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Run all cases and report the verdict
    ///
    /// Only failures to start the program are returned as errors; anything
    /// the program does afterwards ends up in the verdict.
    pub async fn run(&self, secrets: &[Secret]) -> Result<RefereeReport, GameError> {
        let start = Instant::now();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        tracing::info!(
            program = ?self.program,
            pid = child.id(),
            cases = secrets.len(),
            "contestant started"
        );

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let (Some(stdin), Some(stdout)) = (stdin, stdout) else {
            return Err(GameError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "contestant pipes unavailable",
            )));
        };

        // Drain stderr concurrently so a chatty program cannot block on a full pipe
        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                if let Err(e) = stderr.read_to_end(&mut buf).await {
                    tracing::debug!("stderr read stopped: {}", e);
                }
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        let mut cases = Vec::new();
        let mut channel = Channel::new(stdout, stdin);
        let interaction = tokio::time::timeout(
            self.config.time_limit,
            self.interact(&mut channel, secrets, &mut cases),
        )
        .await;
        // Closing stdin lets a well-behaved program exit
        drop(channel);

        let mut verdict = match interaction {
            Ok(verdict) => verdict,
            Err(_) => {
                tracing::warn!(limit = ?self.config.time_limit, "time limit exceeded");
                Verdict::TimeLimitExceeded
            }
        };

        let finished = matches!(verdict, Verdict::Accepted | Verdict::WrongAnswer { .. });
        if finished {
            let remaining = self.config.time_limit.saturating_sub(start.elapsed());
            match tokio::time::timeout(remaining, child.wait()).await {
                Ok(Ok(status)) if !status.success() => {
                    let stderr = match stderr_task {
                        Some(task) => task.await.unwrap_or_default(),
                        None => String::new(),
                    };
                    let stderr: String = stderr.chars().take(self.config.stderr_limit).collect();
                    tracing::warn!(%status, "contestant exited with failure");
                    verdict = Verdict::runtime(if stderr.is_empty() {
                        format!("program exited with {}", status)
                    } else {
                        stderr
                    });
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => verdict = Verdict::runtime(format!("failed to wait for program: {}", e)),
                Err(_) => {
                    let _ = child.kill().await;
                    verdict = Verdict::TimeLimitExceeded;
                }
            }
        } else {
            let _ = child.kill().await;
        }

        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(verdict = %verdict, elapsed_ms, "referee finished");

        Ok(RefereeReport {
            verdict,
            cases,
            elapsed_ms,
        })
    }

    async fn interact<R, W>(
        &self,
        channel: &mut Channel<R, W>,
        secrets: &[Secret],
        cases: &mut Vec<CaseResult>,
    ) -> Verdict
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if self.config.send_case_count {
            if let Err(e) = channel.send(secrets.len()).await {
                return Verdict::runtime(format!("failed to send case count: {}", e));
            }
        }

        for (index, secret) in secrets.iter().enumerate() {
            let case = index + 1;
            let mut judge = Judge::new(*secret, self.budget);

            let judged = judge_session(&mut judge, channel, self.config.forward_verdict).await;
            let report = match judged {
                Ok(report) => report,
                Err(GameError::Session(SessionError::QueryLimitExceeded { limit })) => {
                    return Verdict::QueryLimitExceeded { case, limit };
                }
                Err(GameError::Session(SessionError::UnexpectedEof)) => {
                    return Verdict::runtime("program exited without submitting answer");
                }
                Err(GameError::Protocol(e)) if e.is_malformed() => {
                    return Verdict::ProtocolViolation {
                        case,
                        detail: e.to_string(),
                    };
                }
                Err(e) => return Verdict::runtime(format!("interaction failed: {}", e)),
            };

            cases.push(CaseResult {
                case,
                secret: secret.value(),
                answer: report.answer,
                queries: report.queries,
                outcome: report.outcome,
            });
            if report.outcome == Outcome::Rejected {
                return Verdict::WrongAnswer { case };
            }
        }

        Verdict::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_protocol::QUERY_BUDGET;

    #[test]
    fn test_parse_test_input() {
        let secrets = parse_test_input("3\n42\n1\n1000\n").unwrap();
        let values: Vec<i64> = secrets.iter().map(Secret::value).collect();
        assert_eq!(values, vec![42, 1, 1000]);
    }

    #[test]
    fn test_parse_test_input_errors() {
        assert!(matches!(parse_test_input(""), Err(GameError::InvalidTests(_))));
        assert!(matches!(
            parse_test_input("two\n1\n2\n"),
            Err(GameError::InvalidTests(_))
        ));
        assert!(matches!(
            parse_test_input("2\n1\n"),
            Err(GameError::InvalidTests(_))
        ));
        assert!(matches!(
            parse_test_input("1\n5000\n"),
            Err(GameError::InvalidSecret { value: 5000, .. })
        ));
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Accepted.to_string(), "Accepted");
        assert_eq!(
            Verdict::WrongAnswer { case: 2 }.to_string(),
            "Wrong Answer on test 2"
        );
        assert_eq!(Verdict::TimeLimitExceeded.to_string(), "Time Limit Exceeded");
    }

    #[test]
    fn test_verdict_serialization() {
        let json = serde_json::to_string(&Verdict::QueryLimitExceeded { case: 1, limit: 10 }).unwrap();
        assert_eq!(json, r#"{"kind":"query_limit_exceeded","case":1,"limit":10}"#);
    }

    fn referee(send_case_count: bool) -> Referee {
        let config = RefereeConfig {
            send_case_count,
            ..RefereeConfig::default()
        };
        Referee::new("unused", QUERY_BUDGET, config)
    }

    fn forwarding_referee() -> Referee {
        let config = RefereeConfig {
            forward_verdict: true,
            ..RefereeConfig::default()
        };
        Referee::new("unused", QUERY_BUDGET, config)
    }

    fn secrets(values: &[i64]) -> Vec<Secret> {
        values.iter().map(|v| Secret::new(*v).unwrap()).collect()
    }

    #[tokio::test]
    async fn test_interact_accepts_all_cases() {
        let mut output = Vec::new();
        let mut cases = Vec::new();
        let verdict = {
            let input: &[u8] = b"? 500\n! 500\n? 500\n? 250\n! 250\n";
            let mut channel = Channel::new(input, &mut output);
            referee(true)
                .interact(&mut channel, &secrets(&[500, 250]), &mut cases)
                .await
        };

        assert_eq!(verdict, Verdict::Accepted);
        assert_eq!(String::from_utf8(output).unwrap(), "2\n=\n<\n=\n");
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[1].queries, 2);
    }

    #[tokio::test]
    async fn test_interact_forwards_verdict_when_configured() {
        let mut output = Vec::new();
        let mut cases = Vec::new();
        let verdict = {
            let input: &[u8] = b"? 500\n! 500\n! 3\n";
            let mut channel = Channel::new(input, &mut output);
            forwarding_referee()
                .interact(&mut channel, &secrets(&[500, 3]), &mut cases)
                .await
        };

        assert_eq!(verdict, Verdict::Accepted);
        assert_eq!(String::from_utf8(output).unwrap(), "2\n=\nAC\nAC\n");
    }

    #[tokio::test]
    async fn test_interact_program_stops_reading_after_answer() {
        let (writer, peer) = tokio::io::duplex(64);
        drop(peer);

        let mut cases = Vec::new();
        let config = RefereeConfig {
            send_case_count: false,
            forward_verdict: true,
            ..RefereeConfig::default()
        };
        let mut channel = Channel::new(&b"! 500\n"[..], writer);
        let verdict = Referee::new("unused", QUERY_BUDGET, config)
            .interact(&mut channel, &secrets(&[500]), &mut cases)
            .await;

        assert_eq!(verdict, Verdict::Accepted);
        assert_eq!(cases[0].outcome, Outcome::Accepted);
    }

    #[tokio::test]
    async fn test_interact_wrong_answer_stops() {
        let mut cases = Vec::new();
        let input: &[u8] = b"! 7\n! 8\n";
        let mut channel = Channel::new(input, tokio::io::sink());
        let verdict = referee(false)
            .interact(&mut channel, &secrets(&[7, 9]), &mut cases)
            .await;

        assert_eq!(verdict, Verdict::WrongAnswer { case: 2 });
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[1].outcome, Outcome::Rejected);
    }

    #[tokio::test]
    async fn test_interact_protocol_violation() {
        let mut cases = Vec::new();
        let input: &[u8] = b"hello\n";
        let mut channel = Channel::new(input, tokio::io::sink());
        let verdict = referee(false)
            .interact(&mut channel, &secrets(&[7]), &mut cases)
            .await;

        assert!(matches!(verdict, Verdict::ProtocolViolation { case: 1, .. }));
    }

    #[tokio::test]
    async fn test_interact_query_limit() {
        let mut cases = Vec::new();
        let input = "? 1\n".repeat(11);
        let mut channel = Channel::new(input.as_bytes(), tokio::io::sink());
        let verdict = referee(false)
            .interact(&mut channel, &secrets(&[7]), &mut cases)
            .await;

        assert_eq!(verdict, Verdict::QueryLimitExceeded { case: 1, limit: 10 });
    }

    #[tokio::test]
    async fn test_interact_program_exits_early() {
        let mut cases = Vec::new();
        let input: &[u8] = b"? 500\n";
        let mut channel = Channel::new(input, tokio::io::sink());
        let verdict = referee(false)
            .interact(&mut channel, &secrets(&[7]), &mut cases)
            .await;

        assert!(matches!(verdict, Verdict::RuntimeError { .. }));
        assert!(cases.is_empty());
    }

    #[cfg(unix)]
    fn shell(script: &str) -> Referee {
        Referee::new("sh", QUERY_BUDGET, RefereeConfig::default()).args(["-c", script])
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_program_that_never_reads_verdicts() {
        let script = "read n; echo '? 500'; read r; echo '! 500'; echo '! 250'";
        let report = shell(script).run(&secrets(&[500, 250])).await.unwrap();

        assert_eq!(report.verdict, Verdict::Accepted);
        assert_eq!(report.cases.len(), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_program_closing_stdin_after_answer() {
        let config = RefereeConfig {
            forward_verdict: true,
            ..RefereeConfig::default()
        };
        let script = "read n; echo '? 500'; read r; exec 0<&-; echo '! 500'";
        let report = Referee::new("sh", QUERY_BUDGET, config)
            .args(["-c", script])
            .run(&secrets(&[500]))
            .await
            .unwrap();
        assert_eq!(report.verdict, Verdict::Accepted);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_keeps_non_utf8_stderr() {
        let script = "read n; echo '! 500'; printf '\\377boom' >&2; exit 4";
        let report = shell(script).run(&secrets(&[500])).await.unwrap();

        match report.verdict {
            Verdict::RuntimeError { message } => assert!(message.contains("boom"), "{}", message),
            other => panic!("expected runtime error, got {:?}", other),
        }
    }
}
