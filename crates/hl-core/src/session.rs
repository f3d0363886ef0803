//! Session drivers
//!
//! Each driver runs one role's state machine over a [`Channel`] with strict
//! request/response alternation: the contestant never sends before it has
//! read the reply to its previous request, and the judge writes exactly one
//! reply per request.

use hl_protocol::{Reply, Request};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::channel::Channel;
use crate::config::{JudgeConfig, SolverConfig};
use crate::error::{GameError, SessionError};
use crate::judge::{Judge, JudgeState};
use crate::solver::{BinarySearch, Contestant};
use crate::traits::Strategy;
use crate::types::{Outcome, Secret};

/// Result of a judged session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeReport {
    pub outcome: Outcome,
    pub answer: i64,
    pub queries: u32,
}

/// Result of a contestant session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestantReport {
    pub answer: i64,
    pub queries: u32,
    /// Verdict read after the answer, if the judge sent one
    pub verdict: Option<Outcome>,
}

/// Result of an in-process session between the built-in judge and solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayReport {
    pub secret: i64,
    pub answer: i64,
    pub queries: u32,
    pub outcome: Outcome,
}

/// Read the secret from the first line of the stream
pub async fn read_secret<R, W>(channel: &mut Channel<R, W>) -> Result<Secret, GameError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let line = channel
        .recv_line()
        .await?
        .ok_or_else(|| GameError::Bootstrap("missing secret line".to_string()))?;
    let value = line
        .parse::<i64>()
        .map_err(|_| GameError::Bootstrap(format!("secret is not an integer: {:?}", line)))?;
    Secret::new(value)
}

/// Read the number of cases from the first line of the stream
pub async fn read_case_count<R, W>(channel: &mut Channel<R, W>) -> Result<u32, GameError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let line = channel
        .recv_line()
        .await?
        .ok_or_else(|| GameError::Bootstrap("missing case count line".to_string()))?;
    line.parse::<u32>()
        .map_err(|_| GameError::Bootstrap(format!("case count is not a number: {:?}", line)))
}

/// Arbitrate requests until the contestant submits an answer
///
/// A malformed line aborts the judge and is returned as a protocol error;
/// nothing is written for it. The `AC`/`WA` verdict is written back.
pub async fn run_judge<R, W>(
    judge: &mut Judge,
    channel: &mut Channel<R, W>,
) -> Result<JudgeReport, GameError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    judge_session(judge, channel, true).await
}

/// Arbitrate one session, writing the final verdict only if `forward_verdict`
///
/// A contestant may stop reading once it has answered, so failing to deliver
/// the verdict does not change the outcome.
pub async fn judge_session<R, W>(
    judge: &mut Judge,
    channel: &mut Channel<R, W>,
    forward_verdict: bool,
) -> Result<JudgeReport, GameError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let request = match channel.recv::<Request>().await {
            Ok(Some(request)) => request,
            Ok(None) => {
                judge.abort();
                return Err(SessionError::UnexpectedEof.into());
            }
            Err(e) => {
                tracing::warn!("rejecting request: {}", e);
                judge.abort();
                return Err(e.into());
            }
        };

        let reply = judge.handle(request)?;
        tracing::debug!(request = %request, reply = %reply, "judge exchange");
        if !reply.is_terminal() {
            channel.send(reply).await?;
        } else if forward_verdict {
            if let Err(e) = channel.send(reply).await {
                tracing::debug!("verdict not delivered: {}", e);
            }
        }

        if let JudgeState::Terminated { outcome, answer } = judge.state() {
            tracing::info!(
                secret = %judge.secret(),
                answer,
                queries = judge.queries_used(),
                "session {}",
                outcome
            );
            return Ok(JudgeReport {
                outcome,
                answer,
                queries: judge.queries_used(),
            });
        }
    }
}

/// Play one contestant session to its final answer
pub async fn run_contestant<S, R, W>(
    contestant: &mut Contestant<S>,
    channel: &mut Channel<R, W>,
    config: &SolverConfig,
) -> Result<ContestantReport, GameError>
where
    S: Strategy,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if config.probe_budget {
        channel.send(Request::MaxQueries).await?;
        match channel.recv::<Reply>().await? {
            Some(Reply::Budget(budget)) => {
                tracing::debug!(budget, "judge announced query budget");
                contestant.set_budget(budget);
            }
            Some(other) => {
                return Err(SessionError::UnexpectedReply {
                    expected: "query budget",
                    got: other,
                }
                .into())
            }
            None => return Err(SessionError::UnexpectedEof.into()),
        }
    }

    loop {
        let request = contestant.next_request();
        channel.send(request).await?;

        let Request::Answer(answer) = request else {
            let reply = channel
                .recv::<Reply>()
                .await?
                .ok_or(SessionError::UnexpectedEof)?;
            contestant.observe(reply)?;
            continue;
        };

        let verdict = if config.read_verdict {
            read_verdict(channel).await?
        } else {
            None
        };
        tracing::info!(answer, queries = contestant.queries(), "answer submitted");

        return Ok(ContestantReport {
            answer,
            queries: contestant.queries(),
            verdict,
        });
    }
}

async fn read_verdict<R, W>(channel: &mut Channel<R, W>) -> Result<Option<Outcome>, GameError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    // A judge that closes the stream after the answer gives no verdict
    match channel.recv::<Reply>().await? {
        Some(Reply::Accepted) => Ok(Some(Outcome::Accepted)),
        Some(Reply::Rejected) => Ok(Some(Outcome::Rejected)),
        Some(other) => Err(SessionError::UnexpectedReply {
            expected: "AC or WA",
            got: other,
        }
        .into()),
        None => Ok(None),
    }
}

/// Play one binary-search session per case announced on the first line
pub async fn run_contestant_cases<R, W>(
    channel: &mut Channel<R, W>,
    config: &SolverConfig,
) -> Result<Vec<ContestantReport>, GameError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let cases = read_case_count(channel).await?;
    tracing::debug!(cases, "playing cases");

    let mut reports = Vec::new();
    for case in 1..=cases {
        let mut contestant = Contestant::new(BinarySearch::default(), config.max_queries);
        let report = run_contestant(&mut contestant, channel, config).await?;
        tracing::debug!(case, answer = report.answer, "case finished");
        reports.push(report);
    }
    Ok(reports)
}

/// Run the built-in judge against the built-in solver in memory
pub async fn play(
    secret: Secret,
    judge_config: &JudgeConfig,
    solver_config: &SolverConfig,
) -> Result<PlayReport, GameError> {
    let (judge_io, contestant_io) = tokio::io::duplex(1024);

    let mut judge = Judge::new(secret, judge_config.max_queries)
        .with_budget_enforced(judge_config.enforce_budget);
    let judge_side = async move {
        let (reader, writer) = tokio::io::split(judge_io);
        let mut channel = Channel::new(reader, writer);
        run_judge(&mut judge, &mut channel).await
        // channel dropped here, so a stuck contestant sees end of stream
    };

    let mut contestant = Contestant::new(BinarySearch::default(), solver_config.max_queries);
    let contestant_side = async move {
        let (reader, writer) = tokio::io::split(contestant_io);
        let mut channel = Channel::new(reader, writer);
        run_contestant(&mut contestant, &mut channel, solver_config).await
    };

    let (judged, played) = tokio::join!(judge_side, contestant_side);
    let judged = judged?;
    played?;

    Ok(PlayReport {
        secret: secret.value(),
        answer: judged.answer,
        queries: judged.queries,
        outcome: judged.outcome,
    })
}
