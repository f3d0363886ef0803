//! Output formatting utilities for the CLI
//!
//! Tables for session results and colored status lines. Status lines go to
//! stdout or stderr as noted; the `judge` and `solve` commands never use
//! them because their stdout carries the protocol.

use std::io::Write;

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use tabled::{settings::Style, Table, Tabled};

use hl_core::referee::{CaseResult, RefereeReport, Verdict};
use hl_core::session::PlayReport;

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "CASE")]
    case: usize,
    #[tabled(rename = "SECRET")]
    secret: i64,
    #[tabled(rename = "ANSWER")]
    answer: i64,
    #[tabled(rename = "QUERIES")]
    queries: u32,
    #[tabled(rename = "RESULT")]
    result: &'static str,
}

fn result_label(accepted: bool) -> &'static str {
    if accepted {
        "AC"
    } else {
        "WA"
    }
}

/// Format in-memory play results as an ASCII table
pub fn format_plays(reports: &[PlayReport]) -> String {
    if reports.is_empty() {
        return "No sessions played".to_string();
    }

    let rows = reports.iter().enumerate().map(|(i, r)| SessionRow {
        case: i + 1,
        secret: r.secret,
        answer: r.answer,
        queries: r.queries,
        result: result_label(r.outcome.is_accepted()),
    });

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Format the completed cases of a refereed run as an ASCII table
pub fn format_cases(cases: &[CaseResult]) -> String {
    if cases.is_empty() {
        return "No case completed".to_string();
    }

    let rows = cases.iter().map(|c| SessionRow {
        case: c.case,
        secret: c.secret,
        answer: c.answer,
        queries: c.queries,
        result: result_label(c.outcome.is_accepted()),
    });

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print a refereed run: case table, then the verdict line
pub fn print_report(report: &RefereeReport) {
    println!("{}", format_cases(&report.cases));
    let summary = format!("{} ({} ms)", report.verdict, report.elapsed_ms);
    match report.verdict {
        Verdict::Accepted => print_success(&summary),
        _ => print_error(&summary),
    }
}

fn print_status<W: Write>(mut out: W, color: Color, symbol: &str, msg: &str) {
    let _ = crossterm::execute!(
        out,
        SetForegroundColor(color),
        Print(symbol),
        Print(" "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a success message in green to stdout
pub fn print_success(msg: &str) {
    print_status(std::io::stdout(), Color::Green, "✓", msg);
}

/// Print an error message in red to stderr
pub fn print_error(msg: &str) {
    print_status(std::io::stderr(), Color::Red, "✗", msg);
}

/// Print a warning message in yellow to stderr
pub fn print_warning(msg: &str) {
    print_status(std::io::stderr(), Color::Yellow, "⚠", msg);
}

/// Print an informational message in cyan to stdout
pub fn print_info(msg: &str) {
    print_status(std::io::stdout(), Color::Cyan, "ℹ", msg);
}
