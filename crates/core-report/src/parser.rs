//! Report line classification.
//!
//! Converts the captured output of the comparison tool into `ReportEntry`
//! values, one per non-blank line, in report order. Commands are matched by a
//! single anchored pattern; content previews (`<`, `>`, the `---` separator)
//! and tool annotations (`\ No newline at end of file`) are recognized and
//! carry no alignment information. Anything else becomes a diagnostic that the
//! caller prints and skips; parsing never stops early.
//!
//! The parser is pure apart from logging: no output is written here.

use crate::command::{DiffCommand, DiffKind, LineRange, ReportError};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:[,-](\d+))?([cda])(\d+)(?:[,-](\d+))?\s*$")
        .expect("static command pattern compiles")
});

/// Classification of a single report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    Command(DiffCommand),
    Preview,
    Blank,
    Invalid(ReportError),
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticReason {
    Unrecognized,
    Invalid(ReportError),
}

/// A report line that could not be used, with its 1-based report line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub line_no: usize,
    pub text: String,
    pub reason: DiagnosticReason,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            DiagnosticReason::Unrecognized => {
                write!(f, "unexpected line reading diff: {}", self.text)
            }
            DiagnosticReason::Invalid(err) => {
                write!(f, "invalid command reading diff: {} ({err})", self.text)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    Command(DiffCommand),
    Preview,
    Diagnostic(ParseDiagnostic),
}

/// Classify one line of a report.
pub fn classify_line(line: &str) -> LineClass {
    if line.trim().is_empty() {
        return LineClass::Blank;
    }
    if let Some(caps) = COMMAND_RE.captures(line) {
        let number = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<usize>().ok());
        let letter = caps.get(3).and_then(|m| m.as_str().chars().next());
        if let (Some(start_a), Some(kind), Some(start_b)) =
            (number(1), letter.and_then(DiffKind::from_letter), number(4))
        {
            // A lone number normalizes to the single-line range (n, n).
            let range_a = LineRange::new(start_a, number(2).unwrap_or(start_a));
            let range_b = LineRange::new(start_b, number(5).unwrap_or(start_b));
            return match DiffCommand::new(kind, range_a, range_b) {
                Ok(cmd) => LineClass::Command(cmd),
                Err(err) => LineClass::Invalid(err),
            };
        }
        // Digits too large for usize fall through to unrecognized.
        return LineClass::Unrecognized;
    }
    if line.starts_with(['<', '>', '-', '\\']) {
        return LineClass::Preview;
    }
    LineClass::Unrecognized
}

/// Streaming parser over a captured report.
pub struct ReportParser<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> ReportParser<'a> {
    pub fn new(report: &'a str) -> Self {
        Self {
            lines: report.lines().enumerate(),
        }
    }
}

impl Iterator for ReportParser<'_> {
    type Item = ReportEntry;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            let line_no = idx + 1;
            let reason = match classify_line(line) {
                LineClass::Blank => continue,
                LineClass::Preview => return Some(ReportEntry::Preview),
                LineClass::Command(cmd) => {
                    tracing::trace!(target: "report", line_no, command = %cmd, "command_parsed");
                    return Some(ReportEntry::Command(cmd));
                }
                LineClass::Invalid(err) => {
                    tracing::warn!(target: "report", line_no, error = %err, "invalid_report_command");
                    DiagnosticReason::Invalid(err)
                }
                LineClass::Unrecognized => {
                    tracing::warn!(target: "report", line_no, text = line, "unexpected_report_line");
                    DiagnosticReason::Unrecognized
                }
            };
            return Some(ReportEntry::Diagnostic(ParseDiagnostic {
                line_no,
                text: line.to_string(),
                reason,
            }));
        }
        None
    }
}

/// Fully collected report: commands in report order plus every diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReport {
    pub commands: Vec<DiffCommand>,
    pub diagnostics: Vec<ParseDiagnostic>,
    pub preview_lines: usize,
}

pub fn parse_report(report: &str) -> ParsedReport {
    let mut parsed = ParsedReport::default();
    for entry in ReportParser::new(report) {
        match entry {
            ReportEntry::Command(cmd) => parsed.commands.push(cmd),
            ReportEntry::Preview => parsed.preview_lines += 1,
            ReportEntry::Diagnostic(diag) => parsed.diagnostics.push(diag),
        }
    }
    tracing::debug!(
        target: "report",
        commands = parsed.commands.len(),
        previews = parsed.preview_lines,
        diagnostics = parsed.diagnostics.len(),
        "report_parsed"
    );
    parsed
}
