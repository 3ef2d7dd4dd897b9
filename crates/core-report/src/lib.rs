//! Positional ("ed-script") diff report model and parser.
//!
//! `command` holds the typed command model; `parser` turns captured report
//! text into commands, preview markers, and diagnostics.

pub mod command;
pub mod parser;

pub use command::{DiffCommand, DiffKind, LineRange, ReportError};
pub use parser::{
    DiagnosticReason, LineClass, ParseDiagnostic, ParsedReport, ReportEntry, ReportParser,
    classify_line, parse_report,
};
