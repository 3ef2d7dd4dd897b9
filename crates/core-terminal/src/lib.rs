//! Terminal backend abstraction and crossterm implementation.
//!
//! The renderer never queries the terminal itself; the binary asks a
//! `TerminalBackend` once at startup and freezes the answers into
//! `TerminalCapabilities`.

use std::io::{IsTerminal, stdout};

pub mod capabilities;
pub use capabilities::TerminalCapabilities;

pub trait TerminalBackend {
    /// Column count of the attached terminal, if there is one.
    fn columns(&self) -> Option<u16>;
    fn stdout_is_terminal(&self) -> bool;
}

#[derive(Debug, Default)]
pub struct CrosstermBackend;

impl CrosstermBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TerminalBackend for CrosstermBackend {
    fn columns(&self) -> Option<u16> {
        match crossterm::terminal::size() {
            Ok((w, _h)) => Some(w),
            Err(e) => {
                tracing::debug!(target: "terminal", ?e, "terminal_size_unavailable");
                None
            }
        }
    }

    fn stdout_is_terminal(&self) -> bool {
        stdout().is_terminal()
    }
}

/// Backend with preset answers, for piped runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedBackend {
    pub columns: Option<u16>,
    pub is_terminal: bool,
}

impl TerminalBackend for FixedBackend {
    fn columns(&self) -> Option<u16> {
        self.columns
    }

    fn stdout_is_terminal(&self) -> bool {
        self.is_terminal
    }
}
