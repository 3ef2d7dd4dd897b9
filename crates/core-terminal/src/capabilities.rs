//! Terminal capability probing.
//!
//! Detection runs once at startup. The struct is non-exhaustive so further
//! capabilities can be added without breaking downstream code.

use crate::TerminalBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    pub columns: Option<u16>,
    pub stdout_is_terminal: bool,
    /// `NO_COLOR` is set to a non-empty value.
    pub no_color_env: bool,
}

impl TerminalCapabilities {
    pub fn detect(backend: &dyn TerminalBackend) -> Self {
        let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::from_parts(backend, no_color_env)
    }

    pub fn from_parts(backend: &dyn TerminalBackend, no_color_env: bool) -> Self {
        let caps = Self {
            columns: backend.columns(),
            stdout_is_terminal: backend.stdout_is_terminal(),
            no_color_env,
        };
        tracing::debug!(
            target: "terminal",
            columns = ?caps.columns,
            stdout_is_terminal = caps.stdout_is_terminal,
            no_color_env = caps.no_color_env,
            "capabilities_detected"
        );
        caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedBackend;

    #[test]
    fn from_parts_copies_backend_answers() {
        let backend = FixedBackend {
            columns: Some(132),
            is_terminal: true,
        };
        let caps = TerminalCapabilities::from_parts(&backend, false);
        assert_eq!(caps.columns, Some(132));
        assert!(caps.stdout_is_terminal);
        assert!(!caps.no_color_env);
    }

    #[test]
    fn piped_backend_reports_no_columns() {
        let caps = TerminalCapabilities::from_parts(&FixedBackend::default(), true);
        assert_eq!(caps.columns, None);
        assert!(!caps.stdout_is_terminal);
        assert!(caps.no_color_env);
    }
}
