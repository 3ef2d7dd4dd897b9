//! Comparison tool invocation.
//!
//! The tool runs exactly once per invocation and its whole stdout is captured
//! before parsing begins. `diff` exits 1 when the files differ, so both 0 and
//! 1 count as success; anything else is fatal.

use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::Path;
use std::process::Command;
use tracing::info;

pub fn capture_report(program: &str, left: &Path, right: &Path) -> Result<String> {
    let output = Command::new(program)
        .arg(left)
        .arg(right)
        .output()
        .with_context(|| format!("failed to run comparison tool `{program}`"))?;
    let code = output.status.code();
    if !matches!(code, Some(0) | Some(1)) {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "comparison tool `{program}` failed ({}): {}",
            code.map_or_else(|| "terminated by signal".to_string(), |c| format!("exit status {c}")),
            stderr.trim()
        );
    }
    info!(
        target: "runtime",
        program,
        status = ?code,
        bytes = output.stdout.len(),
        "comparison_captured"
    );
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Read a pre-captured report; `-` reads standard input.
pub fn read_report(path: &Path) -> Result<String> {
    let mut raw = Vec::new();
    if path == Path::new("-") {
        std::io::stdin()
            .lock()
            .read_to_end(&mut raw)
            .context("failed to read report from stdin")?;
    } else {
        raw = std::fs::read(path)
            .with_context(|| format!("failed to read report {}", path.display()))?;
    }
    info!(target: "runtime", bytes = raw.len(), "report_loaded");
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_report_from_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "2c2\n< b\n---\n> x\n").unwrap();
        assert_eq!(read_report(tmp.path()).unwrap(), "2c2\n< b\n---\n> x\n");
    }

    #[test]
    fn read_report_missing_file_is_fatal() {
        let err = read_report(Path::new("__missing_report__.diff")).unwrap_err();
        assert!(err.to_string().contains("failed to read report"));
    }

    #[test]
    fn unknown_program_is_fatal() {
        let err = capture_report(
            "__no_such_comparison_tool__",
            Path::new("a"),
            Path::new("b"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to run comparison tool"));
    }
}
