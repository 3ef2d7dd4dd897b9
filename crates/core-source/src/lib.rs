//! Forward-only line cursors over the two compared files.
//!
//! A `LineSource` hands out lines strictly in order, numbered from 1. The
//! alignment engine uses `read_at` to cross-check its own bookkeeping against
//! the ranges named by the report; a failed check means the report and the
//! cursors have desynchronized and the run must stop.
//!
//! Invariants:
//! * `lines_read` never decreases and never exceeds the number of lines.
//! * Exhaustion is `Ok(None)`, never an error, and does not move the cursor.
//! * Returned lines carry no line terminator (`\n`, `\r\n`, or a trailing `\r`)
//!   and no tab characters.
//! * Content is decoded lossily; a stray non-UTF-8 byte never aborts a run.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::Path;
use thiserror::Error;

/// Spaces substituted for each horizontal tab unless overridden.
pub const DEFAULT_TAB_WIDTH: usize = 4;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{source_name}: expected to read line {expected} but the next line is {actual}")]
    PositionMismatch {
        source_name: String,
        expected: usize,
        actual: usize,
    },
    #[error("{source_name}: line {expected} does not exist (only {len} lines)")]
    PastEnd {
        source_name: String,
        expected: usize,
        len: usize,
    },
    #[error("{source_name}: read failed")]
    Io {
        source_name: String,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    /// True for failed position checks, as opposed to I/O failures.
    pub fn is_position_defect(&self) -> bool {
        matches!(self, Self::PositionMismatch { .. } | Self::PastEnd { .. })
    }
}

pub struct LineSource {
    name: String,
    reader: Box<dyn BufRead>,
    tab: String,
    lines_read: usize,
    exhausted: bool,
    buf: Vec<u8>,
}

impl std::fmt::Debug for LineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSource")
            .field("name", &self.name)
            .field("tab_width", &self.tab.len())
            .field("lines_read", &self.lines_read)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

impl LineSource {
    pub fn new(name: impl Into<String>, reader: Box<dyn BufRead>) -> Self {
        Self {
            name: name.into(),
            reader,
            tab: " ".repeat(DEFAULT_TAB_WIDTH),
            lines_read: 0,
            exhausted: false,
            buf: Vec::new(),
        }
    }

    /// Open `path` for a single forward pass. The handle is released when the
    /// source is dropped.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let name = path.display().to_string();
        match File::open(path) {
            Ok(file) => {
                tracing::debug!(target: "source", source = %name, "source_opened");
                Ok(Self::new(name, Box::new(BufReader::new(file))))
            }
            Err(source) => Err(SourceError::Io {
                source_name: name,
                source,
            }),
        }
    }

    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, Box::new(Cursor::new(text.as_bytes().to_vec())))
    }

    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab = " ".repeat(width);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Count of lines handed out so far (the cursor).
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// 1-based position the next successful read will occupy.
    pub fn next_position(&self) -> usize {
        self.lines_read + 1
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn read(&mut self) -> Result<Option<String>, SourceError> {
        if self.exhausted {
            return Ok(None);
        }
        self.buf.clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(|source| SourceError::Io {
                source_name: self.name.clone(),
                source,
            })?;
        if n == 0 {
            self.exhausted = true;
            tracing::trace!(target: "source", source = %self.name, lines = self.lines_read, "source_exhausted");
            return Ok(None);
        }
        self.lines_read += 1;
        Ok(Some(self.decode_current()))
    }

    /// Read the line at 1-based position `expected`, failing when the cursor
    /// is not exactly one line before it or the line does not exist.
    pub fn read_at(&mut self, expected: usize) -> Result<String, SourceError> {
        let actual = self.next_position();
        if actual != expected {
            return Err(SourceError::PositionMismatch {
                source_name: self.name.clone(),
                expected,
                actual,
            });
        }
        match self.read()? {
            Some(line) => Ok(line),
            None => Err(SourceError::PastEnd {
                source_name: self.name.clone(),
                expected,
                len: self.lines_read,
            }),
        }
    }

    fn decode_current(&self) -> String {
        let mut bytes = self.buf.as_slice();
        if let Some(rest) = bytes.strip_suffix(b"\n") {
            bytes = rest;
        }
        // Also covers a final line that ends in a bare `\r`.
        if let Some(rest) = bytes.strip_suffix(b"\r") {
            bytes = rest;
        }
        expand_tabs(&String::from_utf8_lossy(bytes), &self.tab).into_owned()
    }
}

/// Replace every tab with `replacement`; borrows when there is nothing to do.
pub fn expand_tabs<'a>(line: &'a str, replacement: &str) -> Cow<'a, str> {
    if line.contains('\t') {
        Cow::Owned(line.replace('\t', replacement))
    } else {
        Cow::Borrowed(line)
    }
}
