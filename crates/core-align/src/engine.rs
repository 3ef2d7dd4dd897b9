//! Lockstep alignment of two line sources against a positional report.
//!
//! Every command is handled in two phases. The catch-up phase pairs the
//! unread lines that precede the command; the difference phase emits the rows
//! the command itself describes. Once the report is exhausted, `drain` pairs
//! whatever is left in both sources.
//!
//! For Delete and Append, one side of the command is an anchor: a line the
//! other file already shares, which must be consumed during catch-up instead
//! of being visited by the difference phase. The per-side stopping rule is
//! therefore table data (`Boundary`) selected by the command kind.
//!
//! Invariants:
//! * Sources are only ever read forward; every line of each file lands in
//!   exactly one emitted row.
//! * Difference-phase reads are position checked. A failed check surfaces as
//!   `AlignError::Desync` and nothing further is emitted for that command.
//! * Catch-up and drain never emit a row with both sides absent.

use crate::row::{AlignedRow, RowKind, RowSink};
use core_report::{DiffCommand, DiffKind, LineRange};
use core_source::{LineSource, SourceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("report and sources desynchronized while applying `{command}`")]
    Desync {
        command: DiffCommand,
        #[source]
        source: SourceError,
    },
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("failed to emit aligned row")]
    Sink(#[from] std::io::Error),
}

/// Where catch-up stops advancing one source for a given command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Stop with the cursor just before `range.start`.
    BeforeStart,
    /// Consume the anchor line itself (cursor ends at `range.start`).
    ThroughAnchor,
}

impl Boundary {
    /// `(left, right)` boundaries for a command kind.
    pub const fn for_kind(kind: DiffKind) -> (Self, Self) {
        match kind {
            DiffKind::Change => (Self::BeforeStart, Self::BeforeStart),
            DiffKind::Delete => (Self::BeforeStart, Self::ThroughAnchor),
            DiffKind::Append => (Self::ThroughAnchor, Self::BeforeStart),
        }
    }

    fn should_advance(self, lines_read: usize, range: LineRange) -> bool {
        match self {
            Self::BeforeStart => lines_read + 1 < range.start,
            Self::ThroughAnchor => lines_read < range.start,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignStats {
    pub commands: usize,
    pub rows: usize,
    pub synchronized: usize,
    pub changed: usize,
    pub left_only: usize,
    pub right_only: usize,
    pub lines_left: usize,
    pub lines_right: usize,
}

impl AlignStats {
    fn record(&mut self, row: &AlignedRow) {
        self.rows += 1;
        match row.kind() {
            RowKind::Synchronized => self.synchronized += 1,
            RowKind::Changed => self.changed += 1,
            RowKind::LeftOnly => self.left_only += 1,
            RowKind::RightOnly => self.right_only += 1,
            RowKind::Empty => {}
        }
    }
}

pub struct AlignmentEngine<'s> {
    left: &'s mut LineSource,
    right: &'s mut LineSource,
    stats: AlignStats,
}

impl<'s> AlignmentEngine<'s> {
    pub fn new(left: &'s mut LineSource, right: &'s mut LineSource) -> Self {
        Self {
            left,
            right,
            stats: AlignStats::default(),
        }
    }

    pub fn stats(&self) -> AlignStats {
        AlignStats {
            lines_left: self.left.lines_read(),
            lines_right: self.right.lines_read(),
            ..self.stats
        }
    }

    /// Apply every command in order, then drain both tails.
    pub fn run<S>(mut self, commands: &[DiffCommand], sink: &mut S) -> Result<AlignStats, AlignError>
    where
        S: RowSink + ?Sized,
    {
        for command in commands {
            self.apply(command, sink)?;
        }
        self.drain(sink)
    }

    /// Emit the catch-up rows and difference rows for one command.
    pub fn apply<S>(&mut self, command: &DiffCommand, sink: &mut S) -> Result<(), AlignError>
    where
        S: RowSink + ?Sized,
    {
        tracing::debug!(
            target: "align",
            command = %command,
            left_cursor = self.left.lines_read(),
            right_cursor = self.right.lines_read(),
            "apply_command"
        );
        self.stats.commands += 1;
        match self.apply_phases(command, sink) {
            Err(AlignError::Source(source)) if source.is_position_defect() => {
                tracing::error!(target: "align", command = %command, error = %source, "alignment_desync");
                Err(AlignError::Desync {
                    command: *command,
                    source,
                })
            }
            other => other,
        }
    }

    /// Pair the remaining lines of both sources until both are exhausted.
    pub fn drain<S>(&mut self, sink: &mut S) -> Result<AlignStats, AlignError>
    where
        S: RowSink + ?Sized,
    {
        loop {
            let left = self.left.read()?;
            let right = self.right.read()?;
            if left.is_none() && right.is_none() {
                break;
            }
            self.emit(sink, AlignedRow::new(left, right, false))?;
        }
        let stats = self.stats();
        tracing::debug!(
            target: "align",
            rows = stats.rows,
            changed = stats.changed,
            left_only = stats.left_only,
            right_only = stats.right_only,
            lines_left = stats.lines_left,
            lines_right = stats.lines_right,
            "alignment_complete"
        );
        Ok(stats)
    }

    fn apply_phases<S>(&mut self, command: &DiffCommand, sink: &mut S) -> Result<(), AlignError>
    where
        S: RowSink + ?Sized,
    {
        self.catch_up(command, sink)?;
        match command.kind {
            DiffKind::Change => self.change(command.range_a, command.range_b, sink),
            DiffKind::Delete => {
                for pos in command.range_a.lines() {
                    let line = self.left.read_at(pos)?;
                    self.emit(sink, AlignedRow::new(Some(line), None, false))?;
                }
                Ok(())
            }
            DiffKind::Append => {
                for pos in command.range_b.lines() {
                    let line = self.right.read_at(pos)?;
                    self.emit(sink, AlignedRow::new(None, Some(line), false))?;
                }
                Ok(())
            }
        }
    }

    fn catch_up<S>(&mut self, command: &DiffCommand, sink: &mut S) -> Result<(), AlignError>
    where
        S: RowSink + ?Sized,
    {
        let (left_bound, right_bound) = Boundary::for_kind(command.kind);
        loop {
            let left = if left_bound.should_advance(self.left.lines_read(), command.range_a) {
                self.left.read()?
            } else {
                None
            };
            let right = if right_bound.should_advance(self.right.lines_read(), command.range_b) {
                self.right.read()?
            } else {
                None
            };
            if left.is_none() && right.is_none() {
                return Ok(());
            }
            self.emit(sink, AlignedRow::new(left, right, false))?;
        }
    }

    /// Pair replaced lines positionally; the shorter range is padded with
    /// absent sides so the block stays ragged rather than realigned.
    fn change<S>(&mut self, range_a: LineRange, range_b: LineRange, sink: &mut S) -> Result<(), AlignError>
    where
        S: RowSink + ?Sized,
    {
        let (len_a, len_b) = (range_a.len(), range_b.len());
        for i in 0..len_a.max(len_b) {
            let left = if i < len_a {
                Some(self.left.read_at(range_a.start + i)?)
            } else {
                None
            };
            let right = if i < len_b {
                Some(self.right.read_at(range_b.start + i)?)
            } else {
                None
            };
            self.emit(sink, AlignedRow::changed(left, right))?;
        }
        Ok(())
    }

    fn emit<S>(&mut self, sink: &mut S, row: AlignedRow) -> Result<(), AlignError>
    where
        S: RowSink + ?Sized,
    {
        self.stats.record(&row);
        sink.push_row(row)?;
        Ok(())
    }
}
