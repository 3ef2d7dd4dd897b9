//! Typed positional diff commands.
//!
//! A command names a range of lines in each file plus the operation letter.
//! Construction goes through `DiffCommand::new`, which rejects shapes the
//! alignment engine cannot walk (backwards ranges, ranged anchors, line 0
//! where a real line is required), so the engine only ever sees well-formed
//! commands.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffKind {
    Change,
    Delete,
    Append,
}

impl DiffKind {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'c' => Some(Self::Change),
            'd' => Some(Self::Delete),
            'a' => Some(Self::Append),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Change => 'c',
            Self::Delete => 'd',
            Self::Append => 'a',
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Change => "change",
            Self::Delete => "delete",
            Self::Append => "append",
        };
        f.write_str(name)
    }
}

/// Inclusive 1-based line range. A single number `n` is the range `(n, n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Number of lines covered; only meaningful for non-inverted ranges.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn lines(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{},{}", self.start, self.end)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("range {range} runs backwards")]
    InvertedRange { range: LineRange },
    #[error("{kind} anchor must be a single line, got {range}")]
    AnchorNotSingle { kind: DiffKind, range: LineRange },
    #[error("{kind} range {range} starts at line 0")]
    ZeroLine { kind: DiffKind, range: LineRange },
}

/// One positional command: `range_a kind range_b`, e.g. `3,5d2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiffCommand {
    pub range_a: LineRange,
    pub range_b: LineRange,
    pub kind: DiffKind,
}

impl DiffCommand {
    pub fn new(kind: DiffKind, range_a: LineRange, range_b: LineRange) -> Result<Self, ReportError> {
        for range in [range_a, range_b] {
            if range.start > range.end {
                return Err(ReportError::InvertedRange { range });
            }
        }
        // The side whose lines are visited during the difference phase must
        // name real lines; an anchor may be 0 (before the first line).
        let (visited, anchor) = match kind {
            DiffKind::Change => {
                if range_b.start == 0 {
                    return Err(ReportError::ZeroLine { kind, range: range_b });
                }
                (range_a, None)
            }
            DiffKind::Delete => (range_a, Some(range_b)),
            DiffKind::Append => (range_b, Some(range_a)),
        };
        if visited.start == 0 {
            return Err(ReportError::ZeroLine {
                kind,
                range: visited,
            });
        }
        if let Some(range) = anchor
            && !range.is_single()
        {
            return Err(ReportError::AnchorNotSingle { kind, range });
        }
        Ok(Self {
            range_a,
            range_b,
            kind,
        })
    }

    pub fn change(range_a: LineRange, range_b: LineRange) -> Result<Self, ReportError> {
        Self::new(DiffKind::Change, range_a, range_b)
    }

    pub fn delete(range_a: LineRange, anchor_b: usize) -> Result<Self, ReportError> {
        Self::new(DiffKind::Delete, range_a, LineRange::single(anchor_b))
    }

    pub fn append(anchor_a: usize, range_b: LineRange) -> Result<Self, ReportError> {
        Self::new(DiffKind::Append, LineRange::single(anchor_a), range_b)
    }
}

impl fmt::Display for DiffCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.range_a, self.kind.letter(), self.range_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_letters_map_both_ways() {
        for kind in [DiffKind::Change, DiffKind::Delete, DiffKind::Append] {
            assert_eq!(DiffKind::from_letter(kind.letter()), Some(kind));
        }
        assert_eq!(DiffKind::from_letter('x'), None);
    }

    #[test]
    fn range_len_and_display() {
        let r = LineRange::new(3, 5);
        assert_eq!(r.len(), 3);
        assert_eq!(r.to_string(), "3,5");
        assert_eq!(LineRange::single(7).to_string(), "7");
        assert_eq!(LineRange::single(7).len(), 1);
    }

    #[test]
    fn command_display_uses_ed_notation() {
        let cmd = DiffCommand::delete(LineRange::new(3, 5), 2).unwrap();
        assert_eq!(cmd.to_string(), "3,5d2");
    }

    #[test]
    fn inverted_range_rejected() {
        let err = DiffCommand::change(LineRange::new(5, 3), LineRange::single(1)).unwrap_err();
        assert_eq!(
            err,
            ReportError::InvertedRange {
                range: LineRange::new(5, 3)
            }
        );
    }

    #[test]
    fn delete_anchor_must_be_single() {
        let err =
            DiffCommand::new(DiffKind::Delete, LineRange::single(2), LineRange::new(1, 2)).unwrap_err();
        assert!(matches!(err, ReportError::AnchorNotSingle { kind: DiffKind::Delete, .. }));
    }

    #[test]
    fn append_anchor_must_be_single() {
        let err =
            DiffCommand::new(DiffKind::Append, LineRange::new(1, 2), LineRange::single(2)).unwrap_err();
        assert!(matches!(err, ReportError::AnchorNotSingle { kind: DiffKind::Append, .. }));
    }

    #[test]
    fn anchor_zero_allowed_visited_zero_rejected() {
        assert!(DiffCommand::append(0, LineRange::new(1, 2)).is_ok());
        assert!(DiffCommand::delete(LineRange::new(1, 1), 0).is_ok());
        assert!(matches!(
            DiffCommand::append(1, LineRange::new(0, 2)),
            Err(ReportError::ZeroLine { .. })
        ));
        assert!(matches!(
            DiffCommand::change(LineRange::single(1), LineRange::single(0)),
            Err(ReportError::ZeroLine { .. })
        ));
    }
}
