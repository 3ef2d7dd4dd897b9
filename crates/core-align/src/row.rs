//! Aligned row model and the sink rows are streamed into.

use std::io;

/// One display row: an optional line from each file plus the change flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRow {
    pub left: Option<String>,
    pub right: Option<String>,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Synchronized,
    Changed,
    LeftOnly,
    RightOnly,
    Empty,
}

impl AlignedRow {
    pub fn new(left: Option<String>, right: Option<String>, highlighted: bool) -> Self {
        Self {
            left,
            right,
            highlighted,
        }
    }

    pub fn synced(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::new(Some(left.into()), Some(right.into()), false)
    }

    pub fn changed(left: Option<String>, right: Option<String>) -> Self {
        Self::new(left, right, true)
    }

    pub fn left_only(left: impl Into<String>) -> Self {
        Self::new(Some(left.into()), None, false)
    }

    pub fn right_only(right: impl Into<String>) -> Self {
        Self::new(None, Some(right.into()), false)
    }

    pub fn kind(&self) -> RowKind {
        if self.highlighted {
            return RowKind::Changed;
        }
        match (&self.left, &self.right) {
            (Some(_), Some(_)) => RowKind::Synchronized,
            (Some(_), None) => RowKind::LeftOnly,
            (None, Some(_)) => RowKind::RightOnly,
            (None, None) => RowKind::Empty,
        }
    }
}

/// Consumer of aligned rows, fed strictly in display order.
pub trait RowSink {
    fn push_row(&mut self, row: AlignedRow) -> io::Result<()>;
}

impl RowSink for Vec<AlignedRow> {
    fn push_row(&mut self, row: AlignedRow) -> io::Result<()> {
        self.push(row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_presence_and_flag() {
        assert_eq!(AlignedRow::synced("a", "a").kind(), RowKind::Synchronized);
        assert_eq!(AlignedRow::left_only("a").kind(), RowKind::LeftOnly);
        assert_eq!(AlignedRow::right_only("b").kind(), RowKind::RightOnly);
        assert_eq!(AlignedRow::changed(Some("a".into()), None).kind(), RowKind::Changed);
        assert_eq!(AlignedRow::new(None, None, false).kind(), RowKind::Empty);
    }
}
