//! Two-panel row renderer.
//!
//! Consumes aligned rows one at a time and writes each as
//! `left | sep | right | sep | newline`. Column widths are computed once from
//! the display width and never change during a run. Widths are measured in
//! terminal cells; truncation never splits a grapheme cluster.

use crate::style::{Glyphs, StyleAttr};
use crate::writer::Writer;
use core_align::{AlignedRow, RowSink};
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Cells taken by the two separator glyphs on every row.
pub const SEPARATOR_CELLS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub left: usize,
    pub right: usize,
}

impl ColumnLayout {
    pub fn from_display_width(width: u16) -> Self {
        let usable = (width as usize).saturating_sub(SEPARATOR_CELLS);
        let left = usable / 2;
        Self {
            left,
            right: usable - left,
        }
    }
}

/// A column's text padded (or cut) to exactly the column width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittedColumn {
    pub text: String,
    pub truncated: bool,
}

/// Swap control characters for visible one-cell glyphs so file content can
/// neither move the cursor nor start an escape sequence.
pub fn visible_text(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().map(control_picture).collect())
}

fn control_picture(c: char) -> char {
    match c {
        '\u{0}'..='\u{1f}' => char::from_u32(0x2400 + c as u32).unwrap_or('\u{FFFD}'),
        '\u{7f}' => '\u{2421}',
        c if c.is_control() => '\u{FFFD}',
        c => c,
    }
}

pub fn fit_column(text: &str, width: usize) -> FittedColumn {
    let text = visible_text(text);
    let mut out = String::with_capacity(width);
    let mut used = 0usize;
    let mut truncated = false;
    for g in text.graphemes(true) {
        let w = g.width();
        if used + w > width {
            truncated = true;
            break;
        }
        out.push_str(g);
        used += w;
    }
    // A wide cluster that did not fit can leave one cell short.
    out.extend(std::iter::repeat_n(' ', width - used));
    FittedColumn {
        text: out,
        truncated,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub rows: u64,
    pub truncated_cells: u64,
    pub diagnostics: u64,
}

pub struct PanelRenderer<W: Write> {
    out: W,
    layout: ColumnLayout,
    glyphs: Glyphs,
    color: bool,
    stats: RenderStats,
}

impl<W: Write> PanelRenderer<W> {
    pub fn new(out: W, display_width: u16, color: bool) -> Self {
        let layout = ColumnLayout::from_display_width(display_width);
        tracing::debug!(
            target: "render",
            display_width,
            left = layout.left,
            right = layout.right,
            color,
            "panel_layout"
        );
        Self {
            out,
            layout,
            glyphs: Glyphs::for_color(color),
            color,
            stats: RenderStats::default(),
        }
    }

    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn render_row(&mut self, row: &AlignedRow) -> io::Result<()> {
        let mut w = Writer::new();
        let left_cut = self.column(&mut w, row.left.as_deref(), self.layout.left, row.highlighted);
        self.separator(&mut w, left_cut, self.glyphs.separator);
        let right_cut = self.column(&mut w, row.right.as_deref(), self.layout.right, row.highlighted);
        self.separator(&mut w, right_cut, self.glyphs.trailing);
        w.newline();
        w.flush_to(&mut self.out, self.color)?;
        self.stats.rows += 1;
        Ok(())
    }

    /// Print a report diagnostic between rows, in report order.
    pub fn diagnostic(&mut self, message: impl fmt::Display) -> io::Result<()> {
        self.stats.diagnostics += 1;
        writeln!(self.out, "error: {message}")
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> io::Result<(W, RenderStats)> {
        self.out.flush()?;
        tracing::debug!(
            target: "render",
            rows = self.stats.rows,
            truncated_cells = self.stats.truncated_cells,
            diagnostics = self.stats.diagnostics,
            "render_complete"
        );
        Ok((self.out, self.stats))
    }

    fn column(&mut self, w: &mut Writer, text: Option<&str>, width: usize, highlighted: bool) -> bool {
        let fill = if highlighted { StyleAttr::Highlight } else { StyleAttr::Plain };
        match text {
            Some(text) => {
                let fitted = fit_column(text, width);
                if fitted.truncated {
                    self.stats.truncated_cells += 1;
                }
                w.styled(fill, fitted.text);
                fitted.truncated
            }
            None => {
                if width > 0 {
                    w.styled(StyleAttr::Missing, self.glyphs.missing.to_string());
                    w.styled(fill, " ".repeat(width - 1));
                }
                false
            }
        }
    }

    fn separator(&self, w: &mut Writer, truncated: bool, normal: char) {
        if truncated {
            w.styled(StyleAttr::Truncated, self.glyphs.truncated.to_string());
        } else {
            w.print(normal.to_string());
        }
    }
}

impl<W: Write> RowSink for PanelRenderer<W> {
    fn push_row(&mut self, row: AlignedRow) -> io::Result<()> {
        self.render_row(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn layout_splits_usable_width() {
        assert_eq!(
            ColumnLayout::from_display_width(80),
            ColumnLayout { left: 39, right: 39 }
        );
        assert_eq!(
            ColumnLayout::from_display_width(13),
            ColumnLayout { left: 5, right: 6 }
        );
        assert_eq!(
            ColumnLayout::from_display_width(1),
            ColumnLayout { left: 0, right: 0 }
        );
    }

    #[test]
    fn fit_pads_short_text() {
        assert_eq!(
            fit_column("ab", 4),
            FittedColumn {
                text: "ab  ".into(),
                truncated: false
            }
        );
    }

    #[test]
    fn fit_exact_width_is_not_truncated() {
        assert!(!fit_column("abcd", 4).truncated);
    }

    #[test]
    fn fit_cuts_long_text() {
        assert_eq!(
            fit_column("abcdef", 4),
            FittedColumn {
                text: "abcd".into(),
                truncated: true
            }
        );
    }

    #[test]
    fn fit_never_splits_wide_clusters() {
        let fitted = fit_column("漢字漢", 5);
        assert_eq!(fitted.text, "漢字 ");
        assert!(fitted.truncated);
        assert_eq!(fitted.text.width(), 5);
    }

    #[test]
    fn control_characters_become_visible_cells() {
        let fitted = fit_column("a\x1b[31mb", 6);
        assert_eq!(fitted.text, "a\u{241B}[31m");
        assert!(fitted.truncated);
        assert_eq!(fitted.text.width(), 6);
        assert_eq!(visible_text("x\ry\x7f\u{85}"), "x\u{240D}y\u{2421}\u{FFFD}");
        assert!(matches!(visible_text("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn fit_keeps_combining_marks_with_base() {
        let fitted = fit_column("e\u{0301}x", 1);
        assert_eq!(fitted.text, "e\u{0301}");
        assert!(fitted.truncated);
    }
}
