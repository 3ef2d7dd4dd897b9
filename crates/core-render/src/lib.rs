//! Side-by-side terminal output for aligned rows.
//!
//! Exposed Components:
//! - `panels`: `PanelRenderer`, the streaming row consumer, plus the column
//!   layout and fitting rules it applies.
//! - `style`: style attributes and glyph sets; the only place that knows
//!   terminal colors.
//! - `writer`: per-row command list flushed through crossterm.
//!
//! Row Layout:
//! 1. Left column, exactly `layout.left` cells.
//! 2. Separator `|`, or the truncation delimiter when the left text was cut.
//! 3. Right column, exactly `layout.right` cells.
//! 4. Trailing space, or the truncation delimiter when the right text was cut.
//! 5. Newline.
//!
//! A missing side prints one marker cell followed by padding. Changed rows
//! paint both columns with the highlight background, including the padding
//! of a missing side.

pub mod panels;
pub mod style;
pub mod writer;

pub use panels::{ColumnLayout, FittedColumn, PanelRenderer, RenderStats, fit_column, visible_text};
pub use style::{Glyphs, StyleAttr};
