//! Style layer for the two-panel view.
//!
//! Every printed span carries one `StyleAttr`. Mapping attributes to
//! terminal colors happens only here, so plain (colorless) output and styled
//! output share the same span sequence.

use crossterm::style::{Color, Colors};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleAttr {
    Plain,
    /// Background for both columns of a changed row.
    Highlight,
    /// The single marker cell of a "no corresponding line" column.
    Missing,
    /// Delimiter replacing a separator after a truncated column.
    Truncated,
}

impl StyleAttr {
    pub fn colors(self) -> Option<Colors> {
        match self {
            Self::Plain => None,
            Self::Highlight => Some(Colors::new(Color::Black, Color::DarkCyan)),
            Self::Missing => Some(Colors {
                foreground: None,
                background: Some(Color::DarkBlue),
            }),
            Self::Truncated => Some(Colors::new(Color::Grey, Color::DarkRed)),
        }
    }
}

/// Glyphs used around and inside the columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyphs {
    pub separator: char,
    pub trailing: char,
    pub truncated: char,
    pub missing: char,
}

impl Glyphs {
    /// Colored output marks a missing line with a colored blank cell.
    pub const COLOR: Self = Self {
        separator: '|',
        trailing: ' ',
        truncated: '}',
        missing: ' ',
    };

    /// Plain output needs a visible glyph for the missing-line marker.
    pub const PLAIN: Self = Self {
        missing: '~',
        ..Self::COLOR
    };

    pub fn for_color(color: bool) -> Self {
        if color { Self::COLOR } else { Self::PLAIN }
    }
}
