//! Terminal writer abstraction.
//!
//! Rows are assembled as a short command list and flushed in one go, so a
//! row is either written whole or fails as a unit.
//!
//! Design invariants:
//! * Commands preserve ordering; nothing is written before `flush_to`.
//! * Styled spans always end with a color reset, so styles never leak into
//!   the next span or row.
//! * With color disabled, styled spans print as plain text.
//! * The writer is a short-lived object per row and owns no global state.

use crate::style::StyleAttr;
use crossterm::{
    queue,
    style::{Print, ResetColor, SetColors},
};
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Print(String),
    Styled(StyleAttr, String),
    Newline,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn styled<S: Into<String>>(&mut self, attr: StyleAttr, s: S) {
        let s: String = s.into();
        if s.is_empty() {
            return;
        }
        if attr == StyleAttr::Plain {
            self.cmds.push(Command::Print(s));
        } else {
            self.cmds.push(Command::Styled(attr, s));
        }
    }

    pub fn newline(&mut self) {
        self.cmds.push(Command::Newline);
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn flush_to<W: Write>(self, out: &mut W, color: bool) -> io::Result<()> {
        for c in self.cmds {
            match c {
                Command::Print(s) => {
                    queue!(out, Print(s))?;
                }
                Command::Styled(attr, s) => match attr.colors().filter(|_| color) {
                    Some(colors) => {
                        queue!(out, SetColors(colors), Print(s), ResetColor)?;
                    }
                    None => {
                        queue!(out, Print(s))?;
                    }
                },
                Command::Newline => {
                    queue!(out, Print('\n'))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_styled_spans_collapse_to_print() {
        let mut w = Writer::new();
        w.styled(StyleAttr::Plain, "abc");
        w.styled(StyleAttr::Highlight, "");
        assert_eq!(w.commands(), &[Command::Print("abc".into())]);
    }

    #[test]
    fn color_disabled_writes_raw_text() {
        let mut w = Writer::new();
        w.styled(StyleAttr::Highlight, "x");
        w.print("|");
        w.newline();
        let mut out = Vec::new();
        w.flush_to(&mut out, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "x|\n");
    }

    #[test]
    fn color_enabled_wraps_styled_span_with_reset() {
        let mut w = Writer::new();
        w.styled(StyleAttr::Truncated, "}");
        let mut out = Vec::new();
        w.flush_to(&mut out, true).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.starts_with("\x1b["));
        assert!(s.contains('}'));
        assert!(s.ends_with("\x1b[0m"));
    }
}
