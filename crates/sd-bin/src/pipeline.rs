//! One run: report text + two files in, rendered rows out.
//!
//! Report entries are consumed in order so parse diagnostics land between the
//! rows of the commands around them.

use anyhow::Result;
use core_align::{AlignStats, AlignmentEngine};
use core_render::{PanelRenderer, RenderStats};
use core_report::{ReportEntry, ReportParser};
use core_source::LineSource;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    pub width: u16,
    pub color: bool,
    pub tab_width: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub align: AlignStats,
    pub render: RenderStats,
}

pub fn render_files<W: Write>(
    left: &Path,
    right: &Path,
    report: &str,
    settings: RunSettings,
    out: W,
) -> Result<RunSummary> {
    let mut left = LineSource::open(left)?.with_tab_width(settings.tab_width);
    let mut right = LineSource::open(right)?.with_tab_width(settings.tab_width);
    render_sources(&mut left, &mut right, report, settings, out)
}

pub fn render_sources<W: Write>(
    left: &mut LineSource,
    right: &mut LineSource,
    report: &str,
    settings: RunSettings,
    out: W,
) -> Result<RunSummary> {
    let mut renderer = PanelRenderer::new(out, settings.width, settings.color);
    let mut engine = AlignmentEngine::new(left, right);
    for entry in ReportParser::new(report) {
        match entry {
            ReportEntry::Command(cmd) => engine.apply(&cmd, &mut renderer)?,
            ReportEntry::Preview => {}
            ReportEntry::Diagnostic(diag) => renderer.diagnostic(&diag)?,
        }
    }
    let align = engine.drain(&mut renderer)?;
    let (_out, render) = renderer.finish()?;
    Ok(RunSummary { align, render })
}
