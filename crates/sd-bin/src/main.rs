//! splitdiff entrypoint.
use anyhow::{Result, bail};
use clap::Parser;
use core_config::{ColorMode, ConfigContext, load_from};
use core_terminal::{CrosstermBackend, TerminalCapabilities};
use std::io::{self, BufWriter, stdout};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod compare;
mod pipeline;

use pipeline::RunSettings;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "splitdiff",
    version,
    about = "Side-by-side view of two files driven by a positional diff report"
)]
struct Args {
    /// Left-hand file.
    pub file_a: PathBuf,
    /// Right-hand file.
    pub file_b: PathBuf,
    /// Display width in columns (defaults to the terminal width).
    #[arg(long)]
    pub width: Option<u16>,
    /// Optional configuration file path (overrides discovery of `splitdiff.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Use a pre-captured report instead of running the comparison tool (`-` reads stdin).
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Comparison tool to run (overrides `[diff] program`).
    #[arg(long = "diff-program")]
    pub diff_program: Option<String>,
    /// When to color output: auto, always or never.
    #[arg(long)]
    pub color: Option<ColorMode>,
    /// Write logs to this file instead of stderr (filter with RUST_LOG).
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self, log_file: Option<&Path>) -> Result<()> {
        match log_file {
            Some(path) => {
                let dir = match path.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p,
                    _ => Path::new("."),
                };
                let Some(name) = path.file_name() else {
                    bail!("log file path {} has no file name", path.display());
                };
                let file_appender = tracing_appender::rolling::never(dir, name);
                let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
                if tracing_subscriber::fmt()
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_ansi(false)
                    .with_writer(nb_writer)
                    .try_init()
                    .is_ok()
                {
                    self.log_guard = Some(guard);
                }
                // Otherwise a global subscriber is already installed; dropping the
                // guard shuts the unused writer down.
            }
            None => {
                // Stderr shares the terminal with the rendered rows, so stay quiet
                // unless RUST_LOG asks otherwise.
                let filter = EnvFilter::builder()
                    .with_default_directive(LevelFilter::OFF.into())
                    .from_env_lossy();
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .try_init();
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn run(args: &Args) -> Result<()> {
    for path in [&args.file_a, &args.file_b] {
        if !path.exists() {
            bail!("file {} does not exist", path.display());
        }
    }

    let mut config = load_from(args.config.clone())?;
    let caps = TerminalCapabilities::detect(&CrosstermBackend::new());
    let width = config.apply_context(ConfigContext {
        width_override: args.width,
        terminal_columns: caps.columns,
        color_override: args.color,
        stdout_is_terminal: caps.stdout_is_terminal,
        no_color_env: caps.no_color_env,
    });
    info!(
        target: "runtime.startup",
        file_a = %args.file_a.display(),
        file_b = %args.file_b.display(),
        width,
        color = config.color_enabled,
        config_override = args.config.is_some(),
        "bootstrap_complete"
    );

    let report = match args.report.as_deref() {
        Some(path) => compare::read_report(path)?,
        None => {
            let program = args.diff_program.as_deref().unwrap_or(config.diff_program());
            compare::capture_report(program, &args.file_a, &args.file_b)?
        }
    };

    let settings = RunSettings {
        width,
        color: config.color_enabled,
        tab_width: config.tab_width(),
    };
    let out = BufWriter::new(stdout().lock());
    let summary = pipeline::render_files(&args.file_a, &args.file_b, &report, settings, out)?;
    info!(
        target: "runtime",
        commands = summary.align.commands,
        rows = summary.render.rows,
        changed = summary.align.changed,
        left_only = summary.align.left_only,
        right_only = summary.align.right_only,
        diagnostics = summary.render.diagnostics,
        "run_complete"
    );
    Ok(())
}

/// True when the failure is stdout's reader going away mid-stream.
fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging(args.log_file.as_deref())?;
    AppStartup::install_panic_hook();

    match run(&args) {
        Err(e) if is_broken_pipe(&e) => {
            debug!(target: "runtime", "output_closed");
            Ok(())
        }
        Err(e) => {
            error!(target: "runtime", error = %e, "run_failed");
            Err(e)
        }
        Ok(()) => Ok(()),
    }
}
