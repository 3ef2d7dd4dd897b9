//! Configuration loading and parsing.
//!
//! Parses `splitdiff.toml` (or an override path provided by the binary).
//! Every key is optional; a missing file yields defaults and a file that
//! fails to parse yields defaults plus a warning. Unknown fields are ignored
//! so older binaries tolerate newer files.
//!
//! Display width and color are not final until `Config::apply_context` folds
//! in what the binary learned at startup (CLI overrides, terminal columns,
//! whether stdout is a terminal). The resolved values are fixed for the run.

use anyhow::Result;
use serde::Deserialize;
use std::{fmt, fs, path::PathBuf, str::FromStr};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "splitdiff.toml";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown color mode `{other}` (expected auto, always or never)")),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiffConfig {
    #[serde(default = "DiffConfig::default_program")]
    pub program: String,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            program: Self::default_program(),
        }
    }
}

impl DiffConfig {
    fn default_program() -> String {
        "diff".to_string()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "DisplayConfig::default_fallback_width")]
    pub fallback_width: u16,
    #[serde(default = "DisplayConfig::default_min_width")]
    pub min_width: u16,
    #[serde(default = "DisplayConfig::default_tab_width")]
    pub tab_width: usize,
    #[serde(default)]
    pub color: ColorMode,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fallback_width: Self::default_fallback_width(),
            min_width: Self::default_min_width(),
            tab_width: Self::default_tab_width(),
            color: ColorMode::default(),
        }
    }
}

impl DisplayConfig {
    const fn default_fallback_width() -> u16 {
        80
    }
    const fn default_min_width() -> u16 {
        10
    }
    const fn default_tab_width() -> usize {
        4
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub diff: DiffConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,     // original file string (optional)
    pub file: ConfigFile,        // parsed (or default) data
    pub effective_width: u16,    // resolved display width
    pub color_enabled: bool,     // resolved from mode + environment
}

/// Facts gathered by the binary at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigContext {
    pub width_override: Option<u16>,
    pub terminal_columns: Option<u16>,
    pub color_override: Option<ColorMode>,
    pub stdout_is_terminal: bool,
    pub no_color_env: bool,
}

/// Best-effort config path: local working directory first, then the platform
/// config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("splitdiff").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                ..Config::default()
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Resolve width (CLI > terminal > fallback, clamped to `min_width`) and
    /// color. Returns the effective width.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> u16 {
        let disp = &self.file.display;
        let requested = ctx
            .width_override
            .or(ctx.terminal_columns.filter(|w| *w > 0))
            .unwrap_or(disp.fallback_width);
        let width = requested.max(disp.min_width);
        if width != requested {
            info!(
                target: "config",
                requested,
                clamped = width,
                min_width = disp.min_width,
                "display_width_clamped"
            );
        }

        let mode = ctx.color_override.unwrap_or(disp.color);
        self.color_enabled = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => ctx.stdout_is_terminal && !ctx.no_color_env,
        };
        self.effective_width = width;
        width
    }

    pub fn tab_width(&self) -> usize {
        self.file.display.tab_width
    }

    pub fn diff_program(&self) -> &str {
        &self.file.diff.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.diff_program(), "diff");
        assert_eq!(cfg.file.display.fallback_width, 80);
        assert_eq!(cfg.tab_width(), 4);
        assert_eq!(cfg.file.display.color, ColorMode::Auto);
        assert!(cfg.raw.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let tmp = write_config(
            "[diff]\nprogram = \"gdiff\"\n[display]\nfallback_width = 120\ntab_width = 8\ncolor = \"never\"\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.diff_program(), "gdiff");
        assert_eq!(cfg.file.display.fallback_width, 120);
        assert_eq!(cfg.file.display.min_width, 10);
        assert_eq!(cfg.tab_width(), 8);
        assert_eq!(cfg.file.display.color, ColorMode::Never);
        assert!(cfg.raw.is_some());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let tmp = write_config("[display]\ntab_width = 2\nwrap = true\n[future]\nx = 1\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.tab_width(), 2);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = write_config("[display\ntab_width = ");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.tab_width(), 4);
        assert!(cfg.raw.is_none());
    }

    #[test]
    fn width_precedence_override_terminal_fallback() {
        let mut cfg = Config::default();
        let ctx = ConfigContext {
            width_override: Some(100),
            terminal_columns: Some(60),
            ..ConfigContext::default()
        };
        assert_eq!(cfg.apply_context(ctx), 100);
        let ctx = ConfigContext {
            terminal_columns: Some(60),
            ..ConfigContext::default()
        };
        assert_eq!(cfg.apply_context(ctx), 60);
        assert_eq!(cfg.apply_context(ConfigContext::default()), 80);
        // A zero-column report from the terminal counts as unknown.
        let ctx = ConfigContext {
            terminal_columns: Some(0),
            ..ConfigContext::default()
        };
        assert_eq!(cfg.apply_context(ctx), 80);
        assert_eq!(cfg.effective_width, 80);
    }

    #[test]
    fn color_resolution_follows_mode_and_environment() {
        let mut cfg = Config::default();
        let tty = ConfigContext {
            stdout_is_terminal: true,
            ..ConfigContext::default()
        };
        cfg.apply_context(tty);
        assert!(cfg.color_enabled);
        cfg.apply_context(ConfigContext {
            no_color_env: true,
            ..tty
        });
        assert!(!cfg.color_enabled);
        cfg.apply_context(ConfigContext {
            color_override: Some(ColorMode::Always),
            ..ConfigContext::default()
        });
        assert!(cfg.color_enabled);
        cfg.apply_context(ConfigContext {
            color_override: Some(ColorMode::Never),
            ..tty
        });
        assert!(!cfg.color_enabled);
    }

    #[test]
    fn color_mode_parses_case_insensitively() {
        assert_eq!("ALWAYS".parse::<ColorMode>(), Ok(ColorMode::Always));
        assert!("sometimes".parse::<ColorMode>().is_err());
        assert_eq!(ColorMode::Never.to_string(), "never");
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let mut cfg = Config::default();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let width = with_default(subscriber, || {
            cfg.apply_context(ConfigContext {
                width_override: Some(4),
                ..ConfigContext::default()
            })
        });

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("display_width_clamped"));
        assert_eq!(width, 10);
    }
}
