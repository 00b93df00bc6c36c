//! Planner logging bootstrap.
//!
//! # Responsibility
//! - Start rolling file logs once per process.
//! - Keep emitted events metadata-only (no plan names, task text or goals).
//!
//! # Invariants
//! - Re-initializing with the same level and directory is a no-op.
//! - Re-initializing with a different level or directory is rejected.
//! - Initialization never panics.

use flexi_logger::{
    detailed_format, Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming,
    WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const FILE_BASENAME: &str = "planner";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static LOGGER: OnceCell<RunningLogger> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogTarget {
    level: LevelFilter,
    dir: PathBuf,
}

impl LogTarget {
    fn from_args(level: &str, log_dir: &str) -> Result<Self, String> {
        Ok(Self {
            level: parse_level(level)?,
            dir: parse_log_dir(log_dir)?,
        })
    }

    /// Compares against the running logger; any difference is an error.
    fn check_compatible(&self, running: &LogTarget) -> Result<(), String> {
        if self.dir != running.dir {
            return Err(format!(
                "logging already running in `{}`; refusing to switch to `{}`",
                running.dir.display(),
                self.dir.display()
            ));
        }
        if self.level != running.level {
            return Err(format!(
                "logging already running at level `{}`; refusing to switch to `{}`",
                level_name(running.level),
                level_name(self.level)
            ));
        }
        Ok(())
    }
}

struct RunningLogger {
    target: LogTarget,
    _handle: LoggerHandle,
}

/// Starts planner logging at `level` under the absolute `log_dir`.
///
/// # Errors
/// - Unsupported level, or empty/relative directory.
/// - Directory creation or logger backend failure.
/// - A previous call already started logging with other settings.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let requested = LogTarget::from_args(level, log_dir)?;
    let running = LOGGER.get_or_try_init(|| spawn_logger(requested.clone()))?;
    requested.check_compatible(&running.target)
}

fn spawn_logger(target: LogTarget) -> Result<RunningLogger, String> {
    std::fs::create_dir_all(&target.dir).map_err(|err| {
        format!(
            "cannot create log directory `{}`: {err}",
            target.dir.display()
        )
    })?;

    let spec = LogSpecification::builder().default(target.level).build();
    let files = FileSpec::default()
        .directory(target.dir.as_path())
        .basename(FILE_BASENAME);
    let handle = Logger::with(spec)
        .log_to_file(files)
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_FILES),
        )
        .append()
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(detailed_format)
        .start()
        .map_err(|err| format!("logger backend failed to start: {err}"))?;

    install_panic_hook();

    info!(
        "event=planner_start module=core status=ok os={} profile={} version={}",
        std::env::consts::OS,
        if cfg!(debug_assertions) { "debug" } else { "release" },
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "event=logging_init module=core status=ok level={} log_dir={}",
        level_name(target.level),
        target.dir.display()
    );

    Ok(RunningLogger {
        target,
        _handle: handle,
    })
}

/// Running `(level, log_dir)`, or `None` before `init_logging` succeeds.
pub fn logging_status() -> Option<(LevelFilter, PathBuf)> {
    LOGGER
        .get()
        .map(|running| (running.target.level, running.target.dir.clone()))
}

/// Level used when the caller gives none: `debug` in debug builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Accepts `trace|debug|info|warn|error` in any case, plus `warning`.
fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    let trimmed = raw.trim();
    let candidate = if trimmed.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        trimmed
    };
    match LevelFilter::from_str(candidate) {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{trimmed}`; expected trace|debug|info|warn|error"
        )),
        Ok(level) => Ok(level),
    }
}

fn parse_log_dir(raw: &str) -> Result<PathBuf, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let dir = Path::new(trimmed);
    if dir.is_relative() {
        return Err(format!("log_dir must be absolute, got `{trimmed}`"));
    }
    Ok(dir.to_path_buf())
}

fn level_name(level: LevelFilter) -> String {
    level.as_str().to_ascii_lowercase()
}

fn install_panic_hook() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let chained = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        // Payload may echo user input.
        let payload = one_line(&panic_payload(info.payload()), PANIC_PAYLOAD_LIMIT);
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location, payload
        );
        chained(info);
    }));
}

fn panic_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Flattens line breaks and caps the message at `limit` chars.
fn one_line(message: &str, limit: usize) -> String {
    let mut chars = message.chars().map(|c| match c {
        '\n' | '\r' => ' ',
        other => other,
    });
    let mut out: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        out.push_str("...");
    }
    out
}
