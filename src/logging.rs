use std::fmt;
use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Local;

/// Set to `error`, `info` or `debug` to change how much reaches the log file.
pub const LOG_LEVEL_ENV: &str = "TEAMMATE_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Info,
    Debug,
}

impl Level {
    fn from_env() -> Level {
        match std::env::var(LOG_LEVEL_ENV).ok().as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("error") => Level::Error,
            Some(v) if v.eq_ignore_ascii_case("info") => Level::Info,
            _ => Level::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Error => "ERROR",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        })
    }
}

struct LogTarget {
    path: PathBuf,
    max_level: Level,
}

lazy_static::lazy_static! {
    static ref TARGET: Mutex<Option<LogTarget>> = Mutex::new(None);
}

/// Log into the per-user cache directory. Nothing is ever written to stderr.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("teammate-finder")
        .join("logs");
    init_logging_in(log_dir, Level::from_env())
}

/// Start a fresh timestamped log file in `log_dir`.
pub fn init_logging_in(log_dir: PathBuf, max_level: Level) -> Result<(), Box<dyn std::error::Error>> {
    create_dir_all(&log_dir)?;
    let path = log_dir.join(format!("teammate-{}.log", Local::now().format("%Y%m%d-%H%M%S")));

    if let Ok(mut target) = TARGET.lock() {
        *target = Some(LogTarget { path: path.clone(), max_level });
    }
    log_info(&format!("Logging to {} (level {})", path.display(), max_level));
    Ok(())
}

pub fn log_error(message: &str) {
    write_entry(Level::Error, message);
}

pub fn log_info(message: &str) {
    write_entry(Level::Info, message);
}

pub fn log_debug(message: &str) {
    write_entry(Level::Debug, message);
}

/// Record where and why the TUI panicked; the terminal is unusable by then.
pub fn log_panic_info(info: &std::panic::PanicInfo) {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "unknown location".to_string());

    log_error(&format!("PANIC at {}: {}", location, payload));
    log_debug(&format!("Backtrace:\n{}", std::backtrace::Backtrace::capture()));
}

fn write_entry(level: Level, message: &str) {
    let Ok(target) = TARGET.lock() else { return };
    let Some(target) = target.as_ref() else { return };
    if level > target.max_level {
        return;
    }

    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&target.path) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(file, "[{}] {:<5} {}", timestamp, level, message);
    }
}

pub fn get_log_file_path() -> Option<PathBuf> {
    TARGET.lock().ok().and_then(|target| target.as_ref().map(|t| t.path.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_order_by_verbosity() {
        assert!(Level::Error < Level::Info);
        assert!(Level::Info < Level::Debug);
        assert_eq!(Level::Info.to_string(), "INFO");
    }
}
