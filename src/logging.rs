//! Diagnostic logging.
//!
//! `Logger` is a cheap, cloneable handle. Every component that logs receives
//! one at construction; nothing reaches for a global. Lines go to stdout and,
//! when a file is configured, are appended to it.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
#[cfg(test)]
use std::sync::Mutex;

/// Severity of a log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

#[derive(Default)]
struct LoggerInner {
    /// Append target, opened per line.
    file: Option<PathBuf>,
    /// In-memory copy of every line (test builds only).
    #[cfg(test)]
    captured: Mutex<Vec<String>>,
}

/// Handle to the diagnostic log.
#[derive(Clone, Default)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Creates a logger that appends to `file` in addition to stdout.
    pub fn to_file(file: PathBuf) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                file: Some(file),
                ..Default::default()
            }),
        }
    }

    /// Creates a logger that only writes to stdout.
    #[cfg(test)]
    pub fn stdout_only() -> Self {
        Self::default()
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.write(LogLevel::Info, msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.write(LogLevel::Warn, msg.as_ref());
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        self.write(LogLevel::Error, msg.as_ref());
    }

    /// Writes one line at the given level.
    pub fn write(&self, level: LogLevel, msg: &str) {
        let line = format_line(level, msg);
        print!("{}", line);

        if let Some(path) = &self.inner.file {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = file.write_all(line.as_bytes());
            }
        }

        #[cfg(test)]
        {
            if let Ok(mut captured) = self.inner.captured.lock() {
                captured.push(line.trim_end().to_string());
            }
        }
    }

    /// Returns every line written through this handle or its clones.
    #[cfg(test)]
    pub fn captured(&self) -> Vec<String> {
        self.inner
            .captured
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

/// Formats a log line: `[HH:MM:SS.mmm] [LEVEL] message\n`.
pub fn format_line(level: LogLevel, msg: &str) -> String {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    format!("[{}] [{}] {}\n", timestamp, level.as_str(), msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_line_has_level_and_message() {
        let line = format_line(LogLevel::Warn, "hotkey released");
        assert!(line.starts_with('['));
        assert!(line.contains("] [WARNING] hotkey released"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_logger_appends_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log");
        let logger = Logger::to_file(path.clone());

        logger.info("first");
        logger.clone().error("second");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[INFO] first"));
        assert!(lines[1].ends_with("[ERROR] second"));
    }

    #[test]
    fn test_clones_share_captured_lines() {
        let logger = Logger::stdout_only();
        let clone = logger.clone();
        clone.warn("from clone");

        let captured = logger.captured();
        assert_eq!(captured.len(), 1);
        assert!(captured[0].ends_with("[WARNING] from clone"));
    }
}
