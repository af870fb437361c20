//! Leveled diagnostic logging.
//!
//! Standard output carries the converted CSV, so every log entry goes
//! to standard error. A process-wide [`Verbosity`] decides which entries
//! are printed.

use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};

use once_cell::sync::Lazy;

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

/// How much the sink prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Errors only
    Quiet = 0,
    /// Everything except debug entries
    Normal = 1,
    /// Everything
    Debug = 2,
}

impl Verbosity {
    /// Parse `quiet`, `info`/`normal` or `debug` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "quiet" | "error" => Some(Verbosity::Quiet),
            "info" | "normal" => Some(Verbosity::Normal),
            "debug" => Some(Verbosity::Debug),
            _ => None,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Verbosity::Quiet,
            1 => Verbosity::Normal,
            _ => Verbosity::Debug,
        }
    }
}

/// A single log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth, rendered as leading spaces
    pub indent: u8,
}

impl LogEntry {
    pub fn debug(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Debug, message: message.into(), indent: 0 }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Whether this entry is printed at the given verbosity.
    pub fn visible_at(&self, verbosity: Verbosity) -> bool {
        match self.level {
            LogLevel::Error => true,
            LogLevel::Debug => verbosity >= Verbosity::Debug,
            _ => verbosity >= Verbosity::Normal,
        }
    }

    /// Render the entry as one line, without the trailing newline.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Debug => "   ·",
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Global log sink
pub static LOG_SINK: Lazy<LogSink> = Lazy::new(LogSink::new);

/// Filters entries by verbosity and writes them to stderr
pub struct LogSink {
    verbosity: AtomicU8,
}

impl LogSink {
    pub fn new() -> Self {
        Self { verbosity: AtomicU8::new(Verbosity::Normal as u8) }
    }

    pub fn set_verbosity(&self, verbosity: Verbosity) {
        self.verbosity.store(verbosity as u8, Ordering::Relaxed);
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_u8(self.verbosity.load(Ordering::Relaxed))
    }

    pub fn log(&self, entry: LogEntry) {
        if !entry.visible_at(self.verbosity()) {
            return;
        }
        // A closed stderr must not abort a conversion.
        let _ = writeln!(std::io::stderr().lock(), "{}", entry.render());
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Set the process-wide verbosity
pub fn set_verbosity(verbosity: Verbosity) {
    LOG_SINK.set_verbosity(verbosity);
}

pub fn log_debug(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::debug(msg));
}

pub fn log_info(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::error(msg));
}

pub fn log_debug_indent(msg: impl Into<String>, indent: u8) {
    LOG_SINK.log(LogEntry::debug(msg).with_indent(indent));
}
