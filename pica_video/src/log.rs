//! Internal logging system for the Pica video core
//!
//! This module provides a small logging layer with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - Thread-safe logger replacement through `VideoCore`
//! - File and line information for detailed ERROR logs

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to route video core logs elsewhere (the frontend's
/// log window, a file, a test capture buffer, ...).
///
/// # Example
///
/// ```no_run
/// use pica_video::pica::log::{Logger, LogEntry};
///
/// struct FrontendLogger;
///
/// impl Logger for FrontendLogger {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{}: {}", entry.source, entry.message);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "pica::RenderpassCache", "pica::vulkan")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-draw information (scope continuations, cache hits)
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (potential issues)
    Warn,

    /// Error messages (critical issues with file:line details)
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by the console logger
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl DefaultLogger {
    /// Render an entry without colors
    pub fn format_plain(entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");

        match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                entry.severity.label(),
                entry.source,
                entry.message,
                file,
                line
            ),
            _ => format!(
                "[{}] [{}] [{}] {}",
                timestamp,
                entry.severity.label(),
                entry.source,
                entry.message
            ),
        }
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => entry.severity.label().bright_black(),
            LogSeverity::Debug => entry.severity.label().cyan(),
            LogSeverity::Info => entry.severity.label().green(),
            LogSeverity::Warn => entry.severity.label().yellow(),
            LogSeverity::Error => entry.severity.label().red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                severity_str,
                source,
                entry.message,
                file,
                line
            );
        } else {
            println!(
                "[{}] [{}] [{}] {}",
                timestamp,
                severity_str,
                source,
                entry.message
            );
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, typically disabled)
///
/// # Example
///
/// ```no_run
/// # use pica_video::video_trace;
/// video_trace!("pica::RenderpassCache", "Continuing scope, {} draws", 3);
/// ```
#[macro_export]
macro_rules! video_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::pica::VideoCore::log(
            $crate::pica::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message (development information)
#[macro_export]
macro_rules! video_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::pica::VideoCore::log(
            $crate::pica::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (important events)
#[macro_export]
macro_rules! video_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::pica::VideoCore::log(
            $crate::pica::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (potential issues)
#[macro_export]
macro_rules! video_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::pica::VideoCore::log(
            $crate::pica::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
///
/// # Example
///
/// ```no_run
/// # use pica_video::video_error;
/// video_error!("pica::vulkan", "Failed to submit: {}", "device lost");
/// ```
#[macro_export]
macro_rules! video_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::pica::VideoCore::log_detailed(
            $crate::pica::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
