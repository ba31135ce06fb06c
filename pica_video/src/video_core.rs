/// VideoCore - process-wide state of the video core
///
/// Holds the active logger. Backends and the renderpass cache log through the
/// `video_*!` macros, which route here.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Minimum severity forwarded to the logger
static MIN_SEVERITY: RwLock<LogSeverity> = RwLock::new(LogSeverity::Debug);

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Video core global state manager
///
/// # Example
///
/// ```no_run
/// use pica_video::pica::{VideoCore, log::{Logger, LogEntry, LogSeverity}};
///
/// struct Silent;
/// impl Logger for Silent {
///     fn log(&self, _entry: &LogEntry) {}
/// }
///
/// VideoCore::set_logger(Silent);
/// VideoCore::set_min_severity(LogSeverity::Warn);
/// ```
pub struct VideoCore;

impl VideoCore {
    /// Replace the active logger
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Drop every entry below `severity`
    ///
    /// Detailed logs (ERROR with file:line) are always forwarded.
    pub fn set_min_severity(severity: LogSeverity) {
        if let Ok(mut lock) = MIN_SEVERITY.write() {
            *lock = severity;
        }
    }

    /// Current minimum severity
    pub fn min_severity() -> LogSeverity {
        MIN_SEVERITY.read().map(|s| *s).unwrap_or(LogSeverity::Debug)
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like video_info!, video_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if severity < Self::min_severity() {
            return;
        }
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by the video_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}
