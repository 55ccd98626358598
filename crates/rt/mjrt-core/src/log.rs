//! Leveled diagnostic logging for the runtime.
//!
//! Provides [`rtlog!`] and the convenience macros (`rt_error!`, `rt_warn!`,
//! `rt_info!`, `rt_debug!`, `rt_trace!`). Messages are handed to a single
//! registrable sink. Before [`set_log_fn`] or [`install_stderr`] is called,
//! output is silently discarded.
//!
//! Fail-fast termination does not go through here: its one diagnostic line
//! is written by [`crate::config`] whether or not a sink is installed.
//!
//! Diagnostics never go to standard output: that stream belongs to the
//! program being run.

use core::fmt;
use core::sync::atomic::{AtomicPtr, AtomicU8, Ordering};
use std::io::Write;

// ---------------------------------------------------------------------------
// Log levels, lower = more severe
// ---------------------------------------------------------------------------

/// Runtime log severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    /// An operation failed and its result was replaced by a sentinel.
    Error = 0,
    /// Unexpected condition that the contract tells us to swallow.
    Warn = 1,
    /// High-level progress messages.
    Info = 2,
    /// Detailed diagnostic information.
    Debug = 3,
    /// Per-call tracing of bridge operations.
    Trace = 4,
}

impl LogLevel {
    /// Returns the human-readable name (fixed-width for aligned output).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN ",
            Self::Info => "INFO ",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Error,
            1 => Self::Warn,
            2 => Self::Info,
            3 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().trim_end())
    }
}

// ---------------------------------------------------------------------------
// Sink registration
// ---------------------------------------------------------------------------

/// The signature of the global leveled log function.
pub type LogFn = fn(LogLevel, fmt::Arguments<'_>);

fn null_log(_level: LogLevel, _args: fmt::Arguments<'_>) {}

static LOG_FN: AtomicPtr<()> = AtomicPtr::new(null_log as *mut ());

/// Registers the global leveled log function.
///
/// May be called more than once; the last registration wins.
pub fn set_log_fn(f: LogFn) {
    LOG_FN.store(f as *mut (), Ordering::Release);
}

#[inline]
fn load_log_fn() -> LogFn {
    let ptr = LOG_FN.load(Ordering::Acquire);
    // SAFETY: Only valid `LogFn` pointers (or the initial `null_log`) are ever
    // stored into LOG_FN, and fn pointers round-trip through `*mut ()`.
    unsafe { core::mem::transmute::<*mut (), LogFn>(ptr) }
}

/// Implementation detail for [`rtlog!`]. Not public API.
#[doc(hidden)]
pub fn _log(level: LogLevel, args: fmt::Arguments<'_>) {
    load_log_fn()(level, args);
}

// ---------------------------------------------------------------------------
// Bundled stderr sink
// ---------------------------------------------------------------------------

static STDERR_MAX_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);

/// Installs the stderr sink, keeping messages at `max_level` or more severe.
pub fn install_stderr(max_level: LogLevel) {
    STDERR_MAX_LEVEL.store(max_level as u8, Ordering::Relaxed);
    set_log_fn(stderr_log);
}

fn stderr_log(level: LogLevel, args: fmt::Arguments<'_>) {
    let max = LogLevel::from_u8(STDERR_MAX_LEVEL.load(Ordering::Relaxed));
    if level > max {
        return;
    }
    let mut err = std::io::stderr().lock();
    let _ = writeln!(err, "{}", format_record(level, args));
}

/// Formats one log line as written by the stderr sink.
pub fn format_record(level: LogLevel, args: fmt::Arguments<'_>) -> String {
    format!("[mjrt {}] {}", level.name(), args)
}

// ---------------------------------------------------------------------------
// Macros
// ---------------------------------------------------------------------------

/// Logs a message at the given level.
#[macro_export]
macro_rules! rtlog {
    ($level:expr, $($arg:tt)*) => {
        $crate::log::_log($level, format_args!($($arg)*))
    };
}

/// Logs an error-level message (level 0).
#[macro_export]
macro_rules! rt_error {
    ($($arg:tt)*) => { $crate::rtlog!($crate::log::LogLevel::Error, $($arg)*) };
}

/// Logs a warning-level message (level 1).
#[macro_export]
macro_rules! rt_warn {
    ($($arg:tt)*) => { $crate::rtlog!($crate::log::LogLevel::Warn, $($arg)*) };
}

/// Logs an info-level message (level 2).
#[macro_export]
macro_rules! rt_info {
    ($($arg:tt)*) => { $crate::rtlog!($crate::log::LogLevel::Info, $($arg)*) };
}

/// Logs a debug-level message (level 3).
#[macro_export]
macro_rules! rt_debug {
    ($($arg:tt)*) => { $crate::rtlog!($crate::log::LogLevel::Debug, $($arg)*) };
}

/// Logs a trace-level message (level 4).
#[macro_export]
macro_rules! rt_trace {
    ($($arg:tt)*) => { $crate::rtlog!($crate::log::LogLevel::Trace, $($arg)*) };
}
