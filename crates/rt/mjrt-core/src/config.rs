//! Compile-time runtime configuration.
//!
//! The runtime reads no environment variables and no files. Everything it can
//! be told is fixed when the archive is built, through the `strict` and
//! `trace` Cargo features, and surfaces here as [`Config::from_features`].

use crate::error::{Result, RtError};
use crate::log::LogLevel;

/// Size of the zeroed chunks the allocation arena draws from the host.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024; // 64 KiB

/// Process exit status used when [`FailurePolicy::FailFast`] terminates.
pub const FAIL_FAST_STATUS: i32 = 1;

bitflags::bitflags! {
    /// Optional runtime behaviors selected at build time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RuntimeFlags: u8 {
        /// Write and allocation failures terminate the process.
        const FAIL_FAST = 1 << 0;
        /// Trace every bridge call on stderr.
        const TRACE     = 1 << 1;
    }
}

/// What the C-ABI layer does with an internal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Drop the error and hand back the contract's fallback value.
    Silent,
    /// Report the error on stderr and exit with [`FAIL_FAST_STATUS`].
    FailFast,
}

impl FailurePolicy {
    /// Collapses `result` into the value generated code sees.
    ///
    /// Under [`FailurePolicy::Silent`] an error becomes `fallback`. Under
    /// [`FailurePolicy::FailFast`] the process terminates.
    pub fn settle<T>(self, op: &str, result: Result<T>, fallback: T) -> T {
        match result {
            Ok(value) => value,
            Err(err) => match self {
                Self::Silent => {
                    crate::rt_warn!("{op}: {err} (ignored)");
                    fallback
                }
                Self::FailFast => fail_fast(op, &err),
            },
        }
    }
}

/// Formats the diagnostic printed before a fail-fast exit.
pub fn fatal_message(op: &str, err: &RtError) -> String {
    format!("mjrt: fatal: {op}: {err}")
}

fn fail_fast(op: &str, err: &RtError) -> ! {
    eprintln!("{}", fatal_message(op, err));
    std::process::exit(FAIL_FAST_STATUS);
}

/// Runtime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Selected optional behaviors.
    pub flags: RuntimeFlags,
    /// Arena chunk size in bytes.
    pub chunk_size: usize,
}

impl Config {
    /// Builds the configuration from the enabled Cargo features.
    pub const fn from_features() -> Self {
        let mut bits = 0;
        if cfg!(feature = "strict") {
            bits |= RuntimeFlags::FAIL_FAST.bits();
        }
        if cfg!(feature = "trace") {
            bits |= RuntimeFlags::TRACE.bits();
        }
        Self::with_flags(RuntimeFlags::from_bits_truncate(bits))
    }

    /// Builds a configuration with explicit flags and the default chunk size.
    pub const fn with_flags(flags: RuntimeFlags) -> Self {
        Self {
            flags,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Failure policy implied by the flags.
    pub const fn policy(&self) -> FailurePolicy {
        if self.flags.contains(RuntimeFlags::FAIL_FAST) {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Silent
        }
    }

    /// Maximum level for the stderr sink, or `None` to keep logging off.
    pub const fn log_level(&self) -> Option<LogLevel> {
        if self.flags.contains(RuntimeFlags::TRACE) {
            Some(LogLevel::Trace)
        } else if self.flags.contains(RuntimeFlags::FAIL_FAST) {
            Some(LogLevel::Error)
        } else {
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_features()
    }
}

/// The configuration this build of the runtime was compiled with.
pub static RUNTIME: Config = Config::from_features();
