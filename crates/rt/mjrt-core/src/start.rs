//! Entry glue: hands control from process start to the generated program.
//!
//! The generated top-level routine is injected as a plain function value, so
//! the glue can be driven by the exported C `main` (in the `mjrt` archive)
//! or by any host program that wants to run a routine the same way.

use core::fmt;
use std::io::Write;

use crate::config::{Config, RUNTIME};

/// Signature of the generated program's top-level routine.
pub type EntryFn = extern "C" fn();

/// Status reported when the generated routine returns.
pub const EXIT_SUCCESS: i32 = 0;

/// Lifecycle of the process as seen by the glue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// The OS has started the process; generated code has not run yet.
    Started,
    /// The generated routine is executing.
    Running,
    /// The generated routine returned and output has been flushed.
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Started => "started",
            Self::Running => "running",
            Self::Terminated => "terminated",
        })
    }
}

/// One process run of a generated routine.
///
/// `run` consumes the glue, so a run can never go back to `Started`.
pub struct EntryGlue {
    entry: EntryFn,
    config: Config,
    phase: Phase,
}

impl EntryGlue {
    /// Prepares a run of `entry` with the compiled-in configuration.
    pub fn new(entry: EntryFn) -> Self {
        Self::with_config(entry, RUNTIME)
    }

    /// Prepares a run of `entry` with an explicit configuration.
    pub fn with_config(entry: EntryFn, config: Config) -> Self {
        Self {
            entry,
            config,
            phase: Phase::Started,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn advance(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "entry glue cannot go from {} to {next}", self.phase);
        self.phase = next;
        crate::rt_debug!("entry: {next}");
    }

    /// Runs the generated routine to completion and returns the exit status.
    ///
    /// Standard output is flushed after the routine returns so nothing the
    /// program printed stays behind in the stream buffer.
    pub fn run(mut self) -> i32 {
        if let Some(level) = self.config.log_level() {
            crate::log::install_stderr(level);
        }
        crate::rt_info!(
            "mjrt {} ({:?} failure policy)",
            env!("CARGO_PKG_VERSION"),
            self.config.policy()
        );
        crate::rt_debug!("entry: {}", self.phase);

        self.advance(Phase::Running);
        (self.entry)();

        let flushed = std::io::stdout().flush().map_err(Into::into);
        self.config.policy().settle("flush", flushed, ());
        self.advance(Phase::Terminated);
        EXIT_SUCCESS
    }
}

/// Runs `entry` as the whole program and returns the status to exit with.
pub fn run(entry: EntryFn) -> i32 {
    EntryGlue::new(entry).run()
}
