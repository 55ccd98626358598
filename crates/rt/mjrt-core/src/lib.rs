//! Native runtime support for MiniJava generated code.
//!
//! Supplies what compiled programs cannot synthesize themselves: integer and
//! byte output, a blocking single-byte read, zero-initialized allocation of
//! objects and arrays, and the glue that runs the generated entry routine.
//!
//! - [`io`]: the I/O bridge over the host's standard streams.
//! - [`arena`]: the allocation bridge, a bump arena that lives until exit.
//! - [`start`]: entry glue with an injectable entry routine.
//! - [`abi`]: the `extern "C"` symbols generated code links against.
//!
//! The runtime is single-threaded by contract: all exported symbols must be
//! called from one thread.

pub mod abi;
pub mod arena;
pub mod cell;
pub mod config;
pub mod error;
pub mod io;
pub mod log;
pub mod start;

pub use config::{Config, FailurePolicy, RuntimeFlags};
pub use error::{Result, RtError};
pub use start::{EntryFn, EntryGlue, run};
