//! The runtime archive linked into every MiniJava executable.
//!
//! Re-exports the `extern "C"` bridge symbols from [`mjrt_core::abi`] and,
//! with the `entry` feature, defines the process entry point.

pub use mjrt_core::abi;

#[cfg(feature = "entry")]
pub mod start;
