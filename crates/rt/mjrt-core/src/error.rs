//! Error types for the runtime bridges.

use std::fmt;
use std::io;

/// Errors the I/O and allocation bridges can produce internally.
///
/// None of these cross the C ABI: the exported symbols collapse them into
/// the sentinel and null-handle contract (see [`crate::config::FailurePolicy`]).
#[derive(Debug)]
pub enum RtError {
    /// The host stream rejected a read, write or flush.
    Io(io::Error),
    /// `element_size * element_count` does not fit the host address space.
    SizeOverflow {
        /// Requested element footprint in bytes.
        element_size: u32,
        /// Requested element count.
        element_count: u32,
    },
    /// The host allocator could not supply a chunk of the given size.
    OutOfMemory {
        /// Size of the chunk that was requested.
        bytes: usize,
    },
}

impl fmt::Display for RtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "stdio error: {e}"),
            Self::SizeOverflow {
                element_size,
                element_count,
            } => write!(
                f,
                "allocation size overflow: {element_count} elements of {element_size} bytes"
            ),
            Self::OutOfMemory { bytes } => write!(f, "out of memory: {bytes} byte chunk"),
        }
    }
}

impl std::error::Error for RtError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RtError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, RtError>;
