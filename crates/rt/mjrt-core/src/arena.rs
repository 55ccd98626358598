//! Allocation bridge: a process-lifetime bump arena.
//!
//! Chunks are requested from the host's zero-initializing allocator and
//! handed out front to back. Nothing is ever freed or reused while the arena
//! lives, so every block starts out zeroed and no two live blocks overlap.
//! The process-wide arena is a `static` and therefore lives until exit;
//! arenas created elsewhere (tests) release their chunks on drop.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::cell::ProcessCell;
use crate::config::{Config, DEFAULT_CHUNK_SIZE};
use crate::error::{Result, RtError};

/// Alignment of every block (matches the widest scalar generated code stores).
pub const MIN_ALIGN: usize = 16;

/// Align `size` upward to [`MIN_ALIGN`], or `None` on overflow.
#[inline]
const fn align_up(size: usize) -> Option<usize> {
    match size.checked_add(MIN_ALIGN - 1) {
        Some(v) => Some(v & !(MIN_ALIGN - 1)),
        None => None,
    }
}

/// Byte size of `element_count` elements of `element_size` bytes.
///
/// Zero-byte requests are rounded up to one byte so each still gets a
/// distinct address.
pub fn request_size(element_size: u32, element_count: u32) -> Result<usize> {
    let product = u64::from(element_size) * u64::from(element_count);
    let bytes = usize::try_from(product).map_err(|_| RtError::SizeOverflow {
        element_size,
        element_count,
    })?;
    Ok(bytes.max(1))
}

/// A chunk obtained from the host allocator.
struct Chunk {
    base: NonNull<u8>,
    layout: Layout,
}

/// Counters describing arena usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Chunks obtained from the host, including dedicated ones.
    pub chunks: usize,
    /// Total bytes obtained from the host.
    pub reserved_bytes: usize,
    /// Total bytes requested by callers (before alignment).
    pub allocated_bytes: usize,
    /// Number of successful allocations.
    pub allocations: usize,
}

/// Bump allocator over zeroed host chunks.
pub struct Arena {
    chunk_size: usize,
    /// Chunk currently being bumped through, if any.
    current: Option<NonNull<u8>>,
    /// Next free offset within `current`.
    offset: usize,
    /// Usable size of `current`.
    capacity: usize,
    chunks: Vec<Chunk>,
    stats: ArenaStats,
}

impl Arena {
    /// Creates an empty arena. No memory is requested until the first use.
    pub const fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            current: None,
            offset: 0,
            capacity: 0,
            chunks: Vec::new(),
            stats: ArenaStats {
                chunks: 0,
                reserved_bytes: 0,
                allocated_bytes: 0,
                allocations: 0,
            },
        }
    }

    /// Returns the usage counters.
    pub fn stats(&self) -> ArenaStats {
        self.stats
    }

    /// Allocates a zeroed block of `element_size * element_count` bytes.
    pub fn allocate(&mut self, element_size: u32, element_count: u32) -> Result<NonNull<u8>> {
        let bytes = request_size(element_size, element_count)?;
        let overflow = || RtError::SizeOverflow {
            element_size,
            element_count,
        };
        let size = align_up(bytes).ok_or_else(overflow)?;
        let layout = Layout::from_size_align(size, MIN_ALIGN).map_err(|_| overflow())?;

        let ptr = if size > self.chunk_size / 2 {
            // Large requests get their own chunk; the bump chunk stays usable.
            crate::rt_debug!("arena: dedicated chunk of {size} bytes");
            self.reserve(layout)?
        } else {
            self.bump(size)?
        };

        self.stats.allocations += 1;
        self.stats.allocated_bytes += bytes;
        crate::rt_trace!("allocate {element_size} x {element_count} -> {ptr:p}");
        Ok(ptr)
    }

    /// Carves `size` bytes (already aligned) out of the current chunk.
    fn bump(&mut self, size: usize) -> Result<NonNull<u8>> {
        let base = match self.current {
            Some(base) if self.capacity - self.offset >= size => base,
            _ => self.grow()?,
        };
        // SAFETY: `offset + size <= capacity`, so the result stays inside the
        // chunk that `base` points to.
        let ptr = unsafe { base.add(self.offset) };
        self.offset += size;
        Ok(ptr)
    }

    /// Replaces the bump chunk with a fresh one.
    fn grow(&mut self) -> Result<NonNull<u8>> {
        let layout = Layout::from_size_align(self.chunk_size, MIN_ALIGN)
            .map_err(|_| RtError::OutOfMemory {
                bytes: self.chunk_size,
            })?;
        let base = self.reserve(layout)?;
        crate::rt_debug!(
            "arena: new {} byte chunk ({} total)",
            self.chunk_size,
            self.stats.chunks
        );
        self.current = Some(base);
        self.offset = 0;
        self.capacity = self.chunk_size;
        Ok(base)
    }

    /// Requests one zeroed chunk from the host and records it.
    fn reserve(&mut self, layout: Layout) -> Result<NonNull<u8>> {
        // SAFETY: Every layout reaching here has a non-zero size (at least
        // MIN_ALIGN bytes, or the configured chunk size).
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let base = NonNull::new(raw).ok_or(RtError::OutOfMemory {
            bytes: layout.size(),
        })?;
        self.chunks.push(Chunk { base, layout });
        self.stats.chunks += 1;
        self.stats.reserved_bytes += layout.size();
        Ok(base)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        for chunk in self.chunks.drain(..) {
            // SAFETY: Each chunk was allocated with exactly this layout and
            // is released once.
            unsafe { alloc::dealloc(chunk.base.as_ptr(), chunk.layout) };
        }
    }
}

static ARENA: ProcessCell<Arena> =
    ProcessCell::new(Arena::new(Config::from_features().chunk_size));

/// Allocates from the process-wide arena.
///
/// # Safety
///
/// Must only be called from the single program thread.
pub unsafe fn allocate(element_size: u32, element_count: u32) -> Result<NonNull<u8>> {
    // SAFETY: Forwarded to the caller; the reference does not escape.
    unsafe { ARENA.get_mut() }.allocate(element_size, element_count)
}

/// Returns the process-wide arena's counters.
///
/// # Safety
///
/// Must only be called from the single program thread.
pub unsafe fn global_stats() -> ArenaStats {
    // SAFETY: Forwarded to the caller; the reference does not escape.
    unsafe { ARENA.get_mut() }.stats()
}
