//! Process-scoped state for a single-threaded runtime.
//!
//! Generated code runs on exactly one thread for the whole process lifetime,
//! so the runtime's two pieces of global state (the stdio bridge and the
//! allocation arena) live in a [`ProcessCell`] instead of behind a lock.

use core::cell::UnsafeCell;

/// A global cell whose contents are only touched from the program thread.
pub struct ProcessCell<T> {
    inner: UnsafeCell<T>,
}

// SAFETY: The runtime contract allows exactly one thread of execution to call
// into the bridges. Every access goes through the `unsafe` `get_mut`, whose
// callers uphold that contract.
unsafe impl<T> Sync for ProcessCell<T> {}

impl<T> ProcessCell<T> {
    /// Creates a new cell.
    pub const fn new(value: T) -> Self {
        Self {
            inner: UnsafeCell::new(value),
        }
    }

    /// Returns exclusive access to the contents.
    ///
    /// # Safety
    ///
    /// The caller must be on the single program thread and must not hold
    /// another reference obtained from this cell.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn get_mut(&self) -> &mut T {
        // SAFETY: Exclusivity is guaranteed by the caller.
        unsafe { &mut *self.inner.get() }
    }
}
