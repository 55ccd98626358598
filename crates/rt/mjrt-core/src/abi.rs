//! C-ABI symbols called by generated code.
//!
//! The FIRM backend emits calls to the `_System_*` names and
//! `__builtin_alloc_function__`; the Molki backend emits the `__stdlib_*`
//! names. Both families forward to the same bridges.
//!
//! Internal errors never cross this boundary. Write and allocation failures
//! go through the compiled-in [`FailurePolicy`](crate::config::FailurePolicy);
//! read failures become the `-1` sentinel.
//!
//! # Safety
//!
//! Every symbol here assumes the single-threaded contract: generated code
//! calls them from one thread only.

#![allow(non_snake_case)]

use core::ffi::c_void;
use core::ptr;

use crate::arena;
use crate::config::RUNTIME;
use crate::error::Result;
use crate::io::{EOF, encode_read, stdio};

// ── Output ────────────────────────────────────────────────────────────

/// `System.out.println(int)`: decimal text plus newline on stdout.
///
/// # Safety
///
/// Single program thread only.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _System_out_println(value: i32) {
    // SAFETY: Upheld by the caller.
    let result = unsafe { stdio() }.print_int(value);
    RUNTIME.policy().settle("print-integer", result, ());
}

/// `System.out.write(int)`: the low byte of `value`, raw, on stdout.
///
/// # Safety
///
/// Single program thread only.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _System_out_write(value: i32) {
    // SAFETY: Upheld by the caller.
    let result = unsafe { stdio() }.write_byte(value);
    RUNTIME.policy().settle("write-byte", result, ());
}

/// `System.out.flush()`.
///
/// # Safety
///
/// Single program thread only.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _System_out_flush() {
    // SAFETY: Upheld by the caller.
    let result = unsafe { stdio() }.flush();
    RUNTIME.policy().settle("flush", result, ());
}

// ── Input ─────────────────────────────────────────────────────────────

/// `System.in.read()`: next stdin byte as `0..=255`, or `-1`.
///
/// # Safety
///
/// Single program thread only.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _System_in_read() -> i32 {
    // SAFETY: Upheld by the caller.
    settle_read(unsafe { stdio() }.read_byte())
}

/// Read failures map onto the end-of-input sentinel under every policy.
fn settle_read(result: Result<Option<u8>>) -> i32 {
    match result {
        Ok(byte) => encode_read(byte),
        Err(err) => {
            crate::rt_error!("read-byte: {err}");
            EOF
        }
    }
}

// ── Allocation ────────────────────────────────────────────────────────

/// Zeroed block of `element_size * element_count` bytes, or null.
///
/// # Safety
///
/// Single program thread only.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __builtin_alloc_function__(
    element_size: u32,
    element_count: u32,
) -> *mut c_void {
    // SAFETY: Upheld by the caller.
    let result = unsafe { arena::allocate(element_size, element_count) };
    let handle = result.map(|block| block.as_ptr().cast::<c_void>());
    RUNTIME.policy().settle("allocate", handle, ptr::null_mut())
}

// ── Molki backend aliases ─────────────────────────────────────────────

/// Alias of [`_System_out_println`].
///
/// # Safety
///
/// Single program thread only.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __stdlib_println(value: i32) {
    // SAFETY: Upheld by the caller.
    unsafe { _System_out_println(value) }
}

/// Alias of [`_System_out_write`].
///
/// # Safety
///
/// Single program thread only.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __stdlib_write(value: i32) {
    // SAFETY: Upheld by the caller.
    unsafe { _System_out_write(value) }
}

/// Alias of [`_System_out_flush`].
///
/// # Safety
///
/// Single program thread only.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __stdlib_flush() {
    // SAFETY: Upheld by the caller.
    unsafe { _System_out_flush() }
}

/// Alias of [`_System_in_read`].
///
/// # Safety
///
/// Single program thread only.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __stdlib_read() -> i32 {
    // SAFETY: Upheld by the caller.
    unsafe { _System_in_read() }
}

/// Alias of [`__builtin_alloc_function__`].
///
/// # Safety
///
/// Single program thread only.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __stdlib_calloc(element_size: u32, element_count: u32) -> *mut c_void {
    // SAFETY: Upheld by the caller.
    unsafe { __builtin_alloc_function__(element_size, element_count) }
}
