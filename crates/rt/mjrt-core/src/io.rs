//! I/O bridge: the print, write, flush and read primitives.
//!
//! [`IoBridge`] works over any reader/writer pair so the semantics can be
//! exercised against in-memory buffers. The process-wide instance wraps the
//! host's `Stdin` and `Stdout` handles and adds no buffering of its own:
//! `print_int` and `write_byte` both write into the same `Stdout` handle, so
//! interleaved calls reach the device in program order.

use std::io::{self, Read, Stdin, Stdout, Write};

use crate::cell::ProcessCell;
use crate::error::Result;

/// Value returned by the read primitive on end-of-input or error.
pub const EOF: i32 = -1;

/// Returns the low-order byte of `value`, i.e. `value mod 256` as unsigned.
#[inline]
pub const fn low_byte(value: i32) -> u8 {
    value.to_le_bytes()[0]
}

/// Maps a read outcome onto the C-ABI encoding: `0..=255` or [`EOF`].
#[inline]
pub fn encode_read(byte: Option<u8>) -> i32 {
    byte.map_or(EOF, i32::from)
}

/// Print/write/flush/read primitives over one input and one output stream.
pub struct IoBridge<R, W> {
    input: R,
    output: W,
    /// Set once the input reported end-of-stream or an error.
    exhausted: bool,
}

impl<R: Read, W: Write> IoBridge<R, W> {
    /// Creates a bridge over the given streams.
    pub const fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            exhausted: false,
        }
    }

    /// Writes the decimal form of `value` followed by `\n`.
    pub fn print_int(&mut self, value: i32) -> Result<()> {
        crate::rt_trace!("print-integer {value}");
        writeln!(self.output, "{value}")?;
        Ok(())
    }

    /// Writes the low byte of `value` as one raw byte. No formatting, no newline.
    pub fn write_byte(&mut self, value: i32) -> Result<()> {
        let byte = low_byte(value);
        crate::rt_trace!("write-byte {value} -> {byte:#04x}");
        self.output.write_all(&[byte])?;
        Ok(())
    }

    /// Delivers anything buffered in the output stream to the device.
    pub fn flush(&mut self) -> Result<()> {
        crate::rt_trace!("flush");
        self.output.flush()?;
        Ok(())
    }

    /// Blocks until one byte is available.
    ///
    /// Returns `Ok(None)` at end-of-stream. Once the stream has ended or
    /// failed, every later call returns `Ok(None)` without touching it again.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.exhausted {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(0) => {
                    crate::rt_debug!("read-byte: end of input");
                    self.exhausted = true;
                    return Ok(None);
                }
                Ok(_) => {
                    crate::rt_trace!("read-byte -> {}", buf[0]);
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.exhausted = true;
                    return Err(e.into());
                }
            }
        }
    }

    /// Returns `true` once the input has ended or failed.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Returns the output stream.
    pub fn output(&self) -> &W {
        &self.output
    }
}

/// The bridge generated code talks to.
pub type StdioBridge = IoBridge<Stdin, Stdout>;

static STDIO: ProcessCell<Option<StdioBridge>> = ProcessCell::new(None);

/// Returns the process-wide bridge over the host's standard streams.
///
/// # Safety
///
/// Must only be called from the single program thread, and the returned
/// reference must be dropped before the next call.
pub unsafe fn stdio() -> &'static mut StdioBridge {
    // SAFETY: Forwarded to the caller.
    let slot = unsafe { STDIO.get_mut() };
    slot.get_or_insert_with(|| IoBridge::new(io::stdin(), io::stdout()))
}
