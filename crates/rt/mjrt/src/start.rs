//! Process entry point for executables whose generated code starts at
//! `minijava_main` (Molki backend) or, with the `firm-main` feature,
//! `__MiniJava_Main__` (FIRM backend).

use core::ffi::{c_char, c_int};

unsafe extern "C" {
    /// Top-level routine emitted by the compiler for the program's `main`.
    #[cfg_attr(feature = "firm-main", link_name = "__MiniJava_Main__")]
    fn minijava_main();
}

extern "C" fn generated_entry() {
    // SAFETY: The linked program object defines `minijava_main` as a C-ABI
    // function taking no arguments and returning nothing.
    unsafe { minijava_main() }
}

/// C `main`, called by the host C runtime after process start.
///
/// Arguments and environment are not forwarded to the program.
#[unsafe(no_mangle)]
pub extern "C" fn main(_argc: c_int, _argv: *const *const c_char) -> c_int {
    mjrt_core::start::run(generated_entry)
}
