//! Error checking around driver calls.
//!
//! OpenGL reports errors through sticky flags instead of return values, so the
//! only way to pin an error on the call that caused it is to drain the flags
//! right before and right after that call. [`gl_call!`] does both.

use std::cell::Cell;

use crate::error::{DriverError, GlError};
use crate::opengl::GlDriver;

/// Upper bound on flags drained in one go. A lost context can keep reporting.
pub const MAX_QUEUED_ERRORS: usize = 64;

thread_local! {
    // A context is current on one thread, so the switch is per thread too.
    static BREAK_ON_ERROR: Cell<bool> = const { Cell::new(false) };
}

/// Panic on the first driver error reported on this thread instead of
/// returning it.
pub fn set_break_on_error(enabled: bool) {
    BREAK_ON_ERROR.with(|flag| flag.set(enabled));
}

pub fn break_on_error() -> bool {
    BREAK_ON_ERROR.with(Cell::get)
}

/// Drains every pending error flag.
pub fn clear_errors<D: GlDriver + ?Sized>(gl: &D) {
    drain(gl);
}

/// Drains the flags left behind by `call` and reports each one.
pub fn log_call<D: GlDriver + ?Sized>(
    gl: &D,
    call: &'static str,
    file: &'static str,
    line: u32,
) -> Result<(), DriverError> {
    let errors = drain(gl);
    if errors.is_empty() {
        return Ok(());
    }

    for error in &errors {
        tracing::error!(code = error.code(), %error, call, file, line, "[OpenGL Error]");
    }

    let error = DriverError {
        call,
        file,
        line,
        errors,
    };

    // Releases that run while unwinding must not panic a second time.
    if break_on_error() && !std::thread::panicking() {
        panic!("{error}");
    }

    Err(error)
}

fn drain<D: GlDriver + ?Sized>(gl: &D) -> Vec<GlError> {
    let mut errors = Vec::new();
    while errors.len() < MAX_QUEUED_ERRORS {
        match GlError::from_code(gl.get_error()) {
            Some(error) => errors.push(error),
            None => break,
        }
    }
    errors
}

/// Runs one driver call between two error checks.
///
/// Evaluates to `Result<T, DriverError>` where `T` is the value of the call.
/// The error names the call text and the source location of the macro.
///
/// ```ignore
/// gl_call!(self.gl, self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(handle)))?;
/// ```
#[macro_export]
macro_rules! gl_call {
    ($gl:expr, $call:expr) => {{
        let gl = &*$gl;
        $crate::debug::clear_errors(gl);
        let value = $call;
        $crate::debug::log_call(gl, stringify!($call), file!(), line!()).map(|()| value)
    }};
}
