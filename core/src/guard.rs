//! Guards that abort the current unit of work.
//!
//! A guard raises a panic whose payload is a located [`Fault`]. The nearest
//! enclosing boundary ([`crate::run_catching`] and friends) turns it back into
//! a value. With no boundary on the stack the panic unwinds the thread as any
//! other panic would.

use std::panic;

use bulwark_types::{BoxError, Fault, FaultLocation};

/// Abort the current unit of work with `payload`.
///
/// Error values are kept as errors; `&str` and `String` become an error whose
/// message is the text. Re-raising a caught [`Fault`] keeps its original
/// location.
#[track_caller]
pub fn abort(payload: impl Into<BoxError>) -> ! {
    let fault = match payload.into().downcast::<Fault>() {
        Ok(fault) => *fault,
        Err(err) => Fault::from_error(err).with_location(FaultLocation::caller()),
    };
    panic::panic_any(fault)
}

/// Abort the current unit of work with `payload` unless `condition` holds.
#[track_caller]
pub fn assert(condition: bool, payload: impl Into<BoxError>) {
    if !condition {
        abort(payload);
    }
}

/// Abort the current unit of work if `result` is an error.
#[track_caller]
pub fn ok<E: Into<BoxError>>(result: Result<(), E>) {
    if let Err(err) = result {
        abort(err);
    }
}

/// Return the success value of `result`, or abort with its error.
///
/// Multi-value results are plain tuples: `let (a, b) = val(pair());`.
#[track_caller]
pub fn val<T, E: Into<BoxError>>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => abort(err),
    }
}

/// Abort the current unit of work with a formatted message unless the
/// condition holds. The message is only formatted on failure.
///
/// ```
/// # use bulwark_core::{ensure, run_catching};
/// let limit = 3;
/// let fault = run_catching(|| ensure!(limit > 5, "limit {limit} too low")).unwrap_err();
/// assert_eq!(fault.to_string(), "limit 3 too low");
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::abort(::std::format!($($arg)+));
        }
    };
}
