//! Same-thread boundaries.
//!
//! Units of work are run under `catch_unwind` with `AssertUnwindSafe`: any
//! state the unit shares with its caller may be left half-updated by a fault,
//! and keeping it consistent is the caller's job.
//!
//! Nothing can be caught in builds compiled with `panic = "abort"`.

use std::panic::{self, AssertUnwindSafe};

use bulwark_types::Fault;

/// Run `work` on the current thread and return its value, or the fault it
/// raised.
pub fn catching<T>(work: impl FnOnce() -> T) -> Result<T, Fault> {
    panic::catch_unwind(AssertUnwindSafe(work)).map_err(Fault::from_panic)
}

/// Run `work` on the current thread, absorbing any panic it raises.
///
/// Returns `Ok(())` when `work` returns normally, otherwise the captured
/// fault. Never panics on the caller's behalf.
pub fn run_catching(work: impl FnOnce()) -> Result<(), Fault> {
    catching(work)
}

/// Run `work` and discard any fault it raises.
pub fn mute(work: impl FnOnce()) {
    if let Err(fault) = run_catching(work) {
        tracing::trace!(fault = %fault, "Muted fault");
    }
}
