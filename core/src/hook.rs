//! Optional panic hook that keeps guard aborts off stderr.
//!
//! The default hook prints every panic, including the ones guards raise on
//! purpose. [`install_quiet_hook`] chains onto whatever hook is current:
//! panics carrying a guard [`Fault`] become a `tracing` trace event, every
//! other panic still reaches the previous hook. Nothing installs it
//! implicitly.

use std::panic;
use std::sync::Once;

use bulwark_types::Fault;

static INSTALL: Once = Once::new();

/// Install the quiet hook. Later calls are no-ops.
///
/// Must not be called while the current thread is panicking.
pub fn install_quiet_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if let Some(fault) = info.payload().downcast_ref::<Fault>() {
                tracing::trace!(
                    fault = %fault,
                    location = ?fault.location(),
                    "Guard aborted unit of work"
                );
                return;
            }
            previous(info);
        }));
    });
}

#[must_use]
pub fn is_quiet_hook_installed() -> bool {
    INSTALL.is_completed()
}
