//! Fault barriers for Bulwark.
//!
//! Guards ([`assert`], [`ok`], [`val`], [`ensure!`]) abort the current unit
//! of work by panicking with a located [`Fault`]. Boundaries turn those
//! aborts, and any other panic, back into ordinary values:
//!
//! - [`run_catching`] / [`catching`]: same thread, returns the fault
//! - [`mute`]: same thread, discards the fault
//! - [`spawn_catching`]: detached thread, fault absorbed
//! - [`run_all_catching`]: one thread per unit, joins all, returns every fault
//! - [`task`]: the same boundaries for futures on a tokio runtime
//!
//! A guard with no boundary above it unwinds its thread like any other
//! panic. That is the top-level contract; nothing suppresses it implicitly.

mod barrier;
mod boundary;
mod guard;
pub mod hook;
pub mod task;

pub use barrier::{Barrier, Work, run_all_catching, spawn_catching, work};
pub use boundary::{catching, mute, run_catching};
pub use guard::{abort, assert, ok, val};
pub use hook::install_quiet_hook;

pub use bulwark_config::BarrierConfig;
pub use bulwark_types::{BoxError, Fault, FaultKind, FaultLocation, FaultSet, IndexedFault};
