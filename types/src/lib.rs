//! Fault types for Bulwark.
//!
//! This crate holds the values that cross a fault barrier: the captured
//! [`Fault`], its [`FaultKind`] and [`FaultLocation`], and the [`FaultSet`]
//! returned by a fan-out. No IO, no threads.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod fault;
mod set;

pub use fault::{BoxError, Fault, FaultKind, FaultLocation};
pub use set::{FaultSet, IndexedFault};
