//! Adapter utilities for the `tablesource` crate.
//!
//! The `tablesource` crate owns rows and delivers windows to viewers, but leaves the choice of
//! each viewer's range to the UI. This crate provides small, framework-neutral helpers for
//! that side:
//!
//! - Fixed-row-height viewport math (scroll offset → visible/rendered row range)
//! - A controller that reports a viewer's range whenever its viewport changes
//! - Row anchoring (keep the viewport on the same row across inserts)
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod controller;
mod viewport;

#[cfg(test)]
mod tests;

pub use anchor::{RowAnchor, apply_anchor, capture_first_visible_anchor};
pub use controller::ViewerController;
pub use viewport::{Align, RowViewport};
