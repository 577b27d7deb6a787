//! Pagination module
//!
//! Tracks the page counter of an aggregation run and decides when the run
//! has seen its last page.
//!
//! # Overview
//!
//! A run stops after a page that is empty, or after the page whose index
//! equals the `totalPages` value reported by that same response. The check
//! always uses the latest response; earlier `totalPages` values are ignored.

mod types;

pub use types::{check_stop_condition, PageCursor, StopReason, StopResult};

#[cfg(test)]
mod tests;
