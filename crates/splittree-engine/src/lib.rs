// crates/splittree-engine/src/lib.rs

//! Reference engines that drive the split-tree accumulation contract.
//!
//! The real partitioning engine is whatever the application uses; these
//! two cover the common cases:
//! - [`balanced`]: deterministic midpoint splitting with an explicit DFS,
//!   for reproducible tree shapes (tests, docs, demos).
//! - [`parallel`]: a rayon run whose splits are decided by rayon itself.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod balanced;
pub mod parallel;

pub use balanced::{inspect_balanced, BalancedOptions, BalancedSchedule, Event, Span};
pub use parallel::{inspect_par, run_par};
