// crates/splittree-render/src/lib.rs

//! Text renderings of split trees.
//!
//! - [`ascii`]: the tree shape as a box of labelled branches.
//! - [`timeline`]: when and where each leaf ran, one row per worker.
//!
//! Both are pure functions of a sealed [`splittree_core::SplitTree`]:
//! rendering the same tree twice yields identical text.

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
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod ascii;
pub mod timeline;

pub use ascii::{render_lines, render_node, render_string, AsciiDiagram};
pub use timeline::{interval_text, Strip, TimelineRenderer};
