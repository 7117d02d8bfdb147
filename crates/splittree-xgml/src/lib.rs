// crates/splittree-xgml/src/lib.rs

//! Export split trees as XGML hierarchical graph documents.
//!
//! ```rust
//! use splittree_core::{ExecContext, ManualClock, SplitTree};
//! use splittree_xgml::{to_xgml_string, Document, XgmlConfig};
//!
//! let clock = ManualClock::new(0);
//! let ctx = ExecContext::new("main", &clock);
//! let tree = SplitTree::sequential(&ctx, 1..=3);
//! let doc = Document::from_tree(&tree, &XgmlConfig::default());
//! let xml = to_xgml_string(&doc).unwrap();
//! assert!(xml.contains("<section name=\"node\">"));
//! ```

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

pub mod config;
pub mod document;
pub mod layout;
pub mod write;

pub use config::XgmlConfig;
pub use document::{AttrType, Attribute, Document, Item, Section};
pub use layout::{layout, GraphBox};
pub use write::{to_xgml_string, write_xgml};

use anyhow::Result;
use splittree_core::SplitTree;
use std::io::Write;

/// Build the document for `tree` and write it to `out`.
pub fn export<W: Write>(tree: &SplitTree, cfg: &XgmlConfig, out: W) -> Result<()> {
    write_xgml(&Document::from_tree(tree, cfg), out)
}
