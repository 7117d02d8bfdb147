// crates/splittree-xgml/src/config.rs

//! Export geometry and label templates.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use splittree_core::SplitNode;
use std::path::Path;

/// Box geometry and label templates of the graph export.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// node_width = 140
/// label = "%f to %l (%c)"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct XgmlConfig {
    /// Box width of every node.
    pub node_width: i32,
    /// Box height of every node.
    pub node_height: i32,
    /// Vertical step between tree levels.
    pub level_height: i32,
    /// Horizontal gutter between sibling subtrees.
    pub sibling_gap: i32,
    /// Label of non-empty nodes; `%f` first, `%l` last, `%c` count.
    pub label: String,
    /// Label of nodes that saw no element (same tokens).
    pub empty_label: String,
}

impl Default for XgmlConfig {
    fn default() -> Self {
        Self {
            node_width: 100,
            node_height: 30,
            level_height: 70,
            sibling_gap: 30,
            label: "[%f..%l]\nSize: %c".to_owned(),
            empty_label: "(empty)".to_owned(),
        }
    }
}

impl XgmlConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        toml::from_str(src).context("parse xgml config toml")
    }

    /// Read and parse a TOML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("read xgml config {}", path.display()))?;
        Self::from_toml_str(&src).with_context(|| format!("load xgml config {}", path.display()))
    }

    /// Substitute the label tokens for `node`.
    ///
    /// `%l` falls back to the first label when the node saw one element.
    #[must_use]
    pub fn label_for(&self, node: &SplitNode) -> String {
        let template = if node.is_empty() {
            &self.empty_label
        } else {
            &self.label
        };
        let first = node.first().unwrap_or("");
        let last = node.last().unwrap_or(first);
        template
            .replace("%f", first)
            .replace("%l", last)
            .replace("%c", &node.count().to_string())
    }
}
