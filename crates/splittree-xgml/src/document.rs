// crates/splittree-xgml/src/document.rs

//! XGML document model.
//!
//! XGML nests `section` elements (named groups) and `attribute` elements
//! (typed key/value leaves). The model mirrors that shape one to one so the
//! writer stays a plain walk; it also serializes to JSON for inspection.

use crate::config::XgmlConfig;
use crate::layout::{layout, GraphBox};
use serde::Serialize;
use splittree_core::SplitTree;
use tracing::debug;

/// Value of the `Creator` attribute.
pub const CREATOR: &str = "splittree";

const LEAF_FILL: &str = "#EEDDAA";
const INTERNAL_FILL: &str = "#88CCDD";
const OUTLINE: &str = "#223344";
const SHAPE: &str = "roundrectangle";
const EDGE_FILL: &str = "#000000";
const ARROW: &str = "standard";

/// Declared attribute type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AttrType {
    /// `int`
    #[serde(rename = "int")]
    Int,
    /// `double`
    #[serde(rename = "double")]
    Double,
    /// `String`
    #[serde(rename = "String")]
    String,
}

impl AttrType {
    /// Name used in the `type` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "String",
        }
    }
}

/// Typed key/value leaf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute key.
    pub key: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: AttrType,
    /// Text value.
    pub value: String,
}

/// Child of a section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    /// Leaf value.
    Attribute(Attribute),
    /// Nested group.
    Section(Section),
}

/// Named group of items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Section name.
    pub name: String,
    /// Items in document order.
    pub items: Vec<Item>,
}

impl Section {
    /// Empty section named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Append an attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, ty: AttrType, value: impl Into<String>) -> Self {
        self.items.push(Item::Attribute(Attribute {
            key: key.to_owned(),
            ty,
            value: value.into(),
        }));
        self
    }

    /// Append a nested section.
    #[must_use]
    pub fn section(mut self, child: Self) -> Self {
        self.items.push(Item::Section(child));
        self
    }

    /// Value of the first attribute named `key`.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            Item::Attribute(a) if a.key == key => Some(a.value.as_str()),
            _ => None,
        })
    }

    /// Direct child sections named `name`, in order.
    pub fn sections<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.items.iter().filter_map(move |item| match item {
            Item::Section(s) if s.name == name => Some(s),
            _ => None,
        })
    }
}

/// Complete XGML document: root section `xgml` holding one `graph`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document {
    root: Section,
}

fn node_section(id: usize, b: &GraphBox, cfg: &XgmlConfig) -> Section {
    let fill = if b.is_leaf() { LEAF_FILL } else { INTERNAL_FILL };
    let graphics = Section::new("graphics")
        .attr("x", AttrType::Double, b.x.to_string())
        .attr("y", AttrType::Double, b.y.to_string())
        .attr("w", AttrType::Double, cfg.node_width.to_string())
        .attr("h", AttrType::Double, cfg.node_height.to_string())
        .attr("type", AttrType::String, SHAPE)
        .attr("fill", AttrType::String, fill)
        .attr("outline", AttrType::String, OUTLINE);
    Section::new("node")
        .attr("id", AttrType::Int, id.to_string())
        .attr("label", AttrType::String, b.label.as_str())
        .section(graphics)
}

fn edge_section(source: usize, target: usize) -> Section {
    let graphics = Section::new("graphics")
        .attr("fill", AttrType::String, EDGE_FILL)
        .attr("targetArrow", AttrType::String, ARROW);
    Section::new("edge")
        .attr("source", AttrType::Int, source.to_string())
        .attr("target", AttrType::Int, target.to_string())
        .section(graphics)
}

impl Document {
    /// Lay out `tree` and build its graph document.
    ///
    /// Node ids follow pre-order; all nodes precede all edges.
    #[must_use]
    pub fn from_tree(tree: &SplitTree, cfg: &XgmlConfig) -> Self {
        let boxes = layout(tree, cfg);

        let mut graph = Section::new("graph")
            .attr("hierarchic", AttrType::Int, "1")
            .attr("label", AttrType::String, "")
            .attr("directed", AttrType::Int, "1");
        for (id, b) in boxes.iter().enumerate() {
            graph = graph.section(node_section(id, b, cfg));
        }
        let mut edges = 0usize;
        for (id, (l, r)) in boxes
            .iter()
            .enumerate()
            .filter_map(|(id, b)| b.children.map(|c| (id, c)))
        {
            graph = graph.section(edge_section(id, l)).section(edge_section(id, r));
            edges += 2;
        }
        debug!(nodes = boxes.len(), edges, "xgml document built");

        let root = Section::new("xgml")
            .attr("Creator", AttrType::String, CREATOR)
            .section(graph);
        Self { root }
    }

    /// The `xgml` root section.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> &Section {
        &self.root
    }

    /// The `graph` section.
    #[must_use]
    pub fn graph(&self) -> Option<&Section> {
        self.root.sections("graph").next()
    }

    /// `node` sections in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Section> + '_ {
        self.graph().into_iter().flat_map(|g| g.sections("node"))
    }

    /// `edge` sections in document order.
    pub fn edges(&self) -> impl Iterator<Item = &Section> + '_ {
        self.graph().into_iter().flat_map(|g| g.sections("edge"))
    }

    /// JSON rendering of the document model.
    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        use anyhow::Context;
        serde_json::to_string_pretty(self).context("serialize xgml document to JSON")
    }
}
