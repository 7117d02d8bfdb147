// crates/splittree-xgml/src/write.rs

//! XML serialization of a [`Document`].
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <section name="xgml">
//!   <attribute key="Creator" type="String">splittree</attribute>
//!   <section name="graph">
//!     ...
//! ```

use crate::document::{Document, Item, Section};
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::io::Write;

const INDENT: &str = "  ";

/// Escape text for element content and double-quoted attribute values.
fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn write_section<W: Write>(w: &mut W, section: &Section, depth: usize) -> std::io::Result<()> {
    // explicit stack: (section, next item index, depth)
    let mut stack: Vec<(&Section, usize, usize)> = vec![(section, 0, depth)];
    writeln!(w, "{}<section name=\"{}\">", INDENT.repeat(depth), escape(&section.name))?;

    while let Some((sec, next, d)) = stack.pop() {
        let Some(item) = sec.items.get(next) else {
            writeln!(w, "{}</section>", INDENT.repeat(d))?;
            continue;
        };
        stack.push((sec, next + 1, d));
        let pad = INDENT.repeat(d + 1);
        match item {
            Item::Attribute(a) => writeln!(
                w,
                "{pad}<attribute key=\"{}\" type=\"{}\">{}</attribute>",
                escape(&a.key),
                a.ty.as_str(),
                escape(&a.value)
            )?,
            Item::Section(child) => {
                writeln!(w, "{pad}<section name=\"{}\">", escape(&child.name))?;
                stack.push((child, 0, d + 1));
            }
        }
    }
    Ok(())
}

/// Write `doc` as indented XML to `out`.
pub fn write_xgml<W: Write>(doc: &Document, mut out: W) -> Result<()> {
    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>").context("write xgml header")?;
    write_section(&mut out, doc.root(), 0).context("write xgml document")?;
    out.flush().context("flush xgml output")
}

/// `doc` as an XML string.
pub fn to_xgml_string(doc: &Document) -> Result<String> {
    let mut buf = Vec::new();
    write_xgml(doc, &mut buf)?;
    String::from_utf8(buf).context("xgml output is not UTF-8")
}
