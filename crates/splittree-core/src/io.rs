// crates/splittree-core/src/io.rs

//! JSON persistence for sealed trees.
//!
//! Recording a run and rendering it later are separate steps in the CLI, so
//! a [`SplitTree`] can be written to and read back from a `.json` file.

use crate::tree::SplitTree;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Ensure the parent directory for a file exists (no-op if none).
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Read a tree from **JSON**.
pub fn read_tree_json<P: AsRef<Path>>(path: P) -> Result<SplitTree> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let tree = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("deserialize split tree from {}", path.display()))?;
    Ok(tree)
}

/// Write a tree to **JSON** (pretty).
pub fn write_tree_json<P: AsRef<Path>>(path: P, tree: &SplitTree) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, tree).context("serialize split tree")?;
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ExecContext, ManualClock};

    #[test]
    fn parent_dir_is_created_once_and_bare_names_pass() {
        let dir = std::env::temp_dir().join(format!("splittree-parent-{}", std::process::id()));
        let path = dir.join("a").join("b").join("out.xgml");
        ensure_parent_dir(&path).unwrap();
        assert!(dir.join("a").join("b").is_dir());
        ensure_parent_dir(&path).unwrap();
        ensure_parent_dir(Path::new("bare.json")).unwrap();
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_roundtrip() {
        let clock = ManualClock::ticking(0, 1);
        let ctx = ExecContext::new("main", &clock);
        let tree = SplitTree::sequential(&ctx, ["a", "b"]);

        let dir = std::env::temp_dir().join(format!("splittree-io-{}", std::process::id()));
        let path = dir.join("nested").join("tree.json");
        write_tree_json(&path, &tree).unwrap();
        let back = read_tree_json(&path).unwrap();
        assert_eq!(back, tree);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_tree_json("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }
}
