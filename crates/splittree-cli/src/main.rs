// crates/splittree-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use splittree_core::{
    io::{ensure_parent_dir, read_tree_json, write_tree_json},
    MonotonicClock, SplitTree,
};
use splittree_engine::{inspect_balanced, inspect_par, BalancedOptions};
use splittree_render::{AsciiDiagram, TimelineRenderer};
use splittree_xgml::{Document, XgmlConfig};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "splittree",
    about = "Record and draw how a divide-and-conquer run split its input",
    long_about = "Record and draw how a divide-and-conquer run split its input.\n\nTrees come either from a fresh run over 0..N or from a JSON file written by `record`.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run an engine over 0..N and save the split tree as JSON
    Record {
        #[command(flatten)]
        source: Source,

        /// Output path for the tree JSON
        #[arg(long, default_value = "tree.json")]
        out: PathBuf,
    },

    /// Print the tree as an ASCII diagram
    Ascii {
        #[command(flatten)]
        source: Source,
    },

    /// Print per-worker leaf timelines
    Timeline {
        #[command(flatten)]
        source: Source,

        /// Microseconds per column (>0)
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
        quantum_us: u64,
    },

    /// Export the tree as an XGML graph document
    Xgml {
        #[command(flatten)]
        source: Source,

        /// Output path for the document
        #[arg(long, default_value = "tree.xgml")]
        out: PathBuf,

        /// TOML file overriding box geometry and label templates
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the document model as JSON instead of XML
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Where the tree comes from.
#[derive(Args, Debug)]
struct Source {
    /// Read a tree saved by `record` instead of running an engine
    #[arg(long, conflicts_with_all = ["n", "engine", "leaf_size", "workers", "threads"])]
    tree: Option<PathBuf>,

    /// Number of items 0..N to run through the engine
    #[arg(long, default_value_t = 16)]
    n: u64,

    /// Partitioning engine
    #[arg(value_enum, long, default_value_t = EngineOpt::Balanced)]
    engine: EngineOpt,

    /// Largest leaf of the balanced engine (>0)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    leaf_size: u64,

    /// Worker lanes of the balanced engine (>0)
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u64).range(1..))]
    workers: u64,

    /// Thread count of the parallel engine (0 = rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum EngineOpt {
    /// Deterministic midpoint splitting
    Balanced,
    /// rayon parallel iterator
    Parallel,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Record { source, out } => record(&source, &out),
        Cmd::Ascii { source } => ascii(&source),
        Cmd::Timeline { source, quantum_us } => timeline(&source, quantum_us),
        Cmd::Xgml {
            source,
            out,
            config,
            json,
        } => xgml(&source, &out, config.as_deref(), json),
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn load_tree(source: &Source) -> Result<SplitTree> {
    if let Some(path) = &source.tree {
        info!(path=%path.display(), "loading tree");
        return read_tree_json(path).with_context(|| format!("loading tree {}", path.display()));
    }

    let clock = MonotonicClock::new();
    let n = source.n;
    info!(n, engine=?source.engine, "running engine");
    match source.engine {
        EngineOpt::Balanced => {
            let items: Vec<u64> = (0..n).collect();
            let opts = BalancedOptions {
                leaf_size: usize::try_from(source.leaf_size).context("--leaf-size out of range")?,
                workers: usize::try_from(source.workers).context("--workers out of range")?,
            };
            inspect_balanced(&items, opts, &clock).context("balanced run failed")
        }
        EngineOpt::Parallel => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(source.threads)
                .build()
                .context("building rayon thread pool")?;
            Ok(pool.install(|| inspect_par(0..n, &clock)))
        }
    }
}

fn record(source: &Source, out: &Path) -> Result<()> {
    if source.tree.is_some() {
        bail!("`record` runs an engine; drop --tree");
    }
    let tree = load_tree(source)?;
    write_tree_json(out, &tree).with_context(|| format!("writing tree to {}", out.display()))?;
    println!(
        "Recorded {} items in {} leaves ({} nodes) → {}",
        tree.total_count(),
        tree.leaf_count(),
        tree.node_count(),
        out.display()
    );
    Ok(())
}

fn ascii(source: &Source) -> Result<()> {
    let tree = load_tree(source)?;
    let stdout = std::io::stdout();
    let mut w = stdout.lock();
    writeln!(w, "{}", AsciiDiagram(&tree)).context("writing diagram")?;
    Ok(())
}

fn timeline(source: &Source, quantum_us: u64) -> Result<()> {
    let tree = load_tree(source)?;
    let renderer = TimelineRenderer::new(Duration::from_micros(quantum_us));
    let stdout = std::io::stdout();
    let mut w = stdout.lock();
    for row in renderer.render(&tree) {
        writeln!(w, "{row}").context("writing timeline")?;
    }
    Ok(())
}

fn xgml(source: &Source, out: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let cfg = match config {
        Some(path) => XgmlConfig::load(path)?,
        None => XgmlConfig::default(),
    };
    let tree = load_tree(source)?;
    let doc = Document::from_tree(&tree, &cfg);

    ensure_parent_dir(out)?;
    let f = File::create(out).with_context(|| format!("create {}", out.display()))?;
    let mut w = BufWriter::new(f);
    if json {
        serde_json::to_writer_pretty(&mut w, &doc).context("serialize document to JSON")?;
        w.write_all(b"\n")?;
        w.flush()?;
    } else {
        splittree_xgml::write_xgml(&doc, &mut w)
            .with_context(|| format!("writing xgml to {}", out.display()))?;
    }

    info!(nodes = tree.node_count(), out=%out.display(), json, "exported graph");
    println!("Exported {} nodes → {}", tree.node_count(), out.display());
    Ok(())
}
