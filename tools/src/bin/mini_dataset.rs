//! Copy a small seeded per-category subset of ModelNet10.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cli_support::init_tracing;
use mesh_prep::{select_mini_subset, SubsetOptions};

#[derive(Parser, Debug)]
#[command(name = "mini_dataset", about = "Sample N train meshes per category")]
struct Args {
    /// ModelNet10 root (`<src>/<category>/train/*.off`).
    #[arg(long, default_value = "data/ModelNet10")]
    src: PathBuf,
    #[arg(long, default_value = "data/ModelNet10_mini")]
    dst: PathBuf,
    #[arg(long, default_value_t = 5)]
    num_per_class: usize,
    /// Random seed; pass --no-seed for a fresh selection.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = false)]
    no_seed: bool,
    #[arg(long, default_value = "train")]
    split: String,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let opts = SubsetOptions {
        num_per_class: args.num_per_class,
        seed: (!args.no_seed).then_some(args.seed),
        split: args.split,
        ..SubsetOptions::default()
    };
    let report = select_mini_subset(&args.src, &args.dst, &opts)
        .with_context(|| format!("sample {} into {}", args.src.display(), args.dst.display()))?;
    tracing::info!(
        categories = report.categories.len(),
        skipped = report.skipped.len(),
        copied = report.total_copied(),
        dst = %args.dst.display(),
        "mini dataset ready"
    );
    Ok(())
}
