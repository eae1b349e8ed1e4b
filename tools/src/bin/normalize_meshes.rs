use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cli_support::init_tracing;
use mesh_prep::normalize_tree;

#[derive(Parser, Debug)]
#[command(
    name = "normalize_meshes",
    about = "Center and scale every .obj into the unit cube, mirroring the tree"
)]
struct Args {
    #[arg(long, default_value = "data/ModelNet10_repaired")]
    input: PathBuf,
    #[arg(long, default_value = "data/ModelNet10_preprocessed")]
    output: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let report = normalize_tree(&args.input, &args.output)
        .with_context(|| format!("normalize {} into {}", args.input.display(), args.output.display()))?;
    tracing::info!(
        normalized = report.succeeded(),
        failed = report.failed.len(),
        output = %args.output.display(),
        "normalization done"
    );
    Ok(())
}
