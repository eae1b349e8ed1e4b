use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cli_support::init_tracing;
use mesh_prep::convert_off_tree;

#[derive(Parser, Debug)]
#[command(name = "off2obj", about = "Write a sibling .obj for every .off under a directory")]
struct Args {
    #[arg(long, default_value = "data/ModelNet10_repaired")]
    input: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let report = convert_off_tree(&args.input)
        .with_context(|| format!("convert meshes under {}", args.input.display()))?;
    tracing::info!(
        converted = report.succeeded(),
        failed = report.failed.len(),
        "off2obj done"
    );
    Ok(())
}
