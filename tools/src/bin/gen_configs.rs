//! Write one run config per preprocessed mesh, starting from a template.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cli_support::{init_tracing, ModelArg, RootOverrideArgs, ToolConfigArgs};
use run_config::ConfigKind;
use sweep_tools::generate::{generate_configs, GenerateOptions};
use sweep_tools::ToolConfig;

#[derive(Parser, Debug)]
#[command(name = "gen_configs", about = "Generate per-scene YAML configs from a template")]
struct Args {
    #[arg(long, value_enum)]
    model: ModelArg,
    /// Template config (defaults to the model's template in the tool config).
    #[arg(long)]
    template: Option<PathBuf>,
    /// Output directory (defaults to the model's config_dir).
    #[arg(long)]
    out_dir: Option<PathBuf>,
    #[command(flatten)]
    roots: RootOverrideArgs,
    #[command(flatten)]
    tools: ToolConfigArgs,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let tools = ToolConfig::load_from(args.tools.tools_config.as_deref());
    let kind = ConfigKind::from(args.model);
    let entry = tools.model(kind);
    let opts = GenerateOptions {
        kind,
        template: args.template.unwrap_or_else(|| entry.template.clone()),
        data_root: args.roots.data_root.unwrap_or_else(|| tools.data_root.clone()),
        workspace_root: args
            .roots
            .workspace_root
            .unwrap_or_else(|| tools.workspace_root.clone()),
        out_dir: args.out_dir.unwrap_or_else(|| entry.config_dir.clone()),
    };

    let generated = generate_configs(&opts)
        .with_context(|| format!("generate {kind} configs from {}", opts.template.display()))?;
    tracing::info!(
        count = generated.len(),
        out_dir = %opts.out_dir.display(),
        "configs written"
    );
    Ok(())
}
