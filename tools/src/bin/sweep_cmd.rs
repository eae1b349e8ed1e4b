//! Print the training one-liner for a config, ready to paste into a shell.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cli_support::{init_tracing, ModelArg, ShellArg, ToolConfigArgs};
use run_config::{ConfigKind, RunConfig};
use sweep_tools::commands::{one_liner, train_command};
use sweep_tools::ToolConfig;

#[derive(Parser, Debug)]
#[command(name = "sweep_cmd", about = "Print the training command for one config")]
struct Args {
    /// Model family; inferred from the config's identifier when omitted.
    #[arg(long, value_enum)]
    model: Option<ModelArg>,
    #[arg(long)]
    config: PathBuf,
    #[arg(long, value_enum, default_value = "sh", help = "Shell to target (ps|sh)")]
    shell: ShellArg,
    #[command(flatten)]
    tools: ToolConfigArgs,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let tools = ToolConfig::load_from(args.tools.tools_config.as_deref());
    let kind = match args.model {
        Some(model) => ConfigKind::from(model),
        None => RunConfig::from_path(&args.config)
            .with_context(|| format!("infer model from {}", args.config.display()))?
            .kind(),
    };
    let cmd = train_command(&tools, kind, &args.config);
    println!("{}", one_liner(&cmd, args.shell.into()));
    Ok(())
}
