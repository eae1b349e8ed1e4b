//! Run the trainer once per config file in a model's config directory.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli_support::{init_tracing, DispatchArgs, DispatchOpts, ModelArg, ShellArg, ToolConfigArgs};
use run_config::ConfigKind;
use sweep_tools::dispatch::{dispatch_dir, DispatchPolicy};
use sweep_tools::{DryRunLauncher, Launcher, ProcessLauncher, ToolConfig};

#[derive(Parser, Debug)]
#[command(name = "run_sweep", about = "Train once per YAML config in a directory")]
struct Args {
    #[arg(long, value_enum)]
    model: ModelArg,
    /// Directory of run configs (defaults to the model's config_dir).
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// Shell used to print commands with --dry-run.
    #[arg(long, value_enum, default_value = "sh")]
    shell: ShellArg,
    #[command(flatten)]
    tools: ToolConfigArgs,
    #[command(flatten)]
    dispatch: DispatchArgs,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let tools = ToolConfig::load_from(args.tools.tools_config.as_deref());
    let kind = ConfigKind::from(args.model);
    let opts = DispatchOpts::from(&args.dispatch);
    let dir = args
        .config_dir
        .unwrap_or_else(|| tools.model(kind).config_dir.clone());

    let mut launcher: Box<dyn Launcher> = if opts.dry_run {
        Box::new(DryRunLauncher {
            shell: args.shell.into(),
        })
    } else {
        Box::new(ProcessLauncher)
    };
    let policy = DispatchPolicy {
        fail_fast: opts.fail_fast,
        check: opts.check,
    };
    let summary = dispatch_dir(&tools, kind, &dir, policy, launcher.as_mut())
        .with_context(|| format!("dispatch configs in {}", dir.display()))?;

    summary.log();
    if let Some(path) = &opts.report {
        summary
            .write_json(path)
            .with_context(|| format!("write report {}", path.display()))?;
    }
    if opts.strict && summary.failed() > 0 {
        bail!("{} of {} runs failed", summary.failed(), summary.runs.len());
    }
    Ok(())
}
