//! Run the mesh comparison script for every trained scene.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli_support::{
    init_tracing, DispatchArgs, DispatchOpts, ModelArg, RootOverrideArgs, ShellArg, ToolConfigArgs,
};
use run_config::ConfigKind;
use sweep_tools::compare::{compare_sweep, CompareOptions};
use sweep_tools::{DryRunLauncher, Launcher, ProcessLauncher, ToolConfig};

#[derive(Parser, Debug)]
#[command(
    name = "compare_sweep",
    about = "Compare reconstructions against ground-truth meshes, one scene at a time"
)]
struct Args {
    #[arg(long, value_enum, default_value = "deepsdf")]
    model: ModelArg,
    /// Directory holding the per-scene run configs.
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// Comparison script (overrides the tool config).
    #[arg(long)]
    script: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "sh")]
    shell: ShellArg,
    #[command(flatten)]
    roots: RootOverrideArgs,
    #[command(flatten)]
    tools: ToolConfigArgs,
    #[command(flatten)]
    dispatch: DispatchArgs,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut tools = ToolConfig::load_from(args.tools.tools_config.as_deref());
    if let Some(script) = args.script {
        tools.compare_script = script;
    }
    let kind = ConfigKind::from(args.model);
    let opts = DispatchOpts::from(&args.dispatch);
    let compare = CompareOptions {
        kind,
        data_root: args.roots.data_root.unwrap_or_else(|| tools.data_root.clone()),
        workspace_root: args
            .roots
            .workspace_root
            .unwrap_or_else(|| tools.workspace_root.clone()),
        config_dir: args
            .config_dir
            .unwrap_or_else(|| tools.model(kind).config_dir.clone()),
        check: opts.check,
    };

    let mut launcher: Box<dyn Launcher> = if opts.dry_run {
        Box::new(DryRunLauncher {
            shell: args.shell.into(),
        })
    } else {
        Box::new(ProcessLauncher)
    };
    let summary = compare_sweep(&tools, &compare, opts.fail_fast, launcher.as_mut())
        .with_context(|| format!("plan comparisons under {}", compare.data_root.display()))?;

    summary.log();
    if let Some(path) = &opts.report {
        summary
            .write_json(path)
            .with_context(|| format!("write report {}", path.display()))?;
    }
    if opts.strict && summary.failed() > 0 {
        bail!("{} of {} comparisons failed", summary.failed(), summary.runs.len());
    }
    Ok(())
}
