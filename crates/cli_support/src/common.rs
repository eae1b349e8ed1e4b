use std::path::PathBuf;

use clap::{Args, ValueEnum};
use run_config::ConfigKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModelArg {
    Ngp,
    Deepsdf,
}

impl From<ModelArg> for ConfigKind {
    fn from(value: ModelArg) -> Self {
        match value {
            ModelArg::Ngp => ConfigKind::Ngp,
            ModelArg::Deepsdf => ConfigKind::DeepSdf,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShellArg {
    Ps,
    Sh,
}

/// Where to read the tool config from (`sweep-tools.toml` or `$SWEEP_TOOLS_CONFIG` by default).
#[derive(Debug, Clone, Args)]
pub struct ToolConfigArgs {
    /// Explicit tool config path.
    #[arg(long)]
    pub tools_config: Option<PathBuf>,
}

/// Overrides for the data and workspace roots in the tool config.
#[derive(Debug, Clone, Args)]
pub struct RootOverrideArgs {
    /// Root of the preprocessed dataset (`<root>/<category>/<scene>.obj`).
    #[arg(long)]
    pub data_root: Option<PathBuf>,
    /// Root under which per-model run workspaces live.
    #[arg(long)]
    pub workspace_root: Option<PathBuf>,
}

/// Failure policy and reporting shared by the sweep runners.
#[derive(Debug, Clone, Args)]
pub struct DispatchArgs {
    /// Stop after the first failed run.
    #[arg(long, default_value_t = false)]
    pub fail_fast: bool,
    /// Exit non-zero if any run failed.
    #[arg(long, default_value_t = false)]
    pub strict: bool,
    /// Validate each config before launching it; invalid files are skipped.
    #[arg(long, default_value_t = false)]
    pub check: bool,
    /// Print the commands instead of running them.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    /// Write the per-run outcome summary as JSON.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct DispatchOpts {
    pub fail_fast: bool,
    pub strict: bool,
    pub check: bool,
    pub dry_run: bool,
    pub report: Option<PathBuf>,
}

impl From<&DispatchArgs> for DispatchOpts {
    fn from(args: &DispatchArgs) -> Self {
        DispatchOpts {
            fail_fast: args.fail_fast,
            strict: args.strict,
            check: args.check,
            dry_run: args.dry_run,
            report: args.report.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Probe {
        #[arg(long, value_enum)]
        model: ModelArg,
        #[command(flatten)]
        dispatch: DispatchArgs,
    }

    #[test]
    fn model_flag_maps_to_config_kind() {
        let probe = Probe::parse_from(["probe", "--model", "deepsdf", "--fail-fast"]);
        assert_eq!(ConfigKind::from(probe.model), ConfigKind::DeepSdf);
        let opts = DispatchOpts::from(&probe.dispatch);
        assert!(opts.fail_fast);
        assert!(!opts.strict);
        assert!(opts.report.is_none());
    }
}
