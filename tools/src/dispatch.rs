//! One training run per config file in a directory.

use std::fs;
use std::path::{Path, PathBuf};

use run_config::{ConfigKind, RunConfig};

use crate::commands::train_command;
use crate::error::{SweepError, SweepResult};
use crate::runner::{execute, Launcher, PlannedAction, PlannedRun, SweepSummary};
use crate::ToolConfig;

const CONFIG_EXTENSION: &str = "yaml";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchPolicy {
    pub fail_fast: bool,
    /// Parse and validate each file first; invalid ones are skipped.
    pub check: bool,
}

/// The `*.yaml` files directly in `dir`, sorted by file name.
///
/// Matches what a shell glob would: the extension is compared exactly, dot
/// files are left out, and symlinks count when they resolve to a file.
pub fn discover_configs(dir: &Path) -> SweepResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| SweepError::io(dir, e))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SweepError::io(dir, e))?;
        let name = entry.file_name();
        let path = dir.join(&name);
        let hidden = name.to_string_lossy().starts_with('.');
        let is_yaml = path.extension().is_some_and(|ext| ext == CONFIG_EXTENSION);
        if !hidden && is_yaml && path.is_file() {
            out.push(path);
        }
    }
    out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(out)
}

pub fn plan_dispatch(
    tools: &ToolConfig,
    kind: ConfigKind,
    configs: &[PathBuf],
    check: bool,
) -> Vec<PlannedRun> {
    configs
        .iter()
        .map(|path| {
            let label = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let action = match check.then(|| check_config(path, kind)) {
                Some(Err(err)) => PlannedAction::Skip(err.to_string()),
                _ => PlannedAction::Launch(train_command(tools, kind, path)),
            };
            PlannedRun {
                label,
                config: path.clone(),
                action,
            }
        })
        .collect()
}

pub(crate) fn check_config(path: &Path, expected: ConfigKind) -> SweepResult<()> {
    let cfg = RunConfig::load_validated(path)?;
    if cfg.kind() != expected {
        return Err(SweepError::KindMismatch {
            path: path.to_path_buf(),
            expected,
            found: cfg.kind(),
        });
    }
    Ok(())
}

/// Launch the trainer once per config in `dir`.
///
/// Only listing the directory can fail. Per-run failures are recorded in the
/// summary and, unless `policy.fail_fast` is set, do not stop the loop.
pub fn dispatch_dir(
    tools: &ToolConfig,
    kind: ConfigKind,
    dir: &Path,
    policy: DispatchPolicy,
    launcher: &mut dyn Launcher,
) -> SweepResult<SweepSummary> {
    let configs = discover_configs(dir)?;
    tracing::info!(
        model = %kind,
        dir = %dir.display(),
        count = configs.len(),
        "dispatching configs"
    );
    let plan = plan_dispatch(tools, kind, &configs, policy.check);
    Ok(execute(kind.as_str(), plan, policy.fail_fast, launcher))
}
