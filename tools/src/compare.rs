//! Post-training mesh comparison, one invocation per scene.

use std::path::{Path, PathBuf};

use mesh_prep::fs_walk::{files_with_extension, subdirs};
use run_config::ConfigKind;

use crate::commands::compare_command;
use crate::dispatch::check_config;
use crate::error::{SweepError, SweepResult};
use crate::runner::{execute, Launcher, PlannedAction, PlannedRun, SweepSummary};
use crate::ToolConfig;

/// Where a trained model leaves its reconstruction.
pub fn prediction_path(workspace_root: &Path, kind: ConfigKind, scene: &str) -> PathBuf {
    workspace_root
        .join(kind.as_str())
        .join(scene)
        .join("results")
        .join("output.ply")
}

#[derive(Clone, Debug)]
pub struct CompareOptions {
    pub kind: ConfigKind,
    pub data_root: PathBuf,
    pub workspace_root: PathBuf,
    pub config_dir: PathBuf,
    /// Validate each scene config first; invalid ones are skipped.
    pub check: bool,
}

/// Plan one comparison per `<data_root>/<category>/*.obj`. Scenes with no
/// prediction or no config become skips, as do invalid configs under `check`.
pub fn plan_comparisons(tools: &ToolConfig, opts: &CompareOptions) -> SweepResult<Vec<PlannedRun>> {
    let mut plan = Vec::new();
    let categories = subdirs(&opts.data_root).map_err(|e| SweepError::io(&opts.data_root, e))?;
    for category in categories {
        let meshes =
            files_with_extension(&category, "obj").map_err(|e| SweepError::io(&category, e))?;
        for gt in meshes {
            let Some(scene) = gt.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let pred = prediction_path(&opts.workspace_root, opts.kind, &scene);
            let config = opts.config_dir.join(format!("{scene}.yaml"));
            let action = if !pred.is_file() {
                PlannedAction::Skip(format!("prediction missing: {}", pred.display()))
            } else if !config.is_file() {
                PlannedAction::Skip(format!("config missing: {}", config.display()))
            } else if let Some(Err(err)) = opts.check.then(|| check_config(&config, opts.kind)) {
                PlannedAction::Skip(format!("config invalid: {err}"))
            } else {
                PlannedAction::Launch(compare_command(tools, opts.kind, &gt, &pred, &config))
            };
            plan.push(PlannedRun {
                label: scene,
                config,
                action,
            });
        }
    }
    Ok(plan)
}

pub fn compare_sweep(
    tools: &ToolConfig,
    opts: &CompareOptions,
    fail_fast: bool,
    launcher: &mut dyn Launcher,
) -> SweepResult<SweepSummary> {
    let plan = plan_comparisons(tools, opts)?;
    tracing::info!(
        model = %opts.kind,
        scenes = plan.len(),
        data_root = %opts.data_root.display(),
        "comparing reconstructions"
    );
    Ok(execute(
        &format!("compare-{}", opts.kind),
        plan,
        fail_fast,
        launcher,
    ))
}
