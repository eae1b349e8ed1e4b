//! Per-scene run configs rendered from a template.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use mesh_prep::fs_walk::walk_files_with_extension;
use run_config::{ConfigKind, RunConfig};
use tracing::{info, warn};

use crate::error::{SweepError, SweepResult};

#[derive(Clone, Debug)]
pub struct GenerateOptions {
    pub kind: ConfigKind,
    pub template: PathBuf,
    pub data_root: PathBuf,
    pub workspace_root: PathBuf,
    pub out_dir: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedConfig {
    pub scene: String,
    pub path: PathBuf,
    pub workspace: String,
    pub dataset_path: String,
}

/// Replace the `workspace:` and `dataset_path:` lines of `template`, keeping
/// their indentation. Every other line is copied as is.
pub fn render_scene_config(
    template: &str,
    workspace: &str,
    dataset_path: &str,
) -> SweepResult<String> {
    let mut out = String::with_capacity(template.len() + 64);
    let mut seen_workspace = false;
    let mut seen_dataset = false;
    for line in template.split_inclusive('\n') {
        let body = line.trim_start();
        let indent = &line[..line.len() - body.len()];
        if body.starts_with("workspace:") {
            out.push_str(&format!("{indent}workspace: {workspace}\n"));
            seen_workspace = true;
        } else if body.starts_with("dataset_path:") {
            out.push_str(&format!("{indent}dataset_path: {dataset_path}\n"));
            seen_dataset = true;
        } else {
            out.push_str(line);
        }
    }
    if !seen_workspace {
        return Err(SweepError::TemplateField { field: "workspace" });
    }
    if !seen_dataset {
        return Err(SweepError::TemplateField {
            field: "dataset_path",
        });
    }
    Ok(out)
}

fn slash_path(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    match text.trim_end_matches('/') {
        "" if text.starts_with('/') => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Write `<out_dir>/<stem>.yaml` for every `.obj` below the data root.
///
/// Each rendered document must parse as a config of `opts.kind` and validate
/// before it is written.
pub fn generate_configs(opts: &GenerateOptions) -> SweepResult<Vec<GeneratedConfig>> {
    if !opts.template.is_file() {
        return Err(SweepError::MissingTemplate(opts.template.clone()));
    }
    let template =
        fs::read_to_string(&opts.template).map_err(|e| SweepError::io(&opts.template, e))?;
    let meshes = walk_files_with_extension(&opts.data_root, "obj")
        .map_err(|e| SweepError::io(&opts.data_root, e))?;
    fs::create_dir_all(&opts.out_dir).map_err(|e| SweepError::io(&opts.out_dir, e))?;

    let data_root = slash_path(&opts.data_root);
    let workspace_root = slash_path(&opts.workspace_root);
    let mut written: HashMap<String, PathBuf> = HashMap::new();
    let mut generated = Vec::with_capacity(meshes.len());

    for mesh in meshes {
        let Some(scene) = mesh.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let relative = mesh.strip_prefix(&opts.data_root).unwrap_or(&mesh);
        let dataset_path = format!("{data_root}/{}", slash_path(relative));
        let workspace = format!("{workspace_root}/{}/{scene}", opts.kind);

        let rendered = render_scene_config(&template, &workspace, &dataset_path)?;
        let cfg = RunConfig::from_yaml_str(&rendered)?;
        if cfg.kind() != opts.kind {
            return Err(SweepError::KindMismatch {
                path: opts.template.clone(),
                expected: opts.kind,
                found: cfg.kind(),
            });
        }
        cfg.validate()?;

        let path = opts.out_dir.join(format!("{scene}.yaml"));
        if let Some(previous) = written.insert(scene.clone(), mesh.clone()) {
            warn!(
                %scene,
                previous = %previous.display(),
                current = %mesh.display(),
                "scene name collides; later mesh overwrites the config"
            );
        }
        fs::write(&path, &rendered).map_err(|e| SweepError::io(&path, e))?;
        info!(config = %path.display(), %dataset_path, "generated");
        generated.push(GeneratedConfig {
            scene,
            path,
            workspace,
            dataset_path,
        });
    }
    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_path_normalises_separators() {
        assert_eq!(slash_path(Path::new("data/root/")), "data/root");
        assert_eq!(slash_path(Path::new(r"data\root")), "data/root");
    }

    #[test]
    fn template_without_dataset_line_is_rejected() {
        let err = render_scene_config("trainer:\n  workspace: x\n", "w", "d").unwrap_err();
        assert!(matches!(
            err,
            SweepError::TemplateField {
                field: "dataset_path"
            }
        ));
    }
}
