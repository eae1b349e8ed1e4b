use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use run_config::ConfigKind;
use serde::Deserialize;
use tracing::warn;

const DEFAULT_CONFIG_NAME: &str = "sweep-tools.toml";
const CONFIG_ENV: &str = "SWEEP_TOOLS_CONFIG";

pub const DEFAULT_TRAIN_ARGS: &[&str] = &["${ENTRY}", "--config", "${CONFIG}"];
pub const DEFAULT_COMPARE_ARGS: &[&str] = &[
    "${SCRIPT}", "--gt", "${GT}", "--pred", "${PRED}", "--config", "${CONFIG}",
];

/// Entry point and config locations for one model family.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    pub entry: PathBuf,
    pub config_dir: PathBuf,
    pub template: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub python: PathBuf,
    pub data_root: PathBuf,
    pub workspace_root: PathBuf,
    /// argv template passed to `python`; see [`crate::commands::builder`] for placeholders.
    pub train_args: Vec<String>,
    /// Extra environment for every launched process.
    pub env: BTreeMap<String, String>,
    pub ngp: ModelEntry,
    pub deepsdf: ModelEntry,
    pub compare_script: PathBuf,
    pub compare_args: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            python: PathBuf::from("python"),
            data_root: PathBuf::from("data/ModelNet10_preprocessed"),
            workspace_root: PathBuf::from("workspace"),
            train_args: DEFAULT_TRAIN_ARGS.iter().map(|s| s.to_string()).collect(),
            env: BTreeMap::new(),
            ngp: default_entry(ConfigKind::Ngp),
            deepsdf: default_entry(ConfigKind::DeepSdf),
            compare_script: PathBuf::from("comparative_experiment/compare_mesh_accuracy_deepsdf.py"),
            compare_args: DEFAULT_COMPARE_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn default_entry(kind: ConfigKind) -> ModelEntry {
    let entry = match kind {
        ConfigKind::Ngp => "main.py",
        ConfigKind::DeepSdf => "main_deepsdf.py",
    };
    ModelEntry {
        entry: PathBuf::from(entry),
        config_dir: Path::new("config").join(kind.as_str()),
        template: Path::new("config/templates").join(format!("{}.yaml", kind.as_str())),
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ToolConfigFile {
    python: Option<String>,
    data_root: Option<String>,
    workspace_root: Option<String>,
    train_args: Option<Vec<String>>,
    env: Option<BTreeMap<String, String>>,
    models: Option<ModelsSection>,
    compare: Option<CompareSection>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ModelsSection {
    ngp: Option<ModelSection>,
    deepsdf: Option<ModelSection>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ModelSection {
    entry: Option<String>,
    config_dir: Option<String>,
    template: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CompareSection {
    script: Option<String>,
    args: Option<Vec<String>>,
}

impl ToolConfig {
    /// Load from `$SWEEP_TOOLS_CONFIG`, else `sweep-tools.toml`, else defaults.
    pub fn load() -> Self {
        Self::load_from(None)
    }

    /// Like [`ToolConfig::load`], with an explicit path taking precedence.
    pub fn load_from(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => std::env::var(CONFIG_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME)),
        };
        let cfg = Self::from_path(&path).unwrap_or_default();
        cfg.warn_if_invalid();
        cfg
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %path.display(), %err, "tools config unreadable; using defaults");
                return None;
            }
        };
        match toml::from_str::<ToolConfigFile>(&raw) {
            Ok(file) => Some(Self::from_file(file)),
            Err(err) => {
                warn!(path = %path.display(), %err, "tools config invalid; using defaults");
                None
            }
        }
    }

    fn from_file(file: ToolConfigFile) -> Self {
        let defaults = ToolConfig::default();
        let models = file.models.unwrap_or_default();
        let compare = file.compare.unwrap_or_default();
        ToolConfig {
            python: file
                .python
                .map(|v| expand_path(&v))
                .unwrap_or(defaults.python),
            data_root: file
                .data_root
                .map(|v| expand_path(&v))
                .unwrap_or(defaults.data_root),
            workspace_root: file
                .workspace_root
                .map(|v| expand_path(&v))
                .unwrap_or(defaults.workspace_root),
            train_args: file.train_args.unwrap_or(defaults.train_args),
            env: file.env.unwrap_or_default(),
            ngp: merge_entry(models.ngp, defaults.ngp),
            deepsdf: merge_entry(models.deepsdf, defaults.deepsdf),
            compare_script: compare
                .script
                .map(|v| expand_path(&v))
                .unwrap_or(defaults.compare_script),
            compare_args: compare.args.unwrap_or(defaults.compare_args),
        }
    }

    pub fn model(&self, kind: ConfigKind) -> &ModelEntry {
        match kind {
            ConfigKind::Ngp => &self.ngp,
            ConfigKind::DeepSdf => &self.deepsdf,
        }
    }

    fn warn_if_invalid(&self) {
        if self.python.as_os_str().is_empty() {
            warn!("tools config: python is empty; runs will fail to launch");
        }
        if !self.train_args.iter().any(|a| a.contains("${CONFIG}")) {
            warn!("tools config: train_args never references ${{CONFIG}}; every run gets the same arguments");
        }
        for kind in ConfigKind::ALL {
            if self.model(kind).entry.as_os_str().is_empty() {
                warn!(model = %kind, "tools config: entry is empty");
            }
        }
    }
}

fn merge_entry(section: Option<ModelSection>, fallback: ModelEntry) -> ModelEntry {
    let Some(section) = section else {
        return fallback;
    };
    ModelEntry {
        entry: section
            .entry
            .map(|v| expand_path(&v))
            .unwrap_or(fallback.entry),
        config_dir: section
            .config_dir
            .map(|v| expand_path(&v))
            .unwrap_or(fallback.config_dir),
        template: section
            .template
            .map(|v| expand_path(&v))
            .unwrap_or(fallback.template),
    }
}

/// Expand a leading `~` and any `${VAR}` references. Unset variables are left as written.
pub fn expand_path(raw: &str) -> PathBuf {
    let mut out = raw.to_string();
    if let Some(stripped) = out.strip_prefix('~') {
        if let Ok(home) = std::env::var("HOME") {
            out = format!("{home}{stripped}");
        }
    }
    PathBuf::from(expand_env(&out))
}

fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match std::env::var(key) {
                    Ok(val) => out.push_str(&val),
                    Err(_) => {
                        out.push_str("${");
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variables_survive_expansion() {
        assert_eq!(
            expand_env("${SWEEP_TOOLS_SURELY_UNSET_VAR}/data"),
            "${SWEEP_TOOLS_SURELY_UNSET_VAR}/data"
        );
        assert_eq!(expand_env("plain/path"), "plain/path");
        assert_eq!(expand_env("dangling/${OPEN"), "dangling/${OPEN");
    }

    #[test]
    fn defaults_point_at_both_entry_points() {
        let cfg = ToolConfig::default();
        assert_eq!(cfg.model(ConfigKind::Ngp).entry, PathBuf::from("main.py"));
        assert_eq!(
            cfg.model(ConfigKind::DeepSdf).config_dir,
            PathBuf::from("config/deepsdf")
        );
    }
}
