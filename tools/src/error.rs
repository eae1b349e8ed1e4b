use std::path::PathBuf;

use run_config::{ConfigError, ConfigKind};

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mesh(#[from] mesh_prep::MeshError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("template {0} does not exist")]
    MissingTemplate(PathBuf),
    #[error("template has no `{field}:` line to replace")]
    TemplateField { field: &'static str },
    #[error("{path}: identifier resolves to {found}, expected {expected}")]
    KindMismatch {
        path: PathBuf,
        expected: ConfigKind,
        found: ConfigKind,
    },
}

impl SweepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SweepError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SweepResult<T> = Result<T, SweepError>;
