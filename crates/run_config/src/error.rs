use std::path::PathBuf;

use thiserror::Error;

use crate::kind::ConfigKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("config document is not a mapping")]
    NotAMapping,
    #[error("missing `identifier` field")]
    MissingIdentifier,
    #[error("unknown config identifier `{0}`")]
    UnknownIdentifier(String),
    #[error("{kind} config has wrong top-level keys (missing: {missing:?}, unexpected: {unexpected:?})")]
    KeySet {
        kind: ConfigKind,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    #[error("invalid {kind} config: {source}")]
    Invalid {
        kind: ConfigKind,
        #[source]
        source: ValidationError,
    },
    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            err @ (ConfigError::Io { .. } | ConfigError::File { .. }) => err,
            other => ConfigError::File {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("{field} = {value} is outside {range}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        range: &'static str,
    },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("local_rank {local_rank} is not below world_size {world_size}")]
    RankOutsideWorld { local_rank: u32, world_size: u32 },
    #[error("hash_grid desired_resolution {desired} is below base_resolution {base}")]
    ResolutionOrder { base: u32, desired: u32 },
}
