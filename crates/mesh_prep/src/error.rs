use std::path::PathBuf;

use thiserror::Error;

pub type MeshResult<T> = Result<T, MeshError>;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error at line {line}: {msg}")]
    Parse { line: usize, msg: String },
    #[error("face references vertex {index} but mesh has {count} vertices")]
    FaceIndex { index: usize, count: usize },
    #[error("mesh has no vertices")]
    Empty,
    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<MeshError>,
    },
}

impl MeshError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line: usize, msg: impl Into<String>) -> Self {
        MeshError::Parse {
            line,
            msg: msg.into(),
        }
    }

    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            err @ (MeshError::Io { .. } | MeshError::File { .. }) => err,
            other => MeshError::File {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }
}
