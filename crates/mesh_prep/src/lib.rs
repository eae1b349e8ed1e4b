//! Mesh preparation steps that run before a training sweep.
//!
//! The pipeline mirrors how the ModelNet10 scenes are staged on disk:
//! sample a per-category subset, convert `.off` to `.obj`, then normalize
//! every mesh into the `[-1, 1]` cube.

pub mod error;
pub mod fs_walk;
pub mod mesh;
pub mod normalize;
pub mod off;
pub mod subset;

pub use error::{MeshError, MeshResult};
pub use mesh::TriMesh;
pub use normalize::{normalize_mesh, normalize_tree, NORMALIZED_EXTENT};
pub use off::{convert_off_tree, parse_off};
pub use subset::{select_mini_subset, SubsetOptions, SubsetReport};

/// Per-file outcome counts for batch steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: Vec<std::path::PathBuf>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.processed - self.failed.len()
    }
}
