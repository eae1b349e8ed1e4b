//! Center meshes on their bounding box and scale them into the `[-1, 1]` cube.

use std::path::Path;

use tracing::{error, info};

use crate::error::{MeshError, MeshResult};
use crate::fs_walk::walk_files_with_extension;
use crate::mesh::TriMesh;
use crate::BatchReport;

/// Length of the bounding-box diagonal after normalization.
pub const NORMALIZED_EXTENT: f64 = 1.6;

/// Translate the bbox center to the origin and scale by `2 / diag * 0.8`.
pub fn normalize_mesh(mesh: &mut TriMesh) -> MeshResult<()> {
    let (min, max) = mesh.bounding_box().ok_or(MeshError::Empty)?;
    let center = [
        (min[0] + max[0]) / 2.0,
        (min[1] + max[1]) / 2.0,
        (min[2] + max[2]) / 2.0,
    ];
    let diag = ((max[0] - min[0]).powi(2) + (max[1] - min[1]).powi(2) + (max[2] - min[2]).powi(2))
        .sqrt();
    // A single point has no extent; centering is all that applies.
    let scale = if diag > 0.0 {
        NORMALIZED_EXTENT / diag
    } else {
        1.0
    };
    for v in mesh.vertices.iter_mut() {
        for axis in 0..3 {
            v[axis] = (v[axis] - center[axis]) * scale;
        }
    }
    Ok(())
}

/// Normalize every `.obj` under `input_root`, mirroring the tree into `output_root`.
pub fn normalize_tree(input_root: &Path, output_root: &Path) -> MeshResult<BatchReport> {
    let files =
        walk_files_with_extension(input_root, "obj").map_err(|e| MeshError::io(input_root, e))?;
    let mut report = BatchReport::default();
    for src in files {
        report.processed += 1;
        let rel = src.strip_prefix(input_root).unwrap_or(&src);
        let dst = output_root.join(rel);
        let result = TriMesh::read_obj(&src).and_then(|mut mesh| {
            normalize_mesh(&mut mesh).map_err(|e| e.in_file(&src))?;
            mesh.write_obj(&dst)
        });
        match result {
            Ok(()) => info!(from = %src.display(), to = %dst.display(), "normalized"),
            Err(err) => {
                error!(path = %src.display(), %err, "normalization failed");
                report.failed.push(src);
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_is_centered_with_fixed_diagonal() {
        let mut mesh = TriMesh {
            vertices: vec![[2.0, 2.0, 2.0], [6.0, 4.0, 2.0], [2.0, 4.0, 6.0]],
            faces: vec![[0, 1, 2]],
        };
        normalize_mesh(&mut mesh).unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        for axis in 0..3 {
            assert!((min[axis] + max[axis]).abs() < 1e-12);
        }
        let diag = ((max[0] - min[0]).powi(2) + (max[1] - min[1]).powi(2) + (max[2] - min[2]).powi(2))
            .sqrt();
        assert!((diag - NORMALIZED_EXTENT).abs() < 1e-12);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mut mesh = TriMesh::default();
        assert!(matches!(normalize_mesh(&mut mesh), Err(MeshError::Empty)));
    }
}
