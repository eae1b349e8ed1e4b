//! Object File Format (`.off`) reader and the OFF to OBJ batch conversion.

use std::fs;
use std::path::Path;

use tracing::{error, info};

use crate::error::{MeshError, MeshResult};
use crate::fs_walk::walk_files_with_extension;
use crate::mesh::TriMesh;
use crate::BatchReport;

/// Parse OFF text. Accepts the ModelNet quirk where counts share the
/// header line (`OFF490 518 0`).
pub fn parse_off(text: &str) -> MeshResult<TriMesh> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.split('#').next().unwrap_or("").trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_no, header) = lines
        .next()
        .ok_or_else(|| MeshError::parse(1, "empty file"))?;
    let rest = header
        .strip_prefix("OFF")
        .ok_or_else(|| MeshError::parse(header_no, format!("expected OFF header, found `{header}`")))?
        .trim();
    let (counts_no, counts) = if rest.is_empty() {
        lines
            .next()
            .ok_or_else(|| MeshError::parse(header_no, "missing vertex/face counts"))?
    } else {
        (header_no, rest)
    };
    let counts = parse_numbers::<usize>(counts, counts_no)?;
    let (vertex_count, face_count) = match counts.as_slice() {
        [v, f, ..] => (*v, *f),
        _ => return Err(MeshError::parse(counts_no, "counts line needs vertex and face counts")),
    };

    // Counts come from the file; the vectors grow as lines are actually read.
    let mut mesh = TriMesh::default();
    for _ in 0..vertex_count {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| MeshError::parse(counts_no, "file ended before all vertices"))?;
        let coords = parse_numbers::<f64>(line, line_no)?;
        match coords.as_slice() {
            [x, y, z, ..] => mesh.vertices.push([*x, *y, *z]),
            _ => return Err(MeshError::parse(line_no, "vertex needs 3 coordinates")),
        }
    }
    for _ in 0..face_count {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| MeshError::parse(counts_no, "file ended before all faces"))?;
        let mut tokens = line.split_whitespace();
        let corners: usize = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| MeshError::parse(line_no, "face line needs a vertex count"))?;
        let indices = tokens
            .take(corners)
            .map(|t| {
                t.parse::<usize>()
                    .map_err(|_| MeshError::parse(line_no, format!("bad face index `{t}`")))
            })
            .collect::<MeshResult<Vec<_>>>()?;
        if indices.len() != corners || corners < 3 {
            return Err(MeshError::parse(
                line_no,
                format!("face declares {corners} vertices but lists {}", indices.len()),
            ));
        }
        mesh.push_polygon(&indices);
    }
    mesh.check_indices()?;
    Ok(mesh)
}

fn parse_numbers<T: std::str::FromStr>(line: &str, line_no: usize) -> MeshResult<Vec<T>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<T>()
                .map_err(|_| MeshError::parse(line_no, format!("bad number `{tok}`")))
        })
        .collect()
}

pub fn read_off(path: &Path) -> MeshResult<TriMesh> {
    let text = fs::read_to_string(path).map_err(|e| MeshError::io(path, e))?;
    parse_off(&text).map_err(|e| e.in_file(path))
}

/// Convert every `.off` under `root` into a sibling `.obj` with the same stem.
///
/// A file that fails to convert is logged and listed in the report; the walk continues.
pub fn convert_off_tree(root: &Path) -> MeshResult<BatchReport> {
    let files = walk_files_with_extension(root, "off").map_err(|e| MeshError::io(root, e))?;
    let mut report = BatchReport::default();
    for off_path in files {
        report.processed += 1;
        let obj_path = off_path.with_extension("obj");
        match read_off(&off_path).and_then(|mesh| mesh.write_obj(&obj_path)) {
            Ok(()) => info!(from = %off_path.display(), to = %obj_path.display(), "converted"),
            Err(err) => {
                error!(path = %off_path.display(), %err, "conversion failed");
                report.failed.push(off_path);
            }
        }
    }
    Ok(report)
}
