//! Minimal indexed triangle mesh with Wavefront OBJ read/write.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{MeshError, MeshResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    pub vertices: Vec<[f64; 3]>,
    /// Zero-based vertex indices.
    pub faces: Vec<[usize; 3]>,
}

impl TriMesh {
    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<([f64; 3], [f64; 3])> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        Some((min, max))
    }

    /// Push a polygon, fan-triangulating anything with more than three corners.
    pub(crate) fn push_polygon(&mut self, corners: &[usize]) {
        if corners.len() < 3 {
            return;
        }
        for i in 1..corners.len() - 1 {
            self.faces.push([corners[0], corners[i], corners[i + 1]]);
        }
    }

    pub(crate) fn check_indices(&self) -> MeshResult<()> {
        let count = self.vertices.len();
        for face in &self.faces {
            if let Some(&index) = face.iter().find(|&&i| i >= count) {
                return Err(MeshError::FaceIndex { index, count });
            }
        }
        Ok(())
    }

    pub fn parse_obj(text: &str) -> MeshResult<Self> {
        let mut mesh = TriMesh::default();
        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("v") => {
                    let mut coords = [0.0; 3];
                    for c in coords.iter_mut() {
                        let tok = tokens
                            .next()
                            .ok_or_else(|| MeshError::parse(line_no, "vertex needs 3 coordinates"))?;
                        *c = tok.parse().map_err(|_| {
                            MeshError::parse(line_no, format!("bad coordinate `{tok}`"))
                        })?;
                    }
                    mesh.vertices.push(coords);
                }
                Some("f") => {
                    let corners = tokens
                        .map(|tok| obj_index(tok, mesh.vertices.len(), line_no))
                        .collect::<MeshResult<Vec<_>>>()?;
                    if corners.len() < 3 {
                        return Err(MeshError::parse(line_no, "face needs at least 3 vertices"));
                    }
                    mesh.push_polygon(&corners);
                }
                _ => {}
            }
        }
        mesh.check_indices()?;
        Ok(mesh)
    }

    pub fn to_obj_string(&self) -> String {
        let mut out = String::with_capacity(self.vertices.len() * 32 + self.faces.len() * 24);
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "# {} vertices, {} faces",
            self.vertices.len(),
            self.faces.len()
        );
        for v in &self.vertices {
            let _ = writeln!(out, "v {} {} {}", v[0], v[1], v[2]);
        }
        for f in &self.faces {
            let _ = writeln!(out, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1);
        }
        out
    }

    pub fn read_obj(path: &Path) -> MeshResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| MeshError::io(path, e))?;
        Self::parse_obj(&text).map_err(|e| e.in_file(path))
    }

    pub fn write_obj(&self, path: &Path) -> MeshResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| MeshError::io(parent, e))?;
        }
        fs::write(path, self.to_obj_string()).map_err(|e| MeshError::io(path, e))
    }
}

/// Resolve an OBJ face token (`7`, `7/1`, `7//3`, `-1`) to a zero-based index.
fn obj_index(token: &str, vertex_count: usize, line: usize) -> MeshResult<usize> {
    let head = token.split('/').next().unwrap_or(token);
    let raw: i64 = head
        .parse()
        .map_err(|_| MeshError::parse(line, format!("bad face index `{token}`")))?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => vertex_count.checked_sub(r.unsigned_abs() as usize),
    };
    resolved.ok_or_else(|| MeshError::parse(line, format!("face index `{token}` out of range")))
}
