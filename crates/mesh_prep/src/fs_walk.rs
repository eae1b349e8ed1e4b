//! Deterministic directory walks. Every listing is sorted by path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// True when `path` has extension `ext`, compared case-insensitively.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Regular files directly under `dir` with the given extension.
pub fn files_with_extension(dir: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, ext) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Immediate subdirectories of `dir`.
pub fn subdirs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Files with the given extension anywhere below `root`.
///
/// Symlinked directories are not descended into; symlinked files count.
pub fn walk_files_with_extension(root: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                pending.push(path);
            } else if path.is_file() && has_extension(&path, ext) {
                out.push(path);
            }
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_is_sorted_and_case_insensitive() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::create_dir_all(root.join("a/deep")).unwrap();
        fs::write(root.join("b/two.OBJ"), "").unwrap();
        fs::write(root.join("a/deep/one.obj"), "").unwrap();
        fs::write(root.join("a/skip.off"), "").unwrap();

        let found = walk_files_with_extension(root, "obj").unwrap();
        assert_eq!(
            found,
            vec![root.join("a/deep/one.obj"), root.join("b/two.OBJ")]
        );
        assert_eq!(subdirs(root).unwrap(), vec![root.join("a"), root.join("b")]);
        assert!(files_with_extension(root, "obj").unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn walk_does_not_follow_directory_links() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("chair")).unwrap();
        fs::write(root.join("chair/chair_0001.off"), "").unwrap();
        fs::write(root.join("real.off"), "").unwrap();
        std::os::unix::fs::symlink(root, root.join("chair/loop")).unwrap();
        std::os::unix::fs::symlink(root.join("real.off"), root.join("chair/linked.off")).unwrap();

        let found = walk_files_with_extension(root, "off").unwrap();
        assert_eq!(
            found,
            vec![
                root.join("chair/chair_0001.off"),
                root.join("chair/linked.off"),
                root.join("real.off"),
            ]
        );
    }
}
