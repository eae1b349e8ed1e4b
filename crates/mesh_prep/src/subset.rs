//! Per-category random subset of a ModelNet-style tree (`<root>/<category>/train/*.off`).

use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::error::{MeshError, MeshResult};
use crate::fs_walk::{files_with_extension, subdirs};

#[derive(Debug, Clone)]
pub struct SubsetOptions {
    pub num_per_class: usize,
    /// Fixed seed for a reproducible selection; `None` draws from the OS.
    pub seed: Option<u64>,
    pub split: String,
    pub extension: String,
}

impl Default for SubsetOptions {
    fn default() -> Self {
        Self {
            num_per_class: 5,
            seed: Some(42),
            split: "train".to_string(),
            extension: "off".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySelection {
    pub category: String,
    pub available: usize,
    /// Destination paths, sorted.
    pub copied: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsetReport {
    pub categories: Vec<CategorySelection>,
    /// Categories without a split directory.
    pub skipped: Vec<String>,
}

impl SubsetReport {
    pub fn total_copied(&self) -> usize {
        self.categories.iter().map(|c| c.copied.len()).sum()
    }
}

pub fn select_mini_subset(
    src_root: &Path,
    dst_root: &Path,
    opts: &SubsetOptions,
) -> MeshResult<SubsetReport> {
    fs::create_dir_all(dst_root).map_err(|e| MeshError::io(dst_root, e))?;
    let mut rng = match opts.seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_rng(&mut rand::rng()),
    };
    let mut report = SubsetReport::default();

    for category_dir in subdirs(src_root).map_err(|e| MeshError::io(src_root, e))? {
        let category = match category_dir.file_name().and_then(|s| s.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        let split_dir = category_dir.join(&opts.split);
        if !split_dir.is_dir() {
            warn!(%category, split = %opts.split, "no split directory; skipping category");
            report.skipped.push(category);
            continue;
        }
        let mut files = files_with_extension(&split_dir, &opts.extension)
            .map_err(|e| MeshError::io(&split_dir, e))?;
        let available = files.len();
        if available < opts.num_per_class {
            warn!(
                %category,
                available,
                wanted = opts.num_per_class,
                "fewer files than requested; copying all"
            );
        } else {
            files.shuffle(&mut rng);
            files.truncate(opts.num_per_class);
            files.sort();
        }

        let dst_category = dst_root.join(&category);
        fs::create_dir_all(&dst_category).map_err(|e| MeshError::io(&dst_category, e))?;
        let mut copied = Vec::with_capacity(files.len());
        for src in files {
            let Some(name) = src.file_name() else { continue };
            let dst = dst_category.join(name);
            fs::copy(&src, &dst).map_err(|e| MeshError::io(&src, e))?;
            copied.push(dst);
        }
        info!(
            %category,
            available,
            selected = copied.len(),
            dst = %dst_category.display(),
            "category sampled"
        );
        report.categories.push(CategorySelection {
            category,
            available,
            copied,
        });
    }
    Ok(report)
}
