//! End-to-end staging: mini subset -> OFF to OBJ -> normalization.

use std::fs;
use std::path::{Path, PathBuf};

use mesh_prep::{
    convert_off_tree, normalize_tree, select_mini_subset, SubsetOptions, TriMesh,
    NORMALIZED_EXTENT,
};

const TETRA_OFF: &str = "OFF\n4 4 0\n0 0 0\n2 0 0\n0 2 0\n0 0 2\n3 0 1 2\n3 0 1 3\n3 0 2 3\n3 1 2 3\n";

fn write_modelnet_tree(root: &Path, categories: &[(&str, usize)]) -> anyhow::Result<()> {
    for (category, count) in categories {
        let train = root.join(category).join("train");
        fs::create_dir_all(&train)?;
        fs::create_dir_all(root.join(category).join("test"))?;
        for i in 0..*count {
            fs::write(train.join(format!("{category}_{:04}.off", i + 1)), TETRA_OFF)?;
        }
    }
    Ok(())
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| p.file_name().and_then(|s| s.to_str()).map(str::to_string))
        .collect()
}

#[test]
fn seeded_subset_is_reproducible() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let src = tmp.path().join("ModelNet10");
    write_modelnet_tree(&src, &[("bathtub", 12), ("chair", 9)])?;
    let opts = SubsetOptions {
        num_per_class: 3,
        seed: Some(7),
        ..SubsetOptions::default()
    };

    let first = select_mini_subset(&src, &tmp.path().join("mini_a"), &opts)?;
    let second = select_mini_subset(&src, &tmp.path().join("mini_b"), &opts)?;

    assert_eq!(first.total_copied(), 6);
    for (a, b) in first.categories.iter().zip(&second.categories) {
        assert_eq!(a.category, b.category);
        assert_eq!(names(&a.copied), names(&b.copied));
    }
    let bathtub = &first.categories[0];
    assert_eq!(bathtub.category, "bathtub");
    assert_eq!(bathtub.available, 12);
    assert!(bathtub.copied.iter().all(|p| p.is_file()));
    Ok(())
}

#[test]
fn small_categories_are_copied_whole_and_missing_splits_skipped() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let src = tmp.path().join("ModelNet10");
    write_modelnet_tree(&src, &[("desk", 2)])?;
    fs::create_dir_all(src.join("monitor"))?;
    fs::write(src.join("README.txt"), "not a category")?;

    let report = select_mini_subset(&src, &tmp.path().join("mini"), &SubsetOptions::default())?;
    assert_eq!(report.skipped, vec!["monitor".to_string()]);
    assert_eq!(report.categories.len(), 1);
    assert_eq!(
        names(&report.categories[0].copied),
        vec!["desk_0001.off", "desk_0002.off"]
    );
    Ok(())
}

#[test]
fn conversion_then_normalization_mirrors_tree() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let repaired = tmp.path().join("repaired");
    fs::create_dir_all(repaired.join("chair"))?;
    fs::write(repaired.join("chair/chair_0001.off"), TETRA_OFF)?;
    fs::write(repaired.join("chair/chair_0002.off"), "OFF\n3 1 0\n0 0 0\n")?;

    let converted = convert_off_tree(&repaired)?;
    assert_eq!(converted.processed, 2);
    assert_eq!(converted.failed, vec![repaired.join("chair/chair_0002.off")]);
    assert!(repaired.join("chair/chair_0001.obj").is_file());
    assert!(!repaired.join("chair/chair_0002.obj").exists());

    let out = tmp.path().join("preprocessed");
    let normalized = normalize_tree(&repaired, &out)?;
    assert_eq!(normalized.succeeded(), 1);

    let mesh = TriMesh::read_obj(&out.join("chair/chair_0001.obj"))?;
    assert_eq!(mesh.faces.len(), 4);
    let (min, max) = mesh.bounding_box().expect("non-empty");
    let diag = (0..3).map(|a| (max[a] - min[a]).powi(2)).sum::<f64>().sqrt();
    assert!((diag - NORMALIZED_EXTENT).abs() < 1e-9);
    Ok(())
}

#[test]
fn corrupt_header_does_not_stop_conversion() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path();
    fs::write(root.join("a_bad.off"), "OFF\n18446744073709551615 1 0\n0 0 0\n")?;
    fs::write(root.join("b_good.off"), TETRA_OFF)?;

    let report = convert_off_tree(root)?;
    assert_eq!(report.processed, 2);
    assert_eq!(report.failed, vec![root.join("a_bad.off")]);
    assert!(root.join("b_good.obj").is_file());
    Ok(())
}
