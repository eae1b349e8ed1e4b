use std::fs;
use std::path::{Path, PathBuf};

use run_config::ConfigKind;
use sweep_tools::ToolConfig;

fn write_temp_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("sweep-tools.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn loads_minimal_config() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_temp_config(tmp.path(), "python = \"python3\"\n");
    let cfg = ToolConfig::from_path(&path).expect("load config");
    assert_eq!(cfg.python, PathBuf::from("python3"));
    assert_eq!(cfg.train_args, vec!["${ENTRY}", "--config", "${CONFIG}"]);
    assert_eq!(cfg.model(ConfigKind::Ngp).entry, PathBuf::from("main.py"));
}

#[test]
fn model_sections_override_only_what_they_set() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_temp_config(
        tmp.path(),
        r#"
data_root = "/data/mn10"
train_args = ["-u", "${ENTRY}", "--config", "${CONFIG}"]

[env]
CUDA_VISIBLE_DEVICES = "1"

[models.deepsdf]
entry = "train_deepsdf.py"

[compare]
script = "tools/compare.py"
"#,
    );
    let cfg = ToolConfig::from_path(&path).expect("load config");
    assert_eq!(cfg.data_root, PathBuf::from("/data/mn10"));
    assert_eq!(cfg.train_args[0], "-u");
    assert_eq!(cfg.env.get("CUDA_VISIBLE_DEVICES").map(String::as_str), Some("1"));
    let deepsdf = cfg.model(ConfigKind::DeepSdf);
    assert_eq!(deepsdf.entry, PathBuf::from("train_deepsdf.py"));
    assert_eq!(deepsdf.config_dir, PathBuf::from("config/deepsdf"));
    assert_eq!(cfg.compare_script, PathBuf::from("tools/compare.py"));
}

#[test]
fn missing_or_broken_files_fall_back_to_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(ToolConfig::from_path(&tmp.path().join("absent.toml")).is_none());

    let broken = write_temp_config(tmp.path(), "unknown_key = 1\n");
    assert!(ToolConfig::from_path(&broken).is_none());
    let cfg = ToolConfig::load_from(Some(&broken));
    assert_eq!(cfg.python, PathBuf::from("python"));
}

#[test]
fn shipped_tool_config_parses() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../sweep-tools.toml");
    let cfg = ToolConfig::from_path(&path).expect("shipped config");
    assert_eq!(
        cfg.model(ConfigKind::DeepSdf).entry,
        PathBuf::from("main_deepsdf.py")
    );
    assert_eq!(
        cfg.model(ConfigKind::Ngp).template,
        PathBuf::from("config/templates/ngp.yaml")
    );
}
