use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use run_config::ConfigKind;
use sweep_tools::commands::ProcessCommand;
use sweep_tools::compare::{compare_sweep, prediction_path, CompareOptions};
use sweep_tools::{ExitInfo, Launcher, RunStatus, ToolConfig};

#[derive(Default)]
struct RecordingLauncher {
    seen: Vec<ProcessCommand>,
}

impl Launcher for RecordingLauncher {
    fn launch(&mut self, cmd: &ProcessCommand) -> io::Result<ExitInfo> {
        self.seen.push(cmd.clone());
        Ok(ExitInfo { code: Some(1) })
    }
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

struct Layout {
    _tmp: tempfile::TempDir,
    opts: CompareOptions,
}

fn layout() -> Layout {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let opts = CompareOptions {
        kind: ConfigKind::DeepSdf,
        data_root: root.join("data"),
        workspace_root: root.join("workspace"),
        config_dir: root.join("config/deepsdf"),
        check: false,
    };
    for scene in ["bathtub/bathtub_0080", "chair/chair_0012", "chair/chair_0040"] {
        touch(&opts.data_root.join(format!("{scene}.obj")));
    }
    Layout { _tmp: tmp, opts }
}

#[test]
fn scenes_missing_prediction_or_config_are_skipped() {
    let Layout { _tmp, opts } = layout();
    // bathtub_0080: complete. chair_0012: no prediction. chair_0040: no config.
    touch(&prediction_path(&opts.workspace_root, opts.kind, "bathtub_0080"));
    touch(&opts.config_dir.join("bathtub_0080.yaml"));
    touch(&opts.config_dir.join("chair_0012.yaml"));
    touch(&prediction_path(&opts.workspace_root, opts.kind, "chair_0040"));

    let mut launcher = RecordingLauncher::default();
    let summary = compare_sweep(&ToolConfig::default(), &opts, false, &mut launcher).unwrap();

    assert_eq!(launcher.seen.len(), 1);
    let args = launcher.seen[0].args_lossy();
    let gt = opts.data_root.join("bathtub/bathtub_0080.obj");
    assert_eq!(args[1], "--gt");
    assert_eq!(args[2], gt.to_string_lossy());
    assert!(args[4].ends_with("workspace/deepsdf/bathtub_0080/results/output.ply"));

    let labels: Vec<&str> = summary.runs.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["bathtub_0080", "chair_0012", "chair_0040"]);
    assert_eq!(summary.runs[0].status, RunStatus::Failed { code: Some(1) });
    match &summary.runs[1].status {
        RunStatus::Skipped { reason } => assert!(reason.starts_with("prediction missing")),
        other => panic!("unexpected status {other:?}"),
    }
    match &summary.runs[2].status {
        RunStatus::Skipped { reason } => assert!(reason.starts_with("config missing")),
        other => panic!("unexpected status {other:?}"),
    }
}

#[test]
fn check_skips_scenes_with_invalid_configs() {
    let Layout { _tmp, mut opts } = layout();
    opts.check = true;
    let shipped = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/deepsdf/bathtub_0080.yaml");
    let valid = fs::read_to_string(shipped).unwrap();
    for scene in ["bathtub_0080", "chair_0012"] {
        touch(&prediction_path(&opts.workspace_root, opts.kind, scene));
    }
    fs::create_dir_all(&opts.config_dir).unwrap();
    fs::write(opts.config_dir.join("bathtub_0080.yaml"), &valid).unwrap();
    fs::write(
        opts.config_dir.join("chair_0012.yaml"),
        valid.replace("epochs: 30", "epochs: 0"),
    )
    .unwrap();

    let mut launcher = RecordingLauncher::default();
    let summary = compare_sweep(&ToolConfig::default(), &opts, false, &mut launcher).unwrap();

    assert_eq!(launcher.seen.len(), 1);
    assert!(launcher.seen[0].args_lossy()[2].ends_with("bathtub_0080.obj"));
    match &summary.runs[1].status {
        RunStatus::Skipped { reason } => assert!(reason.starts_with("config invalid")),
        other => panic!("unexpected status {other:?}"),
    }
}

#[test]
fn prediction_layout_matches_trainer_workspace() {
    assert_eq!(
        prediction_path(Path::new("workspace"), ConfigKind::Ngp, "chair_0012"),
        PathBuf::from("workspace/ngp/chair_0012/results/output.ply")
    );
}
