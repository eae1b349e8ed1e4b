//! Sequential execution of planned runs with per-run outcome accounting.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::commands::{one_liner, ProcessCommand, Shell};
use crate::error::{SweepError, SweepResult};

/// How a launched process ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitInfo {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ExitInfo {
    pub const SUCCESS: ExitInfo = ExitInfo { code: Some(0) };

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait Launcher {
    /// Run `cmd` to completion. `Err` means the process could not be started.
    fn launch(&mut self, cmd: &ProcessCommand) -> io::Result<ExitInfo>;
}

/// Spawns each command with inherited stdio and waits for it.
#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, cmd: &ProcessCommand) -> io::Result<ExitInfo> {
        let status = cmd.to_command().status()?;
        Ok(ExitInfo {
            code: status.code(),
        })
    }
}

/// Prints the one-liner for each command instead of running it.
#[derive(Debug)]
pub struct DryRunLauncher {
    pub shell: Shell,
}

impl Launcher for DryRunLauncher {
    fn launch(&mut self, cmd: &ProcessCommand) -> io::Result<ExitInfo> {
        println!("{}", one_liner(cmd, self.shell));
        Ok(ExitInfo::SUCCESS)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlannedAction {
    Launch(ProcessCommand),
    Skip(String),
}

/// One unit of work in a sweep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedRun {
    pub label: String,
    pub config: PathBuf,
    pub action: PlannedAction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    Failed { code: Option<i32> },
    SpawnFailed { reason: String },
    Skipped { reason: String },
}

impl RunStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, RunStatus::Failed { .. } | RunStatus::SpawnFailed { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub label: String,
    pub config: PathBuf,
    #[serde(flatten)]
    pub status: RunStatus,
    pub elapsed_ms: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    pub sweep: String,
    pub runs: Vec<RunOutcome>,
    /// Set when fail-fast cut the sweep short.
    pub stopped_early: bool,
}

impl SweepSummary {
    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, RunStatus::Succeeded))
    }

    pub fn failed(&self) -> usize {
        self.count(RunStatus::is_failure)
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, RunStatus::Skipped { .. }))
    }

    fn count(&self, pred: impl Fn(&RunStatus) -> bool) -> usize {
        self.runs.iter().filter(|r| pred(&r.status)).count()
    }

    pub fn log(&self) {
        for run in &self.runs {
            let code = match &run.status {
                RunStatus::Succeeded => Some(0),
                RunStatus::Failed { code } => *code,
                _ => None,
            };
            info!(
                sweep = %self.sweep,
                config = %run.config.display(),
                status = ?run.status,
                code = ?code,
                elapsed_ms = run.elapsed_ms,
                "outcome"
            );
        }
        info!(
            sweep = %self.sweep,
            total = self.runs.len(),
            succeeded = self.succeeded(),
            failed = self.failed(),
            skipped = self.skipped(),
            stopped_early = self.stopped_early,
            "sweep finished"
        );
    }

    pub fn write_json(&self, path: &Path) -> SweepResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SweepError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| SweepError::io(path, e))
    }
}

/// Run every planned item in order. A failure is logged and the loop moves
/// on, unless `fail_fast` is set.
pub fn execute(
    sweep: &str,
    plan: Vec<PlannedRun>,
    fail_fast: bool,
    launcher: &mut dyn Launcher,
) -> SweepSummary {
    let total = plan.len();
    let mut summary = SweepSummary {
        sweep: sweep.to_string(),
        ..SweepSummary::default()
    };
    for (index, run) in plan.into_iter().enumerate() {
        let PlannedRun {
            label,
            config,
            action,
        } = run;
        let started = Instant::now();
        let status = match action {
            PlannedAction::Skip(reason) => {
                warn!(config = %config.display(), %reason, "skipping");
                RunStatus::Skipped { reason }
            }
            PlannedAction::Launch(cmd) => {
                info!(
                    index = index + 1,
                    total,
                    config = %config.display(),
                    "launching"
                );
                match launcher.launch(&cmd) {
                    Ok(exit) if exit.success() => RunStatus::Succeeded,
                    Ok(exit) => {
                        error!(config = %config.display(), code = ?exit.code, "run failed");
                        RunStatus::Failed { code: exit.code }
                    }
                    Err(err) => {
                        error!(
                            config = %config.display(),
                            program = %cmd.program.display(),
                            %err,
                            "could not start run"
                        );
                        RunStatus::SpawnFailed {
                            reason: err.to_string(),
                        }
                    }
                }
            }
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let failed = status.is_failure();
        summary.runs.push(RunOutcome {
            label,
            config,
            status,
            elapsed_ms,
        });
        if failed && fail_fast {
            summary.stopped_early = index + 1 < total;
            warn!(remaining = total - index - 1, "fail-fast: stopping sweep");
            break;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_json_is_flat() {
        let outcome = RunOutcome {
            label: "chair_0012".into(),
            config: PathBuf::from("config/ngp/chair_0012.yaml"),
            status: RunStatus::Failed { code: Some(3) },
            elapsed_ms: 12,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["code"], 3);
        assert_eq!(json["config"], "config/ngp/chair_0012.yaml");
    }
}
