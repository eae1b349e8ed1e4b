//! Sweep tooling around the deepsdf and ngp training entry points.
//!
//! The binaries under `src/bin` are thin clap front ends over these modules.

pub mod commands;
pub mod compare;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod generate;
pub mod runner;

pub use config::ToolConfig;
pub use error::{SweepError, SweepResult};
pub use runner::{
    DryRunLauncher, ExitInfo, Launcher, ProcessLauncher, RunOutcome, RunStatus, SweepSummary,
};

impl From<cli_support::ShellArg> for commands::Shell {
    fn from(value: cli_support::ShellArg) -> Self {
        match value {
            cli_support::ShellArg::Ps => commands::Shell::PowerShell,
            cli_support::ShellArg::Sh => commands::Shell::Bash,
        }
    }
}
