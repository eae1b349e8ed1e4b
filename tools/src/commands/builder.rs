use std::ffi::OsString;
use std::path::Path;

use run_config::ConfigKind;
use tracing::warn;

use super::common::ProcessCommand;
use crate::config::{DEFAULT_COMPARE_ARGS, DEFAULT_TRAIN_ARGS};
use crate::ToolConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    PowerShell,
    Bash,
}

impl Shell {
    fn env_kv(&self, key: &str, val: &str) -> String {
        match self {
            Shell::PowerShell => format!("$env:{key}={}", self.quote(val)),
            Shell::Bash => format!("{key}={}", self.quote(val)),
        }
    }

    fn separator(&self) -> &'static str {
        match self {
            Shell::PowerShell => "; ",
            Shell::Bash => " ",
        }
    }

    /// Quote one word so the shell passes it through unchanged.
    pub fn quote(&self, word: &str) -> String {
        if !word.is_empty() && word.chars().all(is_plain) {
            return word.to_string();
        }
        match self {
            Shell::Bash => format!("'{}'", word.replace('\'', r"'\''")),
            Shell::PowerShell => format!("'{}'", word.replace('\'', "''")),
        }
    }
}

fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '=' | ':' | ',' | '+' | '@')
}

/// Training invocation for one config file.
///
/// Each argv template entry is rendered with `${PYTHON}`, `${ENTRY}`,
/// `${CONFIG}` and `${MODEL}`. An entry that is exactly `${CONFIG}` receives
/// the path as given, without a UTF-8 round trip.
pub fn train_command(tools: &ToolConfig, kind: ConfigKind, config: &Path) -> ProcessCommand {
    let template = non_empty_or(&tools.train_args, DEFAULT_TRAIN_ARGS, "train_args");
    let python = tools.python.to_string_lossy();
    let entry = tools.model(kind).entry.to_string_lossy();
    let config_text = config.to_string_lossy();
    let args = template.iter().map(|arg| {
        if arg == "${CONFIG}" {
            return config.as_os_str().to_os_string();
        }
        OsString::from(render_template(
            arg,
            &[
                ("PYTHON", &*python),
                ("ENTRY", &*entry),
                ("CONFIG", &*config_text),
                ("MODEL", kind.as_str()),
            ],
        ))
    });
    with_env(ProcessCommand::new(&tools.python).with_args(args), tools)
}

/// Comparison invocation for one scene.
pub fn compare_command(
    tools: &ToolConfig,
    kind: ConfigKind,
    gt: &Path,
    pred: &Path,
    config: &Path,
) -> ProcessCommand {
    let template = non_empty_or(&tools.compare_args, DEFAULT_COMPARE_ARGS, "compare.args");
    let script = tools.compare_script.to_string_lossy();
    let gt = gt.to_string_lossy();
    let pred = pred.to_string_lossy();
    let config = config.to_string_lossy();
    let args = template.iter().map(|arg| {
        render_template(
            arg,
            &[
                ("SCRIPT", &*script),
                ("GT", &*gt),
                ("PRED", &*pred),
                ("CONFIG", &*config),
                ("MODEL", kind.as_str()),
            ],
        )
    });
    with_env(ProcessCommand::new(&tools.python).with_args(args), tools)
}

fn with_env(mut cmd: ProcessCommand, tools: &ToolConfig) -> ProcessCommand {
    for (key, val) in &tools.env {
        cmd = cmd.with_env(key, val);
    }
    cmd
}

fn non_empty_or(template: &[String], fallback: &[&str], field: &str) -> Vec<String> {
    if template.is_empty() {
        warn!(field, "empty argv template; falling back to the default");
        fallback.iter().map(|s| s.to_string()).collect()
    } else {
        template.to_vec()
    }
}

/// Copy-pasteable one-liner for `shell`, environment first.
pub fn one_liner(cmd: &ProcessCommand, shell: Shell) -> String {
    let program = cmd.program.to_string_lossy();
    let quoted_program = shell.quote(&program);
    let mut words = Vec::with_capacity(cmd.args.len() + 1);
    if shell == Shell::PowerShell && quoted_program != program {
        words.push(format!("& {quoted_program}"));
    } else {
        words.push(quoted_program);
    }
    words.extend(cmd.args_lossy().iter().map(|a| shell.quote(a)));
    let invocation = words.join(" ");

    if cmd.env.is_empty() {
        return invocation;
    }
    let env_parts: Vec<String> = cmd
        .env
        .iter()
        .map(|(k, v)| shell.env_kv(k, v))
        .collect();
    let sep = shell.separator();
    format!("{}{sep}{invocation}", env_parts.join(sep))
}

pub fn render_template(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, val) in replacements {
        let needle = format!("${{{}}}", key);
        out = out.replace(&needle, val);
    }
    out
}
