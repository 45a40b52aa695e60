use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

use crate::error::BuildError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Compile,
    Test,
}

impl BuildStep {
    pub fn as_str(&self) -> &str {
        match self {
            BuildStep::Compile => "compile",
            BuildStep::Test => "test",
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One external command, with the extra environment it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub step: BuildStep,
    pub command: Vec<String>,
    pub env: Vec<(String, String)>,
}

pub trait BuildRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), BuildError>;
}

/// Runs invocations as child processes in the project directory. Output
/// is inherited so the operator sees compiler and test output as-is.
pub struct CommandRunner {
    working_dir: PathBuf,
}

impl CommandRunner {
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }
}

impl BuildRunner for CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), BuildError> {
        let (program, args) =
            invocation
                .command
                .split_first()
                .ok_or_else(|| BuildError::EmptyCommand {
                    step: invocation.step.to_string(),
                })?;

        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&self.working_dir);
        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }

        info!(step = %invocation.step, command = %invocation.command.join(" "), "running");

        let status = cmd.status().map_err(|source| BuildError::Spawn {
            step: invocation.step.to_string(),
            program: program.clone(),
            source,
        })?;

        if !status.success() {
            return Err(BuildError::Failed {
                step: invocation.step.to_string(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}

/// Renders system properties as `-Dkey=value` and appends them to
/// whatever the variable already holds.
pub fn jvm_args(existing: Option<&str>, properties: &BTreeMap<String, String>) -> String {
    let mut args: Vec<String> = existing
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| vec![s.to_string()])
        .unwrap_or_default();
    args.extend(
        properties
            .iter()
            .map(|(key, value)| format!("-D{key}={value}")),
    );
    args.join(" ")
}

pub fn compile_invocation(command: &[String]) -> Invocation {
    Invocation {
        step: BuildStep::Compile,
        command: command.to_vec(),
        env: Vec::new(),
    }
}

/// The test invocation, with system properties exported through
/// `jvm_args_env`.
pub fn test_invocation(
    command: &[String],
    jvm_args_env: &str,
    existing: Option<&str>,
    properties: &BTreeMap<String, String>,
) -> Invocation {
    let env = if properties.is_empty() {
        Vec::new()
    } else {
        vec![(jvm_args_env.to_string(), jvm_args(existing, properties))]
    };

    Invocation {
        step: BuildStep::Test,
        command: command.to_vec(),
        env,
    }
}
