//! Post-review steps: custom shell commands, staging and committing.
//!
//! All operations shell out to the system `git` binary (or the platform
//! shell), inheriting the user's git config and environment.

use std::path::PathBuf;
use std::process::{Command, Output};

use tracing::debug;

use crate::error::CommitError;

/// Side-effecting commands run after an approved review.
#[cfg_attr(test, mockall::automock)]
pub trait CommitExecutor {
    /// Run a user-configured command through the platform shell.
    fn run_command(&self, command: &str) -> Result<(), CommitError>;

    /// `git add .`
    fn stage_all(&self) -> Result<(), CommitError>;

    /// `git commit -m <message> --no-verify`
    fn commit(&self, message: &str) -> Result<(), CommitError>;
}

/// Runs commands as child processes, optionally from a fixed directory.
#[derive(Debug, Clone, Default)]
pub struct GitCommandExecutor {
    workdir: Option<PathBuf>,
}

impl GitCommandExecutor {
    /// Run in the current working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run in `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(dir.into()),
        }
    }

    fn command(&self, program: &str) -> Command {
        let mut cmd = Command::new(program);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn shell(&self, command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = self.command("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = self.command("sh");
            cmd.args(["-c", command]);
            cmd
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<(), CommitError> {
        let display = format!("git {}", args.join(" "));
        let output = self
            .command("git")
            .args(args)
            .output()
            .map_err(|source| CommitError::SpawnFailed {
                command: display.clone(),
                source,
            })?;
        check_output(display, output)
    }
}

impl CommitExecutor for GitCommandExecutor {
    fn run_command(&self, command: &str) -> Result<(), CommitError> {
        let output = self
            .shell(command)
            .output()
            .map_err(|source| CommitError::SpawnFailed {
                command: command.to_string(),
                source,
            })?;
        check_output(command.to_string(), output)
    }

    fn stage_all(&self) -> Result<(), CommitError> {
        self.run_git(&["add", "."])
    }

    fn commit(&self, message: &str) -> Result<(), CommitError> {
        self.run_git(&["commit", "-m", message, "--no-verify"])
    }
}

fn check_output(command: String, output: Output) -> Result<(), CommitError> {
    if !output.status.success() {
        return Err(CommitError::CommandFailed {
            command,
            code: output.status.code(),
            output: failure_output(&output),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!("`{}` output:\n{}", command, stdout.trim_end());
    }
    Ok(())
}

/// Stderr then stdout of a failed command, skipping empty streams.
fn failure_output(output: &Output) -> String {
    [&output.stderr, &output.stdout]
        .into_iter()
        .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
