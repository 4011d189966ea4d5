use crate::error::{GitReleaseError, Result};
use crate::git::{CommandOutput, CommandRunner};
use crate::ui;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs programs as real child processes inside the work tree root.
pub struct SystemRunner {
    workdir: PathBuf,
    echo: bool,
}

impl SystemRunner {
    /// Creates a runner whose commands execute in `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        SystemRunner {
            workdir: workdir.into(),
            echo: false,
        }
    }

    /// Print each command line before running it.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");

        if self.echo {
            ui::display_command(&line);
        }

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| {
                GitReleaseError::version_control(&line, None, format!("failed to start: {}", e))
            })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
