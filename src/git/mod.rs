//! Version-control abstraction layer
//!
//! git-release drives the `git` command line rather than a library binding,
//! so the seam sits one level lower than usual: a [CommandRunner] executes a
//! program and hands back its status and captured output, and [GitCli]
//! turns the handful of git invocations a release needs into typed calls.
//!
//! - [system::SystemRunner]: spawns real processes in the work tree root
//! - [mock::MockRunner]: simulates a repository's branches, commits and
//!   pushes in memory for tests
//!
//! Work tree discovery is the one place that talks to libgit2 directly.
//!
//! ```rust
//! # use git_release::git::{GitCli, MockRunner};
//! let git = GitCli::new(MockRunner::new("main"));
//! let outcome = git.ensure_branch("release/v2").unwrap();
//! assert!(outcome.was_created());
//! assert_eq!(git.current_branch().unwrap(), "release/v2");
//! ```

pub mod mock;
pub mod repository;
pub mod system;

pub use mock::MockRunner;
pub use repository::GitCli;
pub use system::SystemRunner;

use crate::error::{GitReleaseError, Result};
use std::path::{Path, PathBuf};

/// Status and captured output of a finished process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output carrying `stdout`
    pub fn ok(stdout: impl Into<String>) -> Self {
        CommandOutput {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and `stderr`
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        CommandOutput {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Capability to run an external program to completion.
///
/// Implementations block until the program exits. A program that ran and
/// exited non-zero is still `Ok`; only a failure to run it at all is `Err`.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Find the root of the git work tree containing `start`.
pub fn discover_workdir(start: &Path) -> Result<PathBuf> {
    let repo = git2::Repository::discover(start)?;
    match repo.workdir() {
        Some(workdir) => Ok(workdir.to_path_buf()),
        None => Err(GitReleaseError::Repository(git2::Error::from_str(
            "bare repository has no working tree to release from",
        ))),
    }
}
