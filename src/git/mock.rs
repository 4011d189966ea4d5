use crate::error::Result;
use crate::git::{CommandOutput, CommandRunner};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

/// In-memory stand-in for `git` that tracks branches, commits and pushes.
///
/// Understands exactly the invocations [crate::git::GitCli] issues. Any
/// subcommand can be made to fail with [MockRunner::fail_on].
pub struct MockRunner {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    current: String,
    branches: BTreeSet<String>,
    upstreams: HashMap<String, String>,
    unfetched: HashMap<String, String>,
    failures: HashMap<String, (i32, String)>,
    calls: Vec<String>,
    commits: Vec<MockCommit>,
    pushes: Vec<String>,
}

/// A commit recorded by [MockRunner]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCommit {
    pub branch: String,
    pub message: String,
}

impl MockRunner {
    /// Create a repository with a single branch `current`, checked out
    pub fn new(current: impl Into<String>) -> Self {
        let current = current.into();
        let mut branches = BTreeSet::new();
        branches.insert(current.clone());
        MockRunner {
            state: Mutex::new(MockState {
                current,
                branches,
                ..MockState::default()
            }),
        }
    }

    /// Add an existing local branch
    pub fn with_branch(self, name: impl Into<String>) -> Self {
        self.lock().branches.insert(name.into());
        self
    }

    /// Give `branch` an upstream such as `origin/main`
    pub fn with_upstream(self, branch: impl Into<String>, upstream: impl Into<String>) -> Self {
        self.lock().upstreams.insert(branch.into(), upstream.into());
        self
    }

    /// Configure `branch` to track `remote` without a local remote-tracking
    /// ref, so `@{u}` fails to resolve while `branch.<name>.remote` is set
    pub fn with_unfetched_upstream(
        self,
        branch: impl Into<String>,
        remote: impl Into<String>,
    ) -> Self {
        self.lock().unfetched.insert(branch.into(), remote.into());
        self
    }

    /// Make every `git <subcommand>` exit with `code`
    pub fn fail_on(self, subcommand: &str, code: i32, stderr: &str) -> Self {
        self.lock()
            .failures
            .insert(subcommand.to_string(), (code, stderr.to_string()));
        self
    }

    /// Every command line run so far, e.g. `git checkout -b release/v2`
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn commits(&self) -> Vec<MockCommit> {
        self.lock().commits.clone()
    }

    pub fn pushed_branches(&self) -> Vec<String> {
        self.lock().pushes.clone()
    }

    pub fn current_branch(&self) -> String {
        self.lock().current.clone()
    }

    pub fn branches(&self) -> Vec<String> {
        self.lock().branches.iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MockState {
    /// Answer `branch.<name>.remote` and `branch.<name>.merge` lookups
    fn tracking(&self, key: &str) -> Option<String> {
        let rest = key.strip_prefix("branch.")?;
        let (branch, field) = rest.rsplit_once('.')?;
        let remote = match (self.upstreams.get(branch), self.unfetched.get(branch)) {
            (Some(upstream), _) => upstream.split('/').next()?.to_string(),
            (None, Some(remote)) => remote.clone(),
            (None, None) => return None,
        };
        match field {
            "remote" => Some(remote),
            "merge" => Some(format!("refs/heads/{}", branch)),
            _ => None,
        }
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut state = self.lock();
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        state.calls.push(line);

        if program != "git" {
            return Ok(CommandOutput::failed(127, format!("{}: not found", program)));
        }

        if let Some((code, stderr)) = args.first().and_then(|sub| state.failures.get(*sub)) {
            return Ok(CommandOutput::failed(*code, stderr.clone()));
        }

        let output = match args {
            ["rev-parse", "--abbrev-ref", "HEAD"] => {
                CommandOutput::ok(format!("{}\n", state.current))
            }
            ["rev-parse", "--abbrev-ref", "--symbolic-full-name", spec]
                if spec.ends_with("@{u}") =>
            {
                let branch = spec.trim_end_matches("@{u}");
                match state.upstreams.get(branch) {
                    Some(upstream) => CommandOutput::ok(format!("{}\n", upstream)),
                    None if state.unfetched.contains_key(branch) => CommandOutput::failed(
                        128,
                        format!(
                            "fatal: upstream branch 'refs/heads/{}' not stored as a remote-tracking branch",
                            branch
                        ),
                    ),
                    None => CommandOutput::failed(
                        128,
                        format!("fatal: no upstream configured for branch '{}'", branch),
                    ),
                }
            }
            ["config", "--get", key] => match state.tracking(key) {
                Some(value) => CommandOutput::ok(format!("{}\n", value)),
                None => CommandOutput::failed(1, ""),
            },
            ["branch", "--list", name] => {
                if state.branches.contains(*name) {
                    let marker = if state.current == *name { "*" } else { " " };
                    CommandOutput::ok(format!("{} {}\n", marker, name))
                } else {
                    CommandOutput::ok("")
                }
            }
            ["checkout", "-b", name] => {
                if state.branches.contains(*name) {
                    CommandOutput::failed(
                        128,
                        format!("fatal: a branch named '{}' already exists", name),
                    )
                } else {
                    state.branches.insert(name.to_string());
                    state.current = name.to_string();
                    CommandOutput::ok("")
                }
            }
            ["checkout", name] => {
                if state.branches.contains(*name) {
                    state.current = name.to_string();
                    CommandOutput::ok("")
                } else {
                    CommandOutput::failed(
                        1,
                        format!(
                            "error: pathspec '{}' did not match any file(s) known to git",
                            name
                        ),
                    )
                }
            }
            ["add", "-A"] => CommandOutput::ok(""),
            ["commit", "-m", message] => {
                let commit = MockCommit {
                    branch: state.current.clone(),
                    message: message.to_string(),
                };
                state.commits.push(commit);
                CommandOutput::ok("")
            }
            ["push"] => {
                let remote = state.tracking(&format!("branch.{}.remote", state.current));
                if let Some(remote) = remote {
                    let branch = state.current.clone();
                    let report = format!(
                        "To {}\n   0a1b2c3..4d5e6f7  {} -> {}\n",
                        remote, branch, branch
                    );
                    state.pushes.push(branch);
                    CommandOutput {
                        stderr: report,
                        ..CommandOutput::ok("")
                    }
                } else {
                    CommandOutput::failed(
                        128,
                        format!(
                            "fatal: The current branch {} has no upstream branch.",
                            state.current
                        ),
                    )
                }
            }
            ["push", "--set-upstream", remote, branch] => {
                state
                    .upstreams
                    .insert(branch.to_string(), format!("{}/{}", remote, branch));
                state.pushes.push(branch.to_string());
                CommandOutput {
                    stderr: format!(
                        "To {}\n * [new branch]      {} -> {}\n",
                        remote, branch, branch
                    ),
                    ..CommandOutput::ok("")
                }
            }
            _ => CommandOutput::failed(
                1,
                format!("mock git does not understand: {}", args.join(" ")),
            ),
        };

        Ok(output)
    }
}
