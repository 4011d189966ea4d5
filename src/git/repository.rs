use crate::domain::BranchOutcome;
use crate::error::{GitReleaseError, Result};
use crate::git::{CommandOutput, CommandRunner};

/// The git invocations a release needs, on top of a [CommandRunner].
///
/// Every method blocks until git exits. Any non-zero exit is turned into
/// [GitReleaseError::VersionControl] carrying the command, exit code and
/// stderr.
pub struct GitCli<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> GitCli<R> {
    pub fn new(runner: R) -> Self {
        GitCli { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        self.git_output(args).map(|output| output.stdout)
    }

    fn git_output(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.runner.run("git", args)?;
        if !output.success() {
            return Err(GitReleaseError::version_control(
                format!("git {}", args.join(" ")),
                output.status,
                output.stderr,
            ));
        }
        Ok(output)
    }

    /// Name of the checked out branch (`HEAD` when detached).
    pub fn current_branch(&self) -> Result<String> {
        Ok(self
            .git(&["rev-parse", "--abbrev-ref", "HEAD"])?
            .trim()
            .to_string())
    }

    /// Whether a local branch named exactly `name` exists.
    ///
    /// `git branch --list` treats its argument as a pattern, so the listed
    /// names are compared against `name` instead of trusting non-empty output.
    pub fn branch_exists(&self, name: &str) -> Result<bool> {
        let listing = self.git(&["branch", "--list", name])?;
        Ok(listing
            .lines()
            .map(|line| line.trim_start_matches(['*', '+']).trim())
            .any(|listed| listed == name))
    }

    pub fn checkout(&self, name: &str) -> Result<()> {
        self.git(&["checkout", name]).map(drop)
    }

    /// Create `name` at the current commit and switch to it.
    pub fn create_branch(&self, name: &str) -> Result<()> {
        self.git(&["checkout", "-b", name]).map(drop)
    }

    /// Check out `name`, creating it from the current commit when missing.
    ///
    /// Calling this again with the same name only checks out.
    pub fn ensure_branch(&self, name: &str) -> Result<BranchOutcome> {
        if self.branch_exists(name)? {
            self.checkout(name)?;
            Ok(BranchOutcome::CheckedOut(name.to_string()))
        } else {
            self.create_branch(name)?;
            Ok(BranchOutcome::Created(name.to_string()))
        }
    }

    /// Stage every change in the work tree, including deletions.
    pub fn stage_all(&self) -> Result<()> {
        self.git(&["add", "-A"]).map(drop)
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.git(&["commit", "-m", message]).map(drop)
    }

    /// Upstream of `branch` (e.g. `origin/main`), if one is configured.
    ///
    /// `@{u}` only resolves once the remote-tracking ref exists locally, so a
    /// failed lookup falls back to the `branch.<name>.remote`/`.merge` keys.
    pub fn upstream(&self, branch: &str) -> Result<Option<String>> {
        let spec = format!("{}@{{u}}", branch);
        let output = self.runner.run(
            "git",
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", spec.as_str()],
        )?;
        if output.success() {
            let upstream = output.stdout.trim();
            return Ok((!upstream.is_empty()).then(|| upstream.to_string()));
        }

        let remote = self.config_value(&format!("branch.{}.remote", branch))?;
        let merge = self.config_value(&format!("branch.{}.merge", branch))?;
        Ok(remote.zip(merge).map(|(remote, merge)| {
            format!("{}/{}", remote, merge.trim_start_matches("refs/heads/"))
        }))
    }

    /// Value of a git config key, `None` when unset.
    fn config_value(&self, key: &str) -> Result<Option<String>> {
        let output = self.runner.run("git", &["config", "--get", key])?;
        match output.status {
            Some(0) => {
                let value = output.stdout.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            // `git config --get` exits 1 for a missing key
            Some(1) => Ok(None),
            _ => Err(GitReleaseError::version_control(
                format!("git config --get {}", key),
                output.status,
                output.stderr,
            )),
        }
    }

    /// Push the current branch to its configured upstream.
    ///
    /// Returns what git and the remote reported (ref updates, `remote:`
    /// lines such as pull request links), which git writes to stderr.
    pub fn push(&self) -> Result<String> {
        self.git_output(&["push"]).map(remote_report)
    }

    /// Push `branch` to `remote` and record it as the branch's upstream.
    pub fn push_set_upstream(&self, remote: &str, branch: &str) -> Result<String> {
        self.git_output(&["push", "--set-upstream", remote, branch])
            .map(remote_report)
    }
}

fn remote_report(output: CommandOutput) -> String {
    output.stderr.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRunner;

    #[test]
    fn test_current_branch_trims_output() {
        let git = GitCli::new(MockRunner::new("develop"));
        assert_eq!(git.current_branch().unwrap(), "develop");
    }

    #[test]
    fn test_branch_exists() {
        let git = GitCli::new(MockRunner::new("main").with_branch("feature/login"));
        assert!(git.branch_exists("main").unwrap());
        assert!(git.branch_exists("feature/login").unwrap());
        assert!(!git.branch_exists("release/v2").unwrap());
    }

    #[test]
    fn test_branch_exists_ignores_pattern_matches() {
        struct Listing;
        impl CommandRunner for Listing {
            fn run(&self, _program: &str, _args: &[&str]) -> Result<CommandOutput> {
                Ok(CommandOutput::ok("  release/v1\n* release/v10\n+ release/v11\n"))
            }
        }

        let git = GitCli::new(Listing);
        assert!(git.branch_exists("release/v10").unwrap());
        assert!(git.branch_exists("release/v11").unwrap());
        assert!(!git.branch_exists("release/v1*").unwrap());
    }

    #[test]
    fn test_ensure_branch_creates_missing_branch() {
        let git = GitCli::new(MockRunner::new("main"));
        let outcome = git.ensure_branch("release/v2").unwrap();

        assert_eq!(outcome, BranchOutcome::Created("release/v2".to_string()));
        assert_eq!(git.current_branch().unwrap(), "release/v2");
        assert!(git
            .runner()
            .calls()
            .contains(&"git checkout -b release/v2".to_string()));
    }

    #[test]
    fn test_ensure_branch_is_idempotent() {
        let git = GitCli::new(MockRunner::new("main"));

        let first = git.ensure_branch("release/v2").unwrap();
        let second = git.ensure_branch("release/v2").unwrap();

        assert!(first.was_created());
        assert_eq!(second, BranchOutcome::CheckedOut("release/v2".to_string()));
        assert_eq!(git.current_branch().unwrap(), "release/v2");

        let creations = git
            .runner()
            .calls()
            .iter()
            .filter(|call| call.starts_with("git checkout -b"))
            .count();
        assert_eq!(creations, 1);
    }

    #[test]
    fn test_ensure_branch_checks_out_existing_branch() {
        let git = GitCli::new(MockRunner::new("main").with_branch("develop"));
        let outcome = git.ensure_branch("develop").unwrap();
        assert_eq!(outcome, BranchOutcome::CheckedOut("develop".to_string()));
        assert_eq!(git.current_branch().unwrap(), "develop");
    }

    #[test]
    fn test_failed_command_carries_exit_code_and_stderr() {
        let git = GitCli::new(MockRunner::new("main").fail_on("commit", 1, "nothing to commit"));
        let err = git.commit("release").unwrap_err();
        match err {
            GitReleaseError::VersionControl {
                command,
                code,
                stderr,
            } => {
                assert_eq!(command, "git commit -m release");
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "nothing to commit");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_upstream_absent_and_present() {
        let git = GitCli::new(MockRunner::new("main").with_branch("develop"));
        assert_eq!(git.upstream("main").unwrap(), None);

        let git = GitCli::new(
            MockRunner::new("main")
                .with_branch("develop")
                .with_upstream("develop", "origin/develop"),
        );
        assert_eq!(git.upstream("main").unwrap(), None);
        assert_eq!(
            git.upstream("develop").unwrap(),
            Some("origin/develop".to_string())
        );
    }

    #[test]
    fn test_upstream_configured_but_not_fetched() {
        let git = GitCli::new(
            MockRunner::new("main")
                .with_branch("develop")
                .with_unfetched_upstream("develop", "fork"),
        );
        assert_eq!(
            git.upstream("develop").unwrap(),
            Some("fork/develop".to_string())
        );
        assert!(git
            .runner()
            .calls()
            .contains(&"git config --get branch.develop.remote".to_string()));
    }

    #[test]
    fn test_push_returns_remote_report() {
        let git = GitCli::new(MockRunner::new("main").with_upstream("main", "origin/main"));
        let report = git.push().unwrap();
        assert!(report.starts_with("To origin"), "got: {}", report);
        assert!(report.ends_with("main -> main"), "got: {}", report);
    }

    #[test]
    fn test_push_set_upstream_records_tracking() {
        let git = GitCli::new(MockRunner::new("main"));
        let report = git.push_set_upstream("origin", "main").unwrap();
        assert!(report.contains("[new branch]"), "got: {}", report);
        assert_eq!(git.upstream("main").unwrap(), Some("origin/main".to_string()));
        assert_eq!(git.runner().pushed_branches(), vec!["main".to_string()]);
    }
}
