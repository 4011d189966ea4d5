//! Release workflow orchestration
//!
//! The release runs as a strictly forward sequence of stages:
//!
//! ```text
//! Start -> BranchResolved -> VersionResolved -> Committed -> Pushed -> Done
//! ```
//!
//! Branch targeting and the version bump may be skipped; every other step
//! always runs. The first failure aborts the run and nothing already done is
//! undone, so a failed push leaves the release commit in the local branch.
//!
//! Running two releases in the same work tree at the same time is not
//! supported.

use std::fmt;

use crate::domain::{BranchOutcome, BranchTarget, BumpKind, Version};
use crate::error::{GitReleaseError, Result};
use crate::git::{CommandRunner, GitCli};
use crate::manifest::ManifestStore;

/// Remote used for branches that have no upstream yet
pub const DEFAULT_REMOTE: &str = "origin";

/// Everything a single release needs to know
///
/// Built from CLI arguments by [ReleaseRequest::from_cli], or directly for
/// programmatic use without clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseRequest {
    /// Commit message for the release commit
    pub message: String,

    /// Version component to bump, if any
    pub bump: BumpKind,

    /// Branch the release commit lands on
    pub branch: BranchTarget,

    /// Remote for branches without an upstream
    pub remote: String,

    /// Report what would happen without changing anything
    pub dry_run: bool,
}

impl ReleaseRequest {
    pub fn new(message: impl Into<String>) -> Self {
        ReleaseRequest {
            message: message.into(),
            bump: BumpKind::None,
            branch: BranchTarget::current(),
            remote: DEFAULT_REMOTE.to_string(),
            dry_run: false,
        }
    }

    pub fn with_bump(mut self, bump: BumpKind) -> Self {
        self.bump = bump;
        self
    }

    pub fn on_branch(mut self, name: impl Into<String>) -> Self {
        self.branch = BranchTarget::named(name);
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate raw command line input.
    ///
    /// Two invocation styles are accepted:
    /// - `-m <message>` with at most one of `--patch`/`--minor`/`--major` and
    ///   an optional `--branch`
    /// - positional words forming the message (legacy style), which bump the
    ///   patch version unless a bump flag says otherwise and cannot target a
    ///   branch
    ///
    /// The bump flags are checked first, so conflicting flags are reported
    /// even when the message is also missing. An empty branch name means the
    /// current branch.
    pub fn from_cli(
        message: Option<String>,
        words: Vec<String>,
        patch: bool,
        minor: bool,
        major: bool,
        branch: Option<String>,
    ) -> Result<Self> {
        let bump = BumpKind::from_flags(patch, minor, major)?;
        let branch = branch.filter(|name| !name.is_empty());

        let (message, bump) = match (message, words.is_empty()) {
            (Some(_), false) => {
                return Err(GitReleaseError::usage(
                    "give the commit message either with -m/--message or as positional words, not both",
                ))
            }
            (Some(message), true) => (message, bump),
            (None, false) => {
                if branch.is_some() {
                    return Err(GitReleaseError::usage(
                        "--branch requires the commit message to be given with -m/--message",
                    ));
                }
                let bump = if bump.is_none() { BumpKind::Patch } else { bump };
                (words.join(" "), bump)
            }
            (None, true) => {
                return Err(GitReleaseError::usage(
                    "a commit message is required (-m/--message <MESSAGE>)",
                ))
            }
        };

        if message.trim().is_empty() {
            return Err(GitReleaseError::usage("commit message must not be empty"));
        }

        Ok(ReleaseRequest {
            message,
            bump,
            branch: BranchTarget::from(branch),
            remote: DEFAULT_REMOTE.to_string(),
            dry_run: false,
        })
    }
}

/// Stages of the release sequence, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReleaseStage {
    Start,
    BranchResolved,
    VersionResolved,
    Committed,
    Pushed,
    Done,
}

impl ReleaseStage {
    /// The stage after this one, `None` once done
    pub fn next(self) -> Option<Self> {
        match self {
            ReleaseStage::Start => Some(ReleaseStage::BranchResolved),
            ReleaseStage::BranchResolved => Some(ReleaseStage::VersionResolved),
            ReleaseStage::VersionResolved => Some(ReleaseStage::Committed),
            ReleaseStage::Committed => Some(ReleaseStage::Pushed),
            ReleaseStage::Pushed => Some(ReleaseStage::Done),
            ReleaseStage::Done => None,
        }
    }
}

/// Where the push step sends the branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushTarget {
    /// The branch already tracks this upstream
    Upstream(String),
    /// No upstream yet; push to `remote` and start tracking
    NewUpstream { remote: String, branch: String },
}

impl fmt::Display for PushTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushTarget::Upstream(upstream) => f.write_str(upstream),
            PushTarget::NewUpstream { remote, branch } => {
                write!(f, "{}/{} (new upstream)", remote, branch)
            }
        }
    }
}

/// Progress reported while a release runs
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseEvent {
    /// Branch checked out when the release started
    StartedOn(String),
    /// Target branch was checked out or created
    BranchReady(BranchOutcome),
    /// Dry run: the target branch would be checked out or created
    WouldPrepareBranch { name: String, exists: bool },
    /// Manifest rewritten with the new version
    VersionBumped { from: Version, to: Version },
    /// Dry run: the manifest would be rewritten
    WouldBumpVersion { from: Version, to: Version },
    /// All changes staged and committed
    Committed { branch: String, message: String },
    /// Dry run: changes would be staged and committed
    WouldCommit { branch: String, message: String },
    /// What git and the remote printed while pushing
    RemoteReport(String),
    /// Branch pushed
    Pushed { branch: String, target: PushTarget },
    /// Dry run: branch would be pushed
    WouldPush { branch: String, target: PushTarget },
}

impl ReleaseEvent {
    /// Whether the event reports a step that actually changed something
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            ReleaseEvent::BranchReady(_)
                | ReleaseEvent::VersionBumped { .. }
                | ReleaseEvent::Committed { .. }
                | ReleaseEvent::Pushed { .. }
        )
    }
}

impl fmt::Display for ReleaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseEvent::StartedOn(branch) => write!(f, "On branch {}", branch),
            ReleaseEvent::BranchReady(outcome) => write!(f, "{}", outcome),
            ReleaseEvent::WouldPrepareBranch { name, exists: true } => {
                write!(f, "Would check out existing branch: {}", name)
            }
            ReleaseEvent::WouldPrepareBranch {
                name,
                exists: false,
            } => write!(f, "Would create and check out new branch: {}", name),
            ReleaseEvent::VersionBumped { to, .. } => write!(f, "Version bumped to {}", to),
            ReleaseEvent::WouldBumpVersion { from, to } => {
                write!(f, "Would bump version from {} to {}", from, to)
            }
            ReleaseEvent::Committed { branch, message } => {
                write!(f, "Committed to {}: {}", branch, message)
            }
            ReleaseEvent::WouldCommit { branch, message } => {
                write!(f, "Would stage all changes and commit to {}: {}", branch, message)
            }
            ReleaseEvent::RemoteReport(report) => f.write_str(report),
            ReleaseEvent::Pushed { branch, target } => write!(f, "Pushed {} to {}", branch, target),
            ReleaseEvent::WouldPush { branch, target } => {
                write!(f, "Would push {} to {}", branch, target)
            }
        }
    }
}

/// Result of a completed release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// Branch the release commit landed on
    pub branch: String,

    /// Version before the bump, when one was requested
    pub previous_version: Option<Version>,

    /// Version written to the manifest, when one was requested
    pub version: Option<Version>,

    /// Whether this was only a preview
    pub dry_run: bool,

    /// Last stage reached
    pub stage: ReleaseStage,
}

impl ReleaseOutcome {
    /// One-line report for the end of the run
    pub fn summary(&self) -> String {
        match (&self.version, self.dry_run) {
            (Some(version), false) => format!("Released v{}", version),
            (None, false) => format!("Committed and pushed to {}", self.branch),
            (Some(version), true) => format!("Would release v{}", version),
            (None, true) => format!("Would commit and push to {}", self.branch),
        }
    }
}

/// Run one release from start to finish.
///
/// Reads the current branch, pre-flights the manifest when a bump is
/// requested, switches to the target branch, bumps and persists the version,
/// stages and commits everything, then pushes. Each step blocks until done.
/// Progress goes to `on_event`.
///
/// # Arguments
///
/// * `request` - Validated release request
/// * `git` - Git command layer
/// * `manifest` - Where the version lives
/// * `on_event` - Receives a [ReleaseEvent] per completed (or previewed) step
///
/// # Returns
///
/// The outcome at [ReleaseStage::Done], or the first error hit
pub fn run_release<R, M, F>(
    request: &ReleaseRequest,
    git: &GitCli<R>,
    manifest: &mut M,
    mut on_event: F,
) -> Result<ReleaseOutcome>
where
    R: CommandRunner,
    M: ManifestStore + ?Sized,
    F: FnMut(ReleaseEvent),
{
    let mut stage = ReleaseStage::Start;

    let original_branch = git.current_branch()?;
    on_event(ReleaseEvent::StartedOn(original_branch.clone()));

    // A broken manifest must stop the release before git is touched.
    let preflight = if request.bump.is_none() {
        None
    } else {
        Some(manifest.load()?)
    };

    if let Some(name) = request.branch.name() {
        if request.dry_run {
            let exists = git.branch_exists(name)?;
            on_event(ReleaseEvent::WouldPrepareBranch {
                name: name.to_string(),
                exists,
            });
        } else {
            let outcome = git.ensure_branch(name)?;
            on_event(ReleaseEvent::BranchReady(outcome));
        }
    }
    advance(&mut stage, ReleaseStage::BranchResolved);

    let mut previous_version = None;
    let mut version = None;
    if let Some(preflight) = preflight {
        // The checkout may have brought in a different manifest.
        let current = if request.dry_run {
            preflight
        } else {
            manifest.load()?
        };
        let next = current.bump(request.bump)?;

        if request.dry_run {
            on_event(ReleaseEvent::WouldBumpVersion {
                from: current,
                to: next,
            });
        } else {
            manifest.store(&next)?;
            on_event(ReleaseEvent::VersionBumped {
                from: current,
                to: next,
            });
        }
        previous_version = Some(current);
        version = Some(next);
    }
    advance(&mut stage, ReleaseStage::VersionResolved);

    let branch = request.branch.resolve(&original_branch).to_string();
    if request.dry_run {
        on_event(ReleaseEvent::WouldCommit {
            branch: branch.clone(),
            message: request.message.clone(),
        });
    } else {
        git.stage_all()?;
        git.commit(&request.message)?;
        on_event(ReleaseEvent::Committed {
            branch: branch.clone(),
            message: request.message.clone(),
        });
    }
    advance(&mut stage, ReleaseStage::Committed);

    let target = match git.upstream(&branch)? {
        Some(upstream) => PushTarget::Upstream(upstream),
        None => PushTarget::NewUpstream {
            remote: request.remote.clone(),
            branch: branch.clone(),
        },
    };
    if request.dry_run {
        on_event(ReleaseEvent::WouldPush {
            branch: branch.clone(),
            target,
        });
    } else {
        let report = match &target {
            PushTarget::Upstream(_) => git.push()?,
            PushTarget::NewUpstream { remote, branch } => git.push_set_upstream(remote, branch)?,
        };
        if !report.is_empty() {
            on_event(ReleaseEvent::RemoteReport(report));
        }
        on_event(ReleaseEvent::Pushed {
            branch: branch.clone(),
            target,
        });
    }
    advance(&mut stage, ReleaseStage::Pushed);
    advance(&mut stage, ReleaseStage::Done);

    Ok(ReleaseOutcome {
        branch,
        previous_version,
        version,
        dry_run: request.dry_run,
        stage,
    })
}

fn advance(stage: &mut ReleaseStage, to: ReleaseStage) {
    debug_assert_eq!(stage.next(), Some(to), "release stages only move forward");
    *stage = to;
}
