use std::fmt;

/// Branch a release should land on.
///
/// `None` inside means "whatever is checked out right now".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchTarget(Option<String>);

impl BranchTarget {
    /// Target the currently checked out branch
    pub fn current() -> Self {
        BranchTarget(None)
    }

    /// Target a named branch, creating it if needed
    pub fn named(name: impl Into<String>) -> Self {
        BranchTarget(Some(name.into()))
    }

    pub fn name(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Branch a release reports as its destination.
    pub fn resolve<'a>(&'a self, current: &'a str) -> &'a str {
        self.name().unwrap_or(current)
    }
}

impl From<Option<String>> for BranchTarget {
    fn from(name: Option<String>) -> Self {
        BranchTarget(name)
    }
}

/// What `ensure_branch` had to do to get the branch checked out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchOutcome {
    /// Branch already existed locally and was checked out
    CheckedOut(String),
    /// Branch was created from the current commit and checked out
    Created(String),
}

impl BranchOutcome {
    pub fn name(&self) -> &str {
        match self {
            BranchOutcome::CheckedOut(name) | BranchOutcome::Created(name) => name,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, BranchOutcome::Created(_))
    }
}

impl fmt::Display for BranchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchOutcome::CheckedOut(name) => write!(f, "Checked out existing branch: {}", name),
            BranchOutcome::Created(name) => {
                write!(f, "Created and checked out new branch: {}", name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_target_resolves_to_checked_out_branch() {
        let target = BranchTarget::current();
        assert_eq!(target.name(), None);
        assert_eq!(target.resolve("main"), "main");
    }

    #[test]
    fn test_named_target_wins_over_current() {
        let target = BranchTarget::named("release/v2");
        assert_eq!(target.resolve("main"), "release/v2");
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            BranchOutcome::CheckedOut("develop".into()).to_string(),
            "Checked out existing branch: develop"
        );
        let created = BranchOutcome::Created("release/v2".into());
        assert_eq!(
            created.to_string(),
            "Created and checked out new branch: release/v2"
        );
        assert!(created.was_created());
        assert_eq!(created.name(), "release/v2");
    }
}
