use crate::error::{GitReleaseError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)$").expect("version pattern is a valid regex")
    })
}

/// Semantic version representation.
///
/// Field order matters: the derived ordering compares major, then minor,
/// then patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a manifest version string (e.g., "0.1.124" -> Version(0,1,124)).
    ///
    /// Exactly three dot-separated runs of ASCII digits are accepted. Leading
    /// zeros are tolerated and dropped on display. Anything else fails,
    /// including otherwise valid semver strings with pre-release or build
    /// metadata.
    pub fn parse(input: &str) -> Result<Self> {
        let Some(caps) = version_pattern().captures(input) else {
            if let Ok(semver) = semver::Version::parse(input) {
                if !semver.pre.is_empty() || !semver.build.is_empty() {
                    return Err(GitReleaseError::version(format!(
                        "'{}' carries pre-release/build metadata, which is not supported",
                        input
                    )));
                }
            }
            return Err(GitReleaseError::version(format!(
                "Invalid version format: '{}' - expected MAJOR.MINOR.PATCH",
                input
            )));
        };

        let component = |index: usize, name: &str| -> Result<u64> {
            caps[index].parse::<u64>().map_err(|_| {
                GitReleaseError::version(format!(
                    "{} version '{}' in '{}' is out of range",
                    name, &caps[index], input
                ))
            })
        };

        Ok(Version {
            major: component(1, "Major")?,
            minor: component(2, "Minor")?,
            patch: component(3, "Patch")?,
        })
    }

    /// Bump version according to bump kind.
    ///
    /// `BumpKind::None` returns the version unchanged. Incrementing a
    /// component already at `u64::MAX` is an error.
    pub fn bump(&self, kind: BumpKind) -> Result<Self> {
        let overflow = |name: &str| {
            GitReleaseError::version(format!("cannot bump {} version of {}", name, self))
        };

        Ok(match kind {
            BumpKind::Major => Version {
                major: self.major.checked_add(1).ok_or_else(|| overflow("major"))?,
                minor: 0,
                patch: 0,
            },
            BumpKind::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(|| overflow("minor"))?,
                patch: 0,
            },
            BumpKind::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(|| overflow("patch"))?,
            },
            BumpKind::None => *self,
        })
    }
}

impl FromStr for Version {
    type Err = GitReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Which version component a release increments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
    #[default]
    None,
}

impl BumpKind {
    /// Resolve the `--patch`/`--minor`/`--major` switches.
    ///
    /// More than one set switch is a usage error.
    pub fn from_flags(patch: bool, minor: bool, major: bool) -> Result<Self> {
        let selected = [patch, minor, major].iter().filter(|set| **set).count();
        if selected > 1 {
            return Err(GitReleaseError::usage(
                "Only one version bump flag can be specified at a time.",
            ));
        }

        Ok(if patch {
            BumpKind::Patch
        } else if minor {
            BumpKind::Minor
        } else if major {
            BumpKind::Major
        } else {
            BumpKind::None
        })
    }

    pub fn is_none(&self) -> bool {
        matches!(self, BumpKind::None)
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
            BumpKind::None => "none",
        };
        f.write_str(name)
    }
}
