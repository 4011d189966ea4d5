use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum GitReleaseError {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Git command `{command}` failed{}: {stderr}", exit_suffix(.code))]
    VersionControl {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Repository error: {0}")]
    Repository(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {}", code),
        None => String::new(),
    }
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, GitReleaseError>;

impl GitReleaseError {
    /// Create a usage error with context
    pub fn usage(msg: impl Into<String>) -> Self {
        GitReleaseError::Usage(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        GitReleaseError::Manifest(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitReleaseError::Version(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitReleaseError::Config(msg.into())
    }

    /// Create a version-control error for a failed git invocation
    pub fn version_control(
        command: impl Into<String>,
        code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        GitReleaseError::VersionControl {
            command: command.into(),
            code,
            stderr: stderr.into().trim().to_string(),
        }
    }

    /// Process exit code for this error.
    ///
    /// A failing git subprocess hands its own exit code through; everything
    /// else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            GitReleaseError::VersionControl {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitReleaseError::manifest("package.json not found");
        assert_eq!(err.to_string(), "Manifest error: package.json not found");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GitReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_version_control_display_includes_command_and_code() {
        let err = GitReleaseError::version_control("git push", Some(128), "fatal: no remote\n");
        assert_eq!(
            err.to_string(),
            "Git command `git push` failed with exit code 128: fatal: no remote"
        );
    }

    #[test]
    fn test_version_control_display_without_code() {
        let err = GitReleaseError::version_control("git commit", None, "killed by signal");
        assert_eq!(
            err.to_string(),
            "Git command `git commit` failed: killed by signal"
        );
    }

    #[test]
    fn test_exit_code_inherits_subprocess_status() {
        assert_eq!(
            GitReleaseError::version_control("git push", Some(128), "").exit_code(),
            128
        );
        assert_eq!(
            GitReleaseError::version_control("git push", None, "").exit_code(),
            1
        );
    }

    #[test]
    fn test_exit_code_defaults_to_one() {
        let errors = vec![
            GitReleaseError::usage("two bump flags"),
            GitReleaseError::manifest("missing"),
            GitReleaseError::version("1.2"),
            GitReleaseError::config("bad toml"),
        ];

        for err in errors {
            assert_eq!(err.exit_code(), 1, "unexpected exit code for {}", err);
        }
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (GitReleaseError::usage("x"), "Usage error"),
            (GitReleaseError::manifest("x"), "Manifest error"),
            (GitReleaseError::version("x"), "Version parsing error"),
            (GitReleaseError::config("x"), "Configuration error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
