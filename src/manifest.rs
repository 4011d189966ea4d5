//! Manifest storage - where the released version lives.
//!
//! [ManifestStore] is the capability the release sequence depends on.
//! [JsonManifest] is the real `package.json`-style file; [InMemoryManifest]
//! keeps the version string in memory for tests.

use crate::domain::Version;
use crate::error::{GitReleaseError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read and write the version recorded in a project manifest.
pub trait ManifestStore {
    /// Read and parse the current version.
    fn load(&self) -> Result<Version>;

    /// Persist `version`, leaving everything else in the manifest untouched.
    fn store(&mut self, version: &Version) -> Result<()>;

    /// Human readable location, used in messages.
    fn location(&self) -> String;
}

/// A JSON manifest file whose top-level object holds the version string.
///
/// Rewrites use 2-space indentation and end with a newline. Key order and
/// all other fields are preserved, numbers keeping their exact source text.
#[derive(Debug, Clone)]
pub struct JsonManifest {
    path: PathBuf,
    field: String,
}

impl JsonManifest {
    /// Manifest at `path` with the version under `"version"`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonManifest {
            path: path.into(),
            field: "version".to_string(),
        }
    }

    /// Use a different top-level key for the version
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>> {
        let raw = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                GitReleaseError::manifest(format!("{} not found", self.path.display()))
            }
            _ => GitReleaseError::manifest(format!(
                "cannot read {}: {}",
                self.path.display(),
                e
            )),
        })?;

        let document: Value = serde_json::from_str(&raw).map_err(|e| {
            GitReleaseError::manifest(format!("{} is not valid JSON: {}", self.path.display(), e))
        })?;

        match document {
            Value::Object(map) => Ok(map),
            _ => Err(GitReleaseError::manifest(format!(
                "{} must contain a JSON object",
                self.path.display()
            ))),
        }
    }

    fn version_text<'a>(&self, document: &'a Map<String, Value>) -> Result<&'a str> {
        match document.get(&self.field) {
            Some(Value::String(text)) => Ok(text.as_str()),
            Some(other) => Err(GitReleaseError::manifest(format!(
                "\"{}\" in {} must be a string, found {}",
                self.field,
                self.path.display(),
                other
            ))),
            None => Err(GitReleaseError::manifest(format!(
                "{} has no \"{}\" field",
                self.path.display(),
                self.field
            ))),
        }
    }
}

impl ManifestStore for JsonManifest {
    fn load(&self) -> Result<Version> {
        let document = self.read_document()?;
        let text = self.version_text(&document)?;
        Version::parse(text).map_err(|e| {
            GitReleaseError::manifest(format!("{} in {}", e, self.path.display()))
        })
    }

    fn store(&mut self, version: &Version) -> Result<()> {
        let mut document = self.read_document()?;
        self.version_text(&document)?;
        document.insert(self.field.clone(), Value::String(version.to_string()));

        let mut rendered = serde_json::to_string_pretty(&Value::Object(document)).map_err(|e| {
            GitReleaseError::manifest(format!("cannot serialize {}: {}", self.path.display(), e))
        })?;
        rendered.push('\n');

        fs::write(&self.path, rendered)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Manifest kept in memory, counting how often it was rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryManifest {
    version: String,
    writes: usize,
}

impl InMemoryManifest {
    pub fn new(version: impl Into<String>) -> Self {
        InMemoryManifest {
            version: version.into(),
            writes: 0,
        }
    }

    /// The raw version string as currently stored
    pub fn version_text(&self) -> &str {
        &self.version
    }

    /// Number of successful `store` calls
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ManifestStore for InMemoryManifest {
    fn load(&self) -> Result<Version> {
        Version::parse(&self.version)
            .map_err(|e| GitReleaseError::manifest(format!("{} in {}", e, self.location())))
    }

    fn store(&mut self, version: &Version) -> Result<()> {
        self.version = version.to_string();
        self.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "in-memory manifest".to_string()
    }
}
