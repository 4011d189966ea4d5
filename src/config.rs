use crate::error::{GitReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project-level configuration file
pub const CONFIG_FILE_NAME: &str = "gitrelease.toml";

/// Represents the complete configuration for git-release.
///
/// Contains the manifest location, push settings and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    #[serde(default = "default_version_field")]
    pub version_field: String,

    #[serde(default)]
    pub push: PushConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_version_field() -> String {
    "version".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Configuration for the push step.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PushConfig {
    /// Remote used when the branch has no upstream yet
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        PushConfig {
            remote: default_remote(),
        }
    }
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            manifest: default_manifest(),
            version_field: default_version_field(),
            push: PushConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Config {
    /// Manifest path, resolved against the work tree root when relative.
    pub fn manifest_path(&self, workdir: &Path) -> PathBuf {
        if self.manifest.is_absolute() {
            self.manifest.clone()
        } else {
            workdir.join(&self.manifest)
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` at the root of the work tree
/// 3. `.gitrelease.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `workdir` - Root of the git work tree being released
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, workdir: &Path) -> Result<Config> {
    let project_config = workdir.join(CONFIG_FILE_NAME);
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if project_config.exists() {
        project_config
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if user_config.exists() {
            user_config
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        GitReleaseError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    toml::from_str(&config_str)
        .map_err(|e| GitReleaseError::config(format!("invalid {}: {}", path.display(), e)))
}
