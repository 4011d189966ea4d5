// tests/config_test.rs
use git_release::config::{load_config, Config};
use git_release::git::discover_workdir;
use git_release::GitReleaseError;
use serial_test::serial;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.manifest, PathBuf::from("package.json"));
    assert_eq!(config.version_field, "version");
    assert_eq!(config.push.remote, "origin");
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
manifest = "web/package.json"

[push]
remote = "github"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path()), Path::new(".")).unwrap();
    assert_eq!(config.manifest, PathBuf::from("web/package.json"));
    assert_eq!(config.push.remote, "github");
    // Unset keys keep their defaults
    assert_eq!(config.version_field, "version");
    assert!(!config.behavior.verbose);
}

#[test]
#[serial]
fn test_load_fixture() {
    let config = load_config(
        Some(Path::new("tests/fixtures/gitrelease_custom.toml")),
        Path::new("."),
    )
        .expect("Failed to load test config");
    assert_eq!(config.manifest, PathBuf::from("app/package.json"));
    assert_eq!(config.version_field, "appVersion");
    assert_eq!(config.push.remote, "upstream");
    assert!(config.behavior.verbose);
    assert_eq!(
        config.manifest_path(Path::new("/repo")),
        PathBuf::from("/repo/app/package.json")
    );
}

#[test]
fn test_invalid_toml_is_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"manifest = [unterminated").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path()), Path::new(".")).unwrap_err();
    assert!(matches!(err, GitReleaseError::Config(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_missing_explicit_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(Some(dir.path().join("nope.toml").as_path()), dir.path()).unwrap_err();
    assert!(err.to_string().contains("cannot read"), "got: {}", err);
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_user_config_directory_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".gitrelease.toml"),
        "version_field = \"release\"\n",
    )
    .unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());
    let loaded = load_config(None, dir.path());
    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(loaded.unwrap().version_field, "release");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_defaults_when_no_file_found() {
    let dir = tempfile::tempdir().unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());
    let loaded = load_config(None, dir.path());
    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(loaded.unwrap(), Config::default());
}

#[test]
fn test_project_config_at_work_tree_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("gitrelease.toml"),
        "manifest = \"app/package.json\"\n",
    )
    .unwrap();

    let config = load_config(None, dir.path()).unwrap();
    assert_eq!(config.manifest, PathBuf::from("app/package.json"));
}

#[test]
fn test_explicit_path_wins_over_project_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("gitrelease.toml"), "version_field = \"root\"\n").unwrap();
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"version_field = \"explicit\"\n").unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path()), dir.path()).unwrap();
    assert_eq!(config.version_field, "explicit");
}

#[test]
#[serial]
fn test_project_config_found_from_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    git2::Repository::init(dir.path()).unwrap();
    std::fs::write(
        dir.path().join("gitrelease.toml"),
        "manifest = \"app/package.json\"\n",
    )
    .unwrap();
    let app = dir.path().join("app");
    std::fs::create_dir_all(&app).unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(&app).unwrap();
    let loaded = std::env::current_dir()
        .map_err(GitReleaseError::from)
        .and_then(|cwd| discover_workdir(&cwd))
        .and_then(|workdir| load_config(None, &workdir).map(|config| (workdir, config)));
    std::env::set_current_dir(previous).unwrap();

    let (workdir, config) = loaded.unwrap();
    assert_eq!(config.manifest, PathBuf::from("app/package.json"));
    assert_eq!(
        workdir.canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
    assert_eq!(
        config.manifest_path(&workdir),
        workdir.join("app").join("package.json")
    );
}
