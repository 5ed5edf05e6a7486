// tests/config_test.rs
use std::fs;

use mono_release::config::{load_config, CommandConfig, ReleaseConfig, CONFIG_FILE_NAME};
use mono_release::ReleaseError;
use serial_test::serial;

#[test]
#[serial]
fn test_load_from_explicit_path() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join("custom.toml");
    fs::write(
        &path,
        r#"
remote = "upstream"
channels = ["latest", "next"]

[build]
program = "yarn"
args = ["build"]
"#,
    )
    .unwrap();

    let config = load_config(root.path(), Some(&path)).unwrap();
    assert_eq!(config.remote, "upstream");
    assert_eq!(config.channels, vec!["latest", "next"]);
    assert_eq!(config.build, CommandConfig::new("yarn", &["build"]));
    assert_eq!(config.publish, ReleaseConfig::default().publish);
}

#[test]
#[serial]
fn test_load_from_repository_root() {
    let root = tempfile::tempdir().unwrap();
    fs::write(
        root.path().join(CONFIG_FILE_NAME),
        "concurrency = 3\n[behavior]\nno_verify = false\n",
    )
    .unwrap();

    let config = load_config(root.path(), None).unwrap();
    assert_eq!(config.concurrency, Some(3));
    assert!(!config.behavior.no_verify);
    assert!(!config.behavior.sync_internal_dependencies);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_error() {
    let root = tempfile::tempdir().unwrap();
    let err = load_config(root.path(), Some(&root.path().join("nope.toml"))).unwrap_err();
    assert!(matches!(err, ReleaseError::Config(_)));
}

#[test]
#[serial]
fn test_invalid_values_rejected() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join(CONFIG_FILE_NAME), "remote = \"\"\n").unwrap();
    assert!(load_config(root.path(), None).is_err());
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_user_config_dir_fallback() {
    let root = tempfile::tempdir().unwrap();
    let config_home = tempfile::tempdir().unwrap();
    fs::write(
        config_home.path().join(format!(".{}", CONFIG_FILE_NAME)),
        "packages_dir = \"modules\"\n",
    )
    .unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", config_home.path());
    let config = load_config(root.path(), None);
    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(config.unwrap().packages_dir, "modules");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_defaults_without_any_file() {
    let root = tempfile::tempdir().unwrap();
    let config_home = tempfile::tempdir().unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", config_home.path());
    let config = load_config(root.path(), None);
    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(config.unwrap(), ReleaseConfig::default());
}
