//! Unit tests for configuration and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate NEXUS_ROOT_FOLDER are marked with #[serial].

use nexus_common::config::{
    default_root_folder, ensure_root_folder, resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

#[test]
fn test_default_root_folder_is_nonempty() {
    let default = default_root_folder();
    assert!(!default.as_os_str().is_empty());
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let resolved = resolve_root_folder(None, &TomlConfig::default());
    assert_eq!(resolved, default_root_folder());
}

#[test]
#[serial]
fn test_env_var_overrides_default() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/nexus-env-root");

    let resolved = resolve_root_folder(None, &TomlConfig::default());
    assert_eq!(resolved, PathBuf::from("/tmp/nexus-env-root"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_cli_arg_takes_priority_over_env() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/nexus-env-root");

    let resolved = resolve_root_folder(Some("/tmp/nexus-cli-root"), &TomlConfig::default());
    assert_eq!(resolved, PathBuf::from("/tmp/nexus-cli-root"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_root_folder_used_when_no_cli_or_env() {
    env::remove_var(ROOT_FOLDER_ENV);

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/nexus-toml-root")),
        ..TomlConfig::default()
    };
    let resolved = resolve_root_folder(None, &config);
    assert_eq!(resolved, PathBuf::from("/tmp/nexus-toml-root"));
}

#[test]
fn test_toml_config_parses_known_keys() {
    let config = TomlConfig::parse(
        r#"
        root_folder = "/srv/nexus"
        canvas_base_url = "https://princeton.instructure.com/api/v1"
        "#,
    )
    .expect("valid config should parse");

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/nexus")));
    assert_eq!(
        config.canvas_base_url.as_deref(),
        Some("https://princeton.instructure.com/api/v1")
    );
    assert!(config.gradescope_base_url.is_none());
}

#[test]
fn test_toml_config_rejects_invalid_toml() {
    assert!(TomlConfig::parse("root_folder = [not toml").is_err());
}

#[test]
fn test_ensure_root_folder_creates_directory_and_db_path() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("nested").join("root");

    let db_path = ensure_root_folder(&root).expect("should create directory");

    assert!(root.is_dir());
    assert_eq!(db_path, root.join("nexus.db"));
}
