//! Tests for configuration resolution
//!
//! Covers priority order (CLI → ENV → TOML → defaults), missing-file tolerance
//! and page size validation.
//!
//! Tests that touch PALARO_* environment variables are marked #[serial] so they
//! never race each other.

use palaro_common::config::{
    resolve, validate_page_size, CompiledDefaults, LoggingConfig, Overrides, TomlConfig,
    ENV_BIND, ENV_CONFIG, ENV_DB_PATH, ENV_PAGE_SIZE,
};
use palaro_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(ENV_DB_PATH);
    env::remove_var(ENV_BIND);
    env::remove_var(ENV_PAGE_SIZE);
    env::remove_var(ENV_CONFIG);
}

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("palaro-rt.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_compiled_defaults() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(defaults.db_path.ends_with("palaro.db"));
    assert_eq!(defaults.bind, "127.0.0.1:5830");
    assert_eq!(defaults.page_size, 100);
    assert_eq!(defaults.log_level, "info");
}

#[test]
#[serial]
fn test_explicit_config_file_overrides_defaults() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        db_path = "/srv/palaro/results.db"
        bind = "0.0.0.0:9000"
        page_size = 25

        [logging]
        level = "debug"
        "#,
    );

    let config = resolve(&Overrides {
        config_path: Some(path.clone()),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(config.db_path, PathBuf::from("/srv/palaro/results.db"));
    assert_eq!(config.bind, "0.0.0.0:9000");
    assert_eq!(config.page_size, 25);
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.config_file, Some(path));
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bind = \"0.0.0.0:9000\"\npage_size = 25\n");
    env::set_var(ENV_BIND, "127.0.0.1:7000");
    env::set_var(ENV_PAGE_SIZE, "50");

    let config = resolve(&Overrides {
        config_path: Some(path),
        ..Default::default()
    })
    .unwrap();
    clear_env();

    assert_eq!(config.bind, "127.0.0.1:7000");
    assert_eq!(config.page_size, 50);
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var(ENV_DB_PATH, "/from/env.db");

    let config = resolve(&Overrides {
        db_path: Some(PathBuf::from("/from/cli.db")),
        ..Default::default()
    })
    .unwrap();
    clear_env();

    assert_eq!(config.db_path, PathBuf::from("/from/cli.db"));
}

#[test]
#[serial]
fn test_env_config_path_is_used() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "page_size = 10\n");
    env::set_var(ENV_CONFIG, &path);

    let config = resolve(&Overrides::default()).unwrap();
    clear_env();

    assert_eq!(config.page_size, 10);
    assert_eq!(config.config_file, Some(path));
}

#[test]
#[serial]
fn test_named_config_file_must_exist() {
    clear_env();

    let result = resolve(&Overrides {
        config_path: Some(PathBuf::from("/nonexistent/palaro-rt.toml")),
        ..Default::default()
    });

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_malformed_config_file_is_rejected() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "page_size = [not valid toml");

    let result = resolve(&Overrides {
        config_path: Some(path),
        ..Default::default()
    });

    assert!(matches!(result, Err(Error::ConfigParse { .. })));
}

#[test]
#[serial]
fn test_non_numeric_env_page_size_is_rejected() {
    clear_env();
    env::set_var(ENV_PAGE_SIZE, "lots");

    let result = resolve(&Overrides::default());
    clear_env();

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_out_of_range_page_size_is_rejected() {
    clear_env();

    let result = resolve(&Overrides {
        page_size: Some(0),
        ..Default::default()
    });

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_validate_page_size_bounds() {
    assert!(validate_page_size(1).is_ok());
    assert!(validate_page_size(1000).is_ok());
    assert!(validate_page_size(0).is_err());
    assert!(validate_page_size(1001).is_err());
}

#[test]
fn test_partial_toml_keeps_logging_default() {
    let config: TomlConfig = toml::from_str("bind = \"0.0.0.0:1\"").unwrap();

    assert_eq!(config.bind.as_deref(), Some("0.0.0.0:1"));
    assert_eq!(config.logging, LoggingConfig::default());
    assert!(config.db_path.is_none());
}
