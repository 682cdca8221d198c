//! Unit tests for configuration resolution and graceful degradation
//!
//! Tests cover:
//! - Missing TOML files SHALL NOT cause termination (defaults apply)
//! - Priority order: command line > environment > TOML > compiled default
//! - Malformed environment values are reported, not ignored
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate EIDX_* variables are marked with #[serial].

use eidx_common::config::{
    load_toml_config, resolve_setting, SettingSource, TomlConfig,
};
use eidx_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_config_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist.toml");

    let (config, path) = load_toml_config(Some(&missing), "eidx-ra").unwrap();

    assert_eq!(config, TomlConfig::default());
    assert!(path.is_none());
}

#[test]
fn test_config_file_is_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("eidx-ra.toml");
    fs::write(
        &path,
        r#"
[source]
data_dir = "/srv/econ-index"
timeout_secs = 12

[cache]
ttl_secs = 600

[server]
bind_address = "0.0.0.0:8080"
"#,
    )
    .unwrap();

    let (config, loaded_from) = load_toml_config(Some(&path), "eidx-ra").unwrap();

    assert_eq!(loaded_from.as_deref(), Some(path.as_path()));
    assert_eq!(
        config.source.data_dir.as_deref(),
        Some(std::path::Path::new("/srv/econ-index"))
    );
    assert_eq!(config.source.timeout_secs, Some(12));
    assert_eq!(config.cache.ttl_secs, Some(600));
    assert_eq!(config.server.bind_address.as_deref(), Some("0.0.0.0:8080"));
}

#[test]
fn test_unparsable_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "[cache]\nttl_secs = \"ten\"\n").unwrap();

    let result = load_toml_config(Some(&path), "eidx-ra");
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_environment_beats_toml() {
    env::set_var("EIDX_TEST_TIMEOUT_SECS", "45");

    let resolved =
        resolve_setting("timeout_secs", None, "EIDX_TEST_TIMEOUT_SECS", Some(12u64), 30).unwrap();

    assert_eq!(resolved.value, 45);
    assert_eq!(resolved.source, SettingSource::Environment);

    env::remove_var("EIDX_TEST_TIMEOUT_SECS");
}

#[test]
#[serial]
fn test_toml_beats_default_when_env_unset() {
    env::remove_var("EIDX_TEST_TIMEOUT_SECS");

    let resolved =
        resolve_setting("timeout_secs", None, "EIDX_TEST_TIMEOUT_SECS", Some(12u64), 30).unwrap();

    assert_eq!(resolved.value, 12);
    assert_eq!(resolved.source, SettingSource::TomlFile);
}

#[test]
#[serial]
fn test_default_when_nothing_set() {
    env::remove_var("EIDX_TEST_TIMEOUT_SECS");

    let resolved =
        resolve_setting("timeout_secs", None, "EIDX_TEST_TIMEOUT_SECS", None, 30u64).unwrap();

    assert_eq!(resolved.value, 30);
    assert_eq!(resolved.source, SettingSource::Default);
}

#[test]
#[serial]
fn test_blank_environment_value_is_ignored() {
    env::set_var("EIDX_TEST_TIMEOUT_SECS", "   ");

    let resolved =
        resolve_setting("timeout_secs", None, "EIDX_TEST_TIMEOUT_SECS", None, 30u64).unwrap();

    assert_eq!(resolved.source, SettingSource::Default);

    env::remove_var("EIDX_TEST_TIMEOUT_SECS");
}

#[test]
#[serial]
fn test_malformed_environment_value_is_config_error() {
    env::set_var("EIDX_TEST_TIMEOUT_SECS", "soon");

    let result = resolve_setting("timeout_secs", None, "EIDX_TEST_TIMEOUT_SECS", None, 30u64);
    assert!(matches!(result, Err(Error::Config(_))));

    env::remove_var("EIDX_TEST_TIMEOUT_SECS");
}
