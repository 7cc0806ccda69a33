//! Integration tests for layered configuration loading.
//!
//! These tests exercise the full `from_file()` -> `from_env()` -> builder chain
//! against temporary settings files and scoped environment variables.

use std::path::PathBuf;
use std::time::Duration;

use macro_keybinds_config::{ConfigError, ConfigLoader};
use serial_test::serial;
use tempfile::TempDir;

const ALL_VARS: [&str; 6] = [
    "MACRO_KEYBINDS_STORAGE_PATH",
    "MACRO_KEYBINDS_CONFIG_PATH",
    "MACRO_KEYBINDS_PENDING_EXPIRY_SECS",
    "MACRO_KEYBINDS_PENDING_CAPACITY",
    "MACRO_KEYBINDS_DISABLE_DEFAULT_HOTBAR",
    "MACRO_KEYBINDS_OWNER",
];

/// Every loader variable unset, with `overrides` applied on top.
fn env_with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
    let mut vars: Vec<(&'static str, Option<String>)> = ALL_VARS
        .iter()
        .filter(|var| !overrides.iter().any(|(k, _)| k == *var))
        .map(|var| (*var, None))
        .collect();
    vars.extend(overrides.iter().map(|(k, v)| (*k, Some(v.to_string()))));
    vars
}

fn write_settings(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("settings.json");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
#[serial]
fn test_settings_file_values_applied() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(
        &dir,
        r#"{
            "storagePath": "/srv/keybinds.json",
            "owner": "gm",
            "pendingExpirySecs": 60,
            "pendingCapacity": 4,
            "disableDefaultHotbar": true
        }"#,
    );

    temp_env::with_vars(env_with(&[]), || {
        let config = ConfigLoader::new()
            .with_config_path(path.clone())
            .from_file()
            .unwrap()
            .from_env()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.storage_path, PathBuf::from("/srv/keybinds.json"));
        assert_eq!(config.owner, "gm");
        assert_eq!(config.pending.expiry, Duration::from_secs(60));
        assert_eq!(config.pending.capacity, 4);
        assert!(config.disable_default_hotbar);
    });
}

#[test]
#[serial]
fn test_env_overrides_settings_file() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, r#"{"owner": "gm", "pendingExpirySecs": 60}"#);

    let vars = env_with(&[
        ("MACRO_KEYBINDS_OWNER", "player1"),
        ("MACRO_KEYBINDS_PENDING_EXPIRY_SECS", "10"),
    ]);

    temp_env::with_vars(vars, || {
        let config = ConfigLoader::new()
            .with_config_path(path.clone())
            .with_storage_path(PathBuf::from("/tmp/k.json"))
            .from_file()
            .unwrap()
            .from_env()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.owner, "player1");
        assert_eq!(config.pending.expiry, Duration::from_secs(10));
    });
}

#[test]
#[serial]
fn test_builder_overrides_env() {
    temp_env::with_vars(env_with(&[("MACRO_KEYBINDS_OWNER", "from-env")]), || {
        let config = ConfigLoader::new()
            .from_env()
            .unwrap()
            .with_owner("from-cli".to_string())
            .with_storage_path(PathBuf::from("/tmp/k.json"))
            .build()
            .unwrap();

        assert_eq!(config.owner, "from-cli");
    });
}

#[test]
#[serial]
fn test_missing_settings_file_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    temp_env::with_vars(env_with(&[]), || {
        let config = ConfigLoader::new()
            .with_config_path(path.clone())
            .with_owner("alice".to_string())
            .with_storage_path(PathBuf::from("/tmp/k.json"))
            .from_file()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.pending.capacity, 16);
    });
}

#[test]
#[serial]
fn test_malformed_settings_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, "[1, 2, 3]");

    temp_env::with_vars(env_with(&[]), || {
        let result = ConfigLoader::new().with_config_path(path.clone()).from_file();
        assert!(matches!(
            result,
            Err(ConfigError::SettingsFileParse { .. })
        ));
    });
}

#[test]
#[serial]
fn test_config_path_from_env() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, r#"{"pendingCapacity": 3}"#);
    let path_str = path.to_string_lossy().to_string();

    temp_env::with_vars(
        env_with(&[("MACRO_KEYBINDS_CONFIG_PATH", path_str.as_str())]),
        || {
            let config = ConfigLoader::new()
                .with_owner("alice".to_string())
                .with_storage_path(PathBuf::from("/tmp/k.json"))
                .from_file()
                .unwrap()
                .build()
                .unwrap();

            assert_eq!(config.pending.capacity, 3);
        },
    );
}

#[test]
#[serial]
fn test_owner_falls_back_to_os_user() {
    let mut vars = env_with(&[]);
    vars.push(("USER", Some("osuser".to_string())));

    temp_env::with_vars(vars, || {
        let config = ConfigLoader::new()
            .from_env()
            .unwrap()
            .with_storage_path(PathBuf::from("/tmp/k.json"))
            .build()
            .unwrap();

        assert_eq!(config.owner, "osuser");
    });
}

#[test]
#[serial]
fn test_invalid_capacity_env_value() {
    temp_env::with_vars(
        env_with(&[("MACRO_KEYBINDS_PENDING_CAPACITY", "lots")]),
        || {
            let result = ConfigLoader::new().from_env();
            assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        },
    );
}
