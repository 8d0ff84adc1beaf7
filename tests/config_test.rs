//! Configuration tests
//!
//! This file contains tests for the configuration system: defaults, file
//! and environment loading, merge priority, and validation.

use std::env;
use std::fs;

use serial_test::serial;
use tempfile::tempdir;

use ws_relay_proxy::config::{
    BridgeConfig, ConfigLoader, ConfigMerger, ConfigValidator, ENV_PREFIX,
};

/// Test default configuration
#[test]
fn test_default_config() {
    let config = BridgeConfig::default();

    assert_eq!(config.listen.to_string(), "0.0.0.0:3000");
    assert_eq!(config.upstream, "ws://127.0.0.1:8080/api/v1/ws");
    assert_eq!(config.ws_path, "/ws");
    assert_eq!(config.log_level, "info");
    assert_eq!(config.max_pairs, None);
    assert_eq!(config.connect_timeout, None);
    assert_eq!(config.idle_timeout, None);

    assert!(config.validate().is_ok(), "Defaults should validate");
}

/// Test configuration from file
#[test]
fn test_file_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join("config.json");

    let config_content = r#"{
        "listen": "127.0.0.1:9100",
        "upstream": "ws://127.0.0.1:9200/relay",
        "ws_path": "/bridge",
        "log_level": "debug",
        "max_pairs": 32,
        "connect_timeout": 10
    }"#;
    fs::write(&config_path, config_content).expect("Failed to write test config file");

    let config = BridgeConfig::from_file(&config_path).expect("Failed to load config from file");

    assert_eq!(config.listen.to_string(), "127.0.0.1:9100");
    assert_eq!(config.upstream, "ws://127.0.0.1:9200/relay");
    assert_eq!(config.ws_path, "/bridge");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.max_pairs, Some(32));
    assert_eq!(config.connect_timeout, Some(10));
    assert_eq!(config.idle_timeout, None);
}

#[test]
fn test_file_config_missing() {
    let result = BridgeConfig::from_file("/nonexistent/config.json");
    assert!(result.is_err(), "Missing config file should fail");
}

#[test]
fn test_file_config_invalid_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, "{ not json").expect("Failed to write test config file");

    let result = BridgeConfig::from_file(&config_path);
    assert!(result.is_err(), "Invalid JSON should fail");
}

/// Test configuration from environment variables
#[test]
#[serial]
fn test_env_config() {
    env::set_var(format!("{}LISTEN", ENV_PREFIX), "127.0.0.1:9300");
    env::set_var(format!("{}UPSTREAM", ENV_PREFIX), "ws://10.0.0.2:9000/ws");
    env::set_var(format!("{}IDLE_TIMEOUT", ENV_PREFIX), "600");

    let config = BridgeConfig::from_env();

    env::remove_var(format!("{}LISTEN", ENV_PREFIX));
    env::remove_var(format!("{}UPSTREAM", ENV_PREFIX));
    env::remove_var(format!("{}IDLE_TIMEOUT", ENV_PREFIX));

    let config = config.expect("Failed to load config from environment");
    assert_eq!(config.listen.to_string(), "127.0.0.1:9300");
    assert_eq!(config.upstream, "ws://10.0.0.2:9000/ws");
    assert_eq!(config.idle_timeout, Some(600));

    // Untouched fields keep their defaults
    assert_eq!(config.ws_path, "/ws");
    assert_eq!(config.max_pairs, None);
}

#[test]
#[serial]
fn test_env_config_invalid_number() {
    env::set_var(format!("{}MAX_PAIRS", ENV_PREFIX), "lots");

    let result = BridgeConfig::from_env();

    env::remove_var(format!("{}MAX_PAIRS", ENV_PREFIX));

    assert!(result.is_err(), "Non-numeric MAX_PAIRS should fail");
}

/// Test merge priority: higher priority sources override only where they
/// diverge from the defaults
#[test]
fn test_merge_priority() {
    let mut file_config = BridgeConfig::default();
    file_config.log_level = "debug".to_string();
    file_config.upstream = "ws://file-host:9000/ws".to_string();

    let cli_config = BridgeConfig::from_args(
        "127.0.0.1:9400",
        "ws://cli-host:9500/ws",
        "/ws",
        "info",
        None,
        None,
        None,
    )
    .expect("Should build configuration from arguments");

    let merged = file_config.merge(cli_config);

    // CLI diverges from the defaults for listen and upstream, so it wins
    assert_eq!(merged.listen.to_string(), "127.0.0.1:9400");
    assert_eq!(merged.upstream, "ws://cli-host:9500/ws");

    // CLI left log_level at the default, so the file value survives
    assert_eq!(merged.log_level, "debug");
}

/// Test auto_load picking up config.json from the working directory
#[test]
#[serial]
fn test_auto_load_reads_default_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    fs::write(
        dir.path().join("config.json"),
        r#"{ "upstream": "ws://127.0.0.1:9600/ws" }"#,
    )
    .expect("Failed to write test config file");

    let previous = env::current_dir().expect("Failed to read current dir");
    env::set_current_dir(dir.path()).expect("Failed to enter temp dir");

    let config = BridgeConfig::auto_load();

    env::set_current_dir(previous).expect("Failed to restore current dir");

    let config = config.expect("auto_load should succeed");
    assert_eq!(config.upstream, "ws://127.0.0.1:9600/ws");
    assert_eq!(config.ws_path, "/ws");
}

#[test]
fn test_validation_rejects_bad_upstream() {
    let mut config = BridgeConfig::default();

    config.upstream = "http://127.0.0.1:8080/ws".to_string();
    assert!(config.validate().is_err(), "http scheme should be rejected");

    config.upstream = "127.0.0.1:8080".to_string();
    assert!(config.validate().is_err(), "Scheme-less upstream should be rejected");
}

#[test]
fn test_validation_rejects_loop_to_listener() {
    let mut config = BridgeConfig::default();
    config.listen = "127.0.0.1:3000".parse().unwrap();
    config.upstream = "ws://127.0.0.1:3000/ws".to_string();
    assert!(config.validate().is_err(), "Upstream must not target the listener");
}
