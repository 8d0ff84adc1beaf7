//! Configuration loading functionality
//!
//! This module provides functionality for loading configuration from different sources
//! such as files, environment variables, and command-line arguments.

use std::path::Path;
use std::fs;
use std::env;

use crate::common::{parse_socket_addr, BridgeError, Result};
use crate::config::defaults;
use crate::config::merger::ConfigMerger;
use crate::config::BridgeConfig;

/// Trait for loading configuration from different sources
pub trait ConfigLoader {
    /// Load configuration from a file
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> where Self: Sized;

    /// Load configuration from environment variables
    fn from_env() -> Result<Self> where Self: Sized;

    /// Create configuration from command line arguments
    fn from_args(
        listen: &str,
        upstream: &str,
        ws_path: &str,
        log_level: &str,
        max_pairs: Option<usize>,
        connect_timeout: Option<u64>,
        idle_timeout: Option<u64>,
    ) -> Result<Self> where Self: Sized;

    /// Auto-detect and load configuration from the best available source
    fn auto_load() -> Result<Self> where Self: Sized;
}

impl ConfigLoader for BridgeConfig {
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_display = path.display();

        // Read the file content
        let content = fs::read_to_string(path)
            .map_err(|e| BridgeError::Config(format!("Failed to read config file {}: {}", path_display, e)))?;

        // Deserialize with error mapping
        serde_json::from_str(&content)
            .map_err(|e| BridgeError::Config(format!("Failed to parse JSON config file {}: {}", path_display, e)))
    }

    fn from_env() -> Result<Self> {
        use crate::config::defaults::ENV_PREFIX;

        let get_env = |name: &str| -> Option<String> {
            env::var(format!("{}{}", ENV_PREFIX, name)).ok()
        };

        let mut config = Self::default();

        // Network settings
        if let Some(value) = get_env("LISTEN") {
            config.listen = parse_socket_addr(&value)?;
        }
        if let Some(value) = get_env("UPSTREAM") {
            config.upstream = value;
        }
        if let Some(value) = get_env("WS_PATH") {
            config.ws_path = value;
        }

        // General settings
        if let Some(value) = get_env("LOG_LEVEL") {
            config.log_level = value;
        }

        // Limits
        if let Some(value) = get_env("MAX_PAIRS") {
            let max = value.parse::<usize>().map_err(|e| {
                BridgeError::Config(format!("Invalid {}MAX_PAIRS value '{}': {}", ENV_PREFIX, value, e))
            })?;
            config.max_pairs = Some(max);
        }
        if let Some(value) = get_env("CONNECT_TIMEOUT") {
            let secs = value.parse::<u64>().map_err(|e| {
                BridgeError::Config(format!("Invalid {}CONNECT_TIMEOUT value '{}': {}", ENV_PREFIX, value, e))
            })?;
            config.connect_timeout = Some(secs);
        }
        if let Some(value) = get_env("IDLE_TIMEOUT") {
            let secs = value.parse::<u64>().map_err(|e| {
                BridgeError::Config(format!("Invalid {}IDLE_TIMEOUT value '{}': {}", ENV_PREFIX, value, e))
            })?;
            config.idle_timeout = Some(secs);
        }

        Ok(config)
    }

    fn from_args(
        listen: &str,
        upstream: &str,
        ws_path: &str,
        log_level: &str,
        max_pairs: Option<usize>,
        connect_timeout: Option<u64>,
        idle_timeout: Option<u64>,
    ) -> Result<Self> {
        let mut config = Self::default();

        config.listen = parse_socket_addr(listen)?;
        config.upstream = upstream.to_string();
        config.ws_path = ws_path.to_string();
        config.log_level = log_level.to_string();
        config.max_pairs = max_pairs;
        config.connect_timeout = connect_timeout;
        config.idle_timeout = idle_timeout;

        Ok(config)
    }

    fn auto_load() -> Result<Self> {
        use log::{info, debug};

        // Start with the default configuration
        let mut config = Self::default();
        debug!("Starting with default configuration");

        // Check if the default config file exists before attempting to load it
        let default_config_path = defaults::DEFAULT_CONFIG_FILE;
        if Path::new(default_config_path).exists() {
            info!("Loading configuration from {}", default_config_path);
            match Self::from_file(default_config_path) {
                Ok(file_config) => {
                    config = config.merge(file_config);
                    debug!("Merged configuration from file");
                }
                Err(e) => {
                    debug!("Failed to load configuration from file: {}", e);
                }
            }
        }

        // Load from environment variables (only if there are actual changes)
        match Self::from_env() {
            Ok(env_config) if env_config != Self::default() => {
                info!("Applying configuration from environment variables");
                config = config.merge(env_config);
            }
            _ => debug!("No environment variable configuration found or applied"),
        }

        Ok(config)
    }
}
