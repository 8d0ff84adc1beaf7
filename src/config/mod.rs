//! Configuration module
//!
//! This module handles application configuration, including loading from
//! different sources (files, environment variables, command line arguments)
//! and validating the configuration.

// Submodules
mod defaults;
mod loader;
mod merger;
mod validator;

// Re-export types and traits
pub use self::loader::ConfigLoader;
pub use self::merger::ConfigMerger;
pub use self::validator::ConfigValidator;

use serde::{Deserialize, Serialize, Deserializer};
use std::net::SocketAddr;

use crate::common::parse_socket_addr;

// Export constants needed externally
pub use defaults::{ENV_PREFIX, DEFAULT_CONFIG_FILE};
pub use defaults::{LISTEN_STR, UPSTREAM_STR, WS_PATH_STR, LOG_LEVEL_STR};

/// Custom deserializer for socket addresses
fn deserialize_socket_addr<'de, D>(deserializer: D) -> std::result::Result<SocketAddr, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_socket_addr(&s).map_err(serde::de::Error::custom)
}

/// Relay configuration
///
/// Contains all configuration options needed for the relay proxy.
/// Supports loading from command-line arguments, environment variables,
/// and configuration files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct BridgeConfig {
    // --- Network settings ---

    /// Listen address for the relay proxy
    #[serde(default = "defaults::listen", deserialize_with = "deserialize_socket_addr")]
    pub listen: SocketAddr,

    /// Upstream WebSocket endpoint every accepted client is bridged to
    /// (e.g. "ws://127.0.0.1:8080/api/v1/ws"); constant for the process lifetime
    #[serde(default = "defaults::upstream")]
    pub upstream: String,

    /// Inbound request path that accepts WebSocket upgrades; any other
    /// path is rejected without an upgrade
    #[serde(default = "defaults::ws_path")]
    pub ws_path: String,

    // --- General settings ---

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "defaults::log_level")]
    pub log_level: String,

    // --- Limits (all disabled by default) ---

    /// Maximum number of concurrently active bridge pairs.
    /// When unset, no admission control is applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pairs: Option<usize>,

    /// Upstream connect timeout in seconds.
    /// When unset, the connect attempt is never timed out by the relay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u64>,

    /// Idle timeout per pair in seconds. A pair with no frames in either
    /// direction for this long is torn down. When unset, pairs never idle out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_timeout: Option<u64>,
}

impl Default for BridgeConfig {
    /// Create a default configuration using centralized defaults
    #[inline]
    fn default() -> Self {
        Self {
            listen: defaults::listen(),
            upstream: defaults::upstream(),
            ws_path: defaults::ws_path(),
            log_level: defaults::log_level(),
            max_pairs: defaults::max_pairs(),
            connect_timeout: defaults::connect_timeout(),
            idle_timeout: defaults::idle_timeout(),
        }
    }
}

// Implement AsRef<BridgeConfig> for BridgeConfig to simplify merge operations
impl AsRef<BridgeConfig> for BridgeConfig {
    #[inline]
    fn as_ref(&self) -> &BridgeConfig {
        self
    }
}

/// Log the configuration
pub fn log_config(config: &BridgeConfig) {
    use log::info;

    if !log::log_enabled!(log::Level::Info) {
        return;
    }

    info!("=== Final Configuration ===");

    info!("Network Settings:");
    info!("  Listen address: {}", config.listen);
    info!("  Upstream endpoint: {}", config.upstream);
    info!("  Upgrade path: {}", config.ws_path);

    info!("General Settings:");
    info!("  Log level: {}", config.log_level);

    info!("Limits:");
    match config.max_pairs {
        Some(max) => info!("  Max concurrent pairs: {}", max),
        None => info!("  Max concurrent pairs: unbounded"),
    }
    match config.connect_timeout {
        Some(secs) => info!("  Upstream connect timeout: {} seconds", secs),
        None => info!("  Upstream connect timeout: none"),
    }
    match config.idle_timeout {
        Some(secs) => info!("  Idle timeout: {} seconds", secs),
        None => info!("  Idle timeout: none"),
    }

    info!("=========================");
}

#[cfg(test)]
mod tests {
    use super::*;

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
    }

    #[test]
    fn test_deserialize_socket_addr_field() {
        let config: BridgeConfig = serde_json::from_str(
            r#"{ "listen": "127.0.0.1:9000" }"#,
        )
        .expect("Should parse listen address given as a string");

        assert_eq!(config.listen.to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<BridgeConfig, _> =
            serde_json::from_str(r#"{ "not_a_field": true }"#);
        assert!(result.is_err(), "Unknown fields should be rejected");
    }
}
