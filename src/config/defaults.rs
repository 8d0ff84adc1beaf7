//! Default configuration values
//!
//! This module provides default values for configuration options.
//! It is designed to be a single source of truth for defaults,
//! making it easier to maintain consistent defaults across the application.

use std::net::SocketAddr;
use std::str::FromStr;

/// Environment variable prefix for all configuration options
pub const ENV_PREFIX: &str = "WS_RELAY_PROXY_";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

// String constants for default values

/// Default listen address as string
pub const LISTEN_STR: &str = "0.0.0.0:3000";

/// Default upstream WebSocket endpoint as string
pub const UPSTREAM_STR: &str = "ws://127.0.0.1:8080/api/v1/ws";

/// Default inbound upgrade path as string
pub const WS_PATH_STR: &str = "/ws";

/// Default log level as string
pub const LOG_LEVEL_STR: &str = "info";

// Functions for default values

/// Default listen address
pub fn listen() -> SocketAddr {
    SocketAddr::from_str(LISTEN_STR)
        .expect("Default listen address should be valid")
}

/// Default upstream WebSocket endpoint
pub fn upstream() -> String {
    UPSTREAM_STR.to_string()
}

/// Default inbound upgrade path
pub fn ws_path() -> String {
    WS_PATH_STR.to_string()
}

/// Default log level
pub fn log_level() -> String {
    LOG_LEVEL_STR.to_string()
}

/// Default maximum number of concurrent bridge pairs (unbounded)
pub fn max_pairs() -> Option<usize> {
    None
}

/// Default upstream connect timeout in seconds (disabled)
pub fn connect_timeout() -> Option<u64> {
    None
}

/// Default per-pair idle timeout in seconds (disabled)
pub fn idle_timeout() -> Option<u64> {
    None
}
