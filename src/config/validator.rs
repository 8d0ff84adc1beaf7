//! Configuration validator
//!
//! This module provides functionality for validating configuration.

use http::Uri;
use std::net::IpAddr;

use crate::common::{BridgeError, Result};
use crate::config::BridgeConfig;

/// Configuration validator trait
pub trait ConfigValidator {
    /// Validate the configuration
    fn validate(&self) -> Result<()>;

    /// Check configuration for warnings
    fn check_warnings(&self) -> Vec<String>;
}

impl ConfigValidator for BridgeConfig {
    fn validate(&self) -> Result<()> {
        validate_upstream(self)?;
        validate_path(self)?;
        validate_limits(self)?;
        Ok(())
    }

    fn check_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        match self.log_level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            level => {
                warnings.push(format!("Invalid log level '{}', using default 'info'", level));
            }
        }

        if self.ws_path == "/health" {
            warnings.push(
                "Upgrade path '/health' shadows the health endpoint of the embeddable router"
                    .to_string(),
            );
        }

        warnings
    }
}

/// Validate the upstream endpoint URI
fn validate_upstream(config: &BridgeConfig) -> Result<()> {
    let uri: Uri = config.upstream.parse().map_err(|e| {
        BridgeError::Config(format!("Invalid upstream URI '{}': {}", config.upstream, e))
    })?;

    match uri.scheme_str() {
        Some("ws") => {}
        Some(other) => {
            return Err(BridgeError::Config(format!(
                "Unsupported upstream scheme '{}': only ws:// endpoints are supported",
                other
            )));
        }
        None => {
            return Err(BridgeError::Config(format!(
                "Upstream URI '{}' has no scheme; expected ws://host[:port][/path]",
                config.upstream
            )));
        }
    }

    let host = uri.host().ok_or_else(|| {
        BridgeError::Config(format!("Upstream URI '{}' has no host", config.upstream))
    })?;

    // Refuse an upstream that points straight back at the relay listener
    if let Ok(ip) = host.parse::<IpAddr>() {
        let port = uri.port_u16().unwrap_or(80);
        if ip == config.listen.ip() && port == config.listen.port() {
            return Err(BridgeError::Config(
                "Upstream endpoint must not point back at the relay listener".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validate the inbound upgrade path
fn validate_path(config: &BridgeConfig) -> Result<()> {
    if !config.ws_path.starts_with('/') {
        return Err(BridgeError::Config(format!(
            "Upgrade path '{}' must start with '/'",
            config.ws_path
        )));
    }
    Ok(())
}

/// Validate the limit knobs
fn validate_limits(config: &BridgeConfig) -> Result<()> {
    if config.max_pairs == Some(0) {
        return Err(BridgeError::Config(
            "max_pairs must be greater than 0 when set".to_string(),
        ));
    }
    if config.connect_timeout == Some(0) {
        return Err(BridgeError::Config(
            "connect_timeout must be greater than 0 when set".to_string(),
        ));
    }
    if config.idle_timeout == Some(0) {
        return Err(BridgeError::Config(
            "idle_timeout must be greater than 0 when set".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BridgeConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_ws_scheme() {
        let mut config = BridgeConfig::default();
        config.upstream = "http://127.0.0.1:8080/ws".to_string();
        assert!(config.validate().is_err());

        config.upstream = "wss://127.0.0.1:8080/ws".to_string();
        assert!(config.validate().is_err(), "TLS upstreams are out of scope");
    }

    #[test]
    fn test_rejects_self_referential_upstream() {
        let mut config = BridgeConfig::default();
        config.listen = "127.0.0.1:3000".parse().unwrap();
        config.upstream = "ws://127.0.0.1:3000/ws".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_relative_path() {
        let mut config = BridgeConfig::default();
        config.ws_path = "ws".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_limits() {
        for tweak in [
            |c: &mut BridgeConfig| c.max_pairs = Some(0),
            |c: &mut BridgeConfig| c.connect_timeout = Some(0),
            |c: &mut BridgeConfig| c.idle_timeout = Some(0),
        ] {
            let mut config = BridgeConfig::default();
            tweak(&mut config);
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_warnings_for_unknown_log_level() {
        let mut config = BridgeConfig::default();
        config.log_level = "verbose".to_string();
        let warnings = config.check_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("verbose"));
    }
}
