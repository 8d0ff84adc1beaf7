//! Error handling module
//!
//! This module defines the error types and result type aliases used in the application.

use thiserror::Error;
use std::io;

/// WS Relay Proxy error type
#[derive(Error, Debug)]
pub enum BridgeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// WebSocket protocol or transport error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Failure to open the upstream connection
    #[error("Upstream connect error: {0}")]
    UpstreamConnect(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport error on a framework-managed socket
    #[error("Transport error: {0}")]
    Transport(String),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

impl From<axum::Error> for BridgeError {
    fn from(err: axum::Error) -> Self {
        BridgeError::Transport(err.to_string())
    }
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `BridgeError`.
pub type Result<T> = std::result::Result<T, BridgeError>;
