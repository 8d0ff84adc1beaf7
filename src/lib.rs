//! WS Relay Proxy: WebSocket relay sidecar
//!
//! This library implements a frame-transparent WebSocket relay. It accepts
//! inbound client connections, opens exactly one upstream connection per
//! client to a fixed backend endpoint, and relays frames verbatim in both
//! directions until either side terminates, then terminates the other.
//!
//! # Main Features
//!
//! - One bridge routine shared by two entry points: a standalone listener
//!   and an embeddable axum route
//! - 1:1 client/upstream pairing with coupled teardown
//! - No payload inspection; frames are relayed as opaque text/bytes
//! - Optional admission and timeout knobs, all disabled by default
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ws_relay_proxy::{BridgeServer, Result};
//! use ws_relay_proxy::config::{BridgeConfig, ConfigValidator};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut config = BridgeConfig::default();
//!     config.listen = "0.0.0.0:3000".parse().unwrap();
//!     config.upstream = "ws://127.0.0.1:8080/api/v1/ws".to_string();
//!     config.validate()?;
//!
//!     // Accept upgrades on /ws and bridge each client to the backend
//!     let server = BridgeServer::bind(Arc::new(config)).await?;
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

// Public modules
pub mod bridge;
pub mod common;
pub mod config;

// Re-export commonly used structures and functions for convenience
pub use bridge::{bridge, bridge_router, BridgeServer, BridgeState, Frame, RelayOptions};
pub use common::{parse_socket_addr, BridgeError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
