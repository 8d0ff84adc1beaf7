//! Connection handler module
//!
//! This module handles individual client connections on the standalone
//! listener: it performs the WebSocket upgrade, gating on the configured
//! request path, then hands the socket to the bridge routine.

use log::debug;
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;

use crate::common::Result;
use crate::config::BridgeConfig;

use super::frame::frame_socket;
use super::relay::{bridge, RelayOptions};

/// Handle a single client connection
///
/// Upgrades the raw TCP stream to a WebSocket, rejecting any request whose
/// path does not match the configured upgrade path (the connection is
/// destroyed, no upgrade is performed), then bridges the socket to the
/// upstream endpoint until the pair tears down.
///
/// # Parameters
///
/// * `stream` - Client TCP stream, pre-upgrade
/// * `peer` - Client remote address
/// * `pair_id` - Identifier for this pair, used in log lines
/// * `config` - Relay configuration
pub async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    pair_id: u64,
    config: &BridgeConfig,
) -> Result<()> {
    let expected = config.ws_path.clone();
    let check_path = move |request: &Request, response: Response| {
        let path = request.uri().path();
        if path == expected {
            Ok(response)
        } else {
            debug!("rejecting upgrade from {} on path {}", peer, path);
            let mut response = ErrorResponse::new(Some("not found".to_string()));
            *response.status_mut() = StatusCode::NOT_FOUND;
            Err(response)
        }
    };

    let ws = accept_hdr_async(stream, check_path).await?;
    debug!("pair {}: accepted upgrade from {}", pair_id, peer);

    bridge(
        frame_socket(ws),
        &config.upstream,
        pair_id,
        &RelayOptions::from_config(config),
    )
    .await
}
