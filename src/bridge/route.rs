//! Route entry point module
//!
//! The relay can also live inside an existing axum application as a single
//! upgrade route. This is the framework-route twin of the standalone
//! listener: both adapt their socket into frame form and call the same
//! bridge routine. The router state is constructed once at startup and
//! passed in explicitly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use log::error;
use metrics::{counter, gauge};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::config::BridgeConfig;

use super::frame::frame_socket;
use super::relay::{bridge, RelayOptions};

/// Shared state for the relay route
#[derive(Clone)]
pub struct BridgeState {
    /// The fixed backend WebSocket endpoint
    upstream: Arc<str>,
    /// Relay timeout knobs
    options: RelayOptions,
    /// Pair id source for log correlation
    next_pair_id: Arc<AtomicU64>,
}

impl BridgeState {
    /// Build route state from the relay configuration
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            upstream: Arc::from(config.upstream.as_str()),
            options: RelayOptions::from_config(config),
            next_pair_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

/// Build a router exposing the relay at `ws_path` plus a health endpoint
///
/// The returned router can be served on its own or nested into a larger
/// application.
pub fn bridge_router(state: BridgeState, ws_path: &str) -> Router {
    Router::new()
        .route(ws_path, get(upgrade_handler))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Accept a WebSocket upgrade and bridge the socket to the upstream endpoint
async fn upgrade_handler(
    ws: WebSocketUpgrade,
    State(state): State<BridgeState>,
) -> impl IntoResponse {
    let pair_id = state.next_pair_id.fetch_add(1, Ordering::Relaxed);

    ws.on_upgrade(move |socket| async move {
        counter!("bridge_pairs_total").increment(1);
        gauge!("bridge_pairs_active").increment(1.0);

        let result = bridge(
            frame_socket(socket),
            &state.upstream,
            pair_id,
            &state.options,
        )
        .await;

        gauge!("bridge_pairs_active").decrement(1.0);
        if let Err(e) = result {
            error!("pair {}: {}", pair_id, e);
        }
    })
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": crate::APP_NAME,
        "version": crate::VERSION,
    }))
}
