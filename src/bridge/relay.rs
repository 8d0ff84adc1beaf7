//! Frame relay module
//!
//! This module implements the bridge routine shared by both entry points:
//! one upstream connection per client socket, verbatim frame forwarding in
//! both directions, and coupled teardown of the pair.

use std::time::Duration;

use futures::{Sink, SinkExt, Stream, StreamExt};
use log::{debug, error, info};
use metrics::counter;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::common::{BridgeError, Result};
use crate::config::BridgeConfig;
use super::frame::{frame_socket, Frame};

/// Per-pair relay knobs
///
/// Both timeouts are disabled by default. When unset, the upstream connect
/// and the pair lifetime are unbounded.
#[derive(Debug, Clone, Default)]
pub struct RelayOptions {
    /// Maximum time to wait for the upstream open handshake
    pub connect_timeout: Option<Duration>,
    /// Maximum time a pair may sit with no frames in either direction
    pub idle_timeout: Option<Duration>,
}

impl RelayOptions {
    /// Build relay options from the relay configuration
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout.map(Duration::from_secs),
            idle_timeout: config.idle_timeout.map(Duration::from_secs),
        }
    }
}

/// The next thing that happened on either half of a pair
enum Event {
    Client(Option<Result<Frame>>),
    Upstream(Option<Result<Frame>>),
}

async fn next_event<C, U>(client: &mut C, upstream: &mut U) -> Event
where
    C: Stream<Item = Result<Frame>> + Unpin,
    U: Stream<Item = Result<Frame>> + Unpin,
{
    tokio::select! {
        frame = client.next() => Event::Client(frame),
        frame = upstream.next() => Event::Upstream(frame),
    }
}

/// Open the upstream connection, optionally bounded by a connect timeout
async fn connect_upstream(
    url: &str,
    connect_timeout: Option<Duration>,
) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>> {
    let attempt = connect_async(url);
    let (ws, _response) = match connect_timeout {
        Some(limit) => timeout(limit, attempt)
            .await
            .map_err(|_| {
                BridgeError::UpstreamConnect(format!("{} did not open within {:?}", url, limit))
            })?
            .map_err(|e| BridgeError::UpstreamConnect(e.to_string()))?,
        None => attempt
            .await
            .map_err(|e| BridgeError::UpstreamConnect(e.to_string()))?,
    };
    Ok(ws)
}

/// Bridge one client socket to the upstream endpoint
///
/// Opens exactly one upstream WebSocket connection, then relays Text and
/// Binary frames verbatim in both directions until either side closes or
/// errors, at which point the other side is closed as well. The returned
/// future resolves only once both halves are closed.
///
/// Client data frames that arrive while the upstream handshake is still in
/// flight are dropped, not queued; the drop count is logged at debug level.
///
/// # Parameters
///
/// * `client` - An already-upgraded client socket in frame form
/// * `upstream_url` - The fixed backend WebSocket endpoint
/// * `pair_id` - Identifier for this pair, used in log lines
/// * `options` - Relay timeout knobs
///
/// # Errors
///
/// Returns an error only when the upstream connection cannot be opened.
/// Mid-session transport errors tear the pair down and are reported through
/// the log, not the return value.
pub async fn bridge<S>(
    client: S,
    upstream_url: &str,
    pair_id: u64,
    options: &RelayOptions,
) -> Result<()>
where
    S: Stream<Item = Result<Frame>> + Sink<Frame, Error = BridgeError> + Unpin,
{
    let (mut client_tx, mut client_rx) = client.split();

    // Open the upstream half, draining the client concurrently so frames
    // sent before the upstream is open are consumed and discarded rather
    // than left to queue.
    let connect = connect_upstream(upstream_url, options.connect_timeout);
    tokio::pin!(connect);

    let mut dropped: u64 = 0;
    let upstream = loop {
        tokio::select! {
            result = &mut connect => match result {
                Ok(ws) => break ws,
                Err(e) => {
                    counter!("bridge_upstream_connect_failures_total").increment(1);
                    let _ = client_tx.close().await;
                    return Err(e);
                }
            },
            frame = client_rx.next() => match frame {
                Some(Ok(frame)) if frame.is_data() => dropped += 1,
                Some(Ok(Frame::Close(_))) | None => {
                    debug!("pair {}: client closed before upstream opened", pair_id);
                    let _ = client_tx.close().await;
                    return Ok(());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!("pair {}: client error before upstream opened: {}", pair_id, e);
                    let _ = client_tx.close().await;
                    return Ok(());
                }
            },
        }
    };

    if dropped > 0 {
        debug!(
            "pair {}: dropped {} client frame(s) sent before upstream opened",
            pair_id, dropped
        );
    }

    let (mut upstream_tx, mut upstream_rx) = frame_socket(upstream).split();
    info!("pair {}: upstream connected, relaying", pair_id);

    let mut to_upstream: u64 = 0;
    let mut to_client: u64 = 0;

    loop {
        let event = match options.idle_timeout {
            Some(limit) => {
                match timeout(limit, next_event(&mut client_rx, &mut upstream_rx)).await {
                    Ok(event) => event,
                    Err(_) => {
                        info!("pair {}: idle for {:?}, closing", pair_id, limit);
                        break;
                    }
                }
            }
            None => next_event(&mut client_rx, &mut upstream_rx).await,
        };

        match event {
            Event::Client(Some(Ok(frame))) if frame.is_data() => {
                if let Err(e) = upstream_tx.send(frame).await {
                    error!("pair {}: upstream send failed: {}", pair_id, e);
                    break;
                }
                to_upstream += 1;
                counter!("bridge_frames_relayed_total", "direction" => "client_to_upstream")
                    .increment(1);
            }
            Event::Client(Some(Ok(Frame::Close(_)))) | Event::Client(None) => {
                debug!("pair {}: client closed", pair_id);
                break;
            }
            // Ping/Pong, answered by the transport on each leg
            Event::Client(Some(Ok(_))) => {}
            Event::Client(Some(Err(e))) => {
                error!("pair {}: client error: {}", pair_id, e);
                break;
            }
            Event::Upstream(Some(Ok(frame))) if frame.is_data() => {
                if let Err(e) = client_tx.send(frame).await {
                    error!("pair {}: client send failed: {}", pair_id, e);
                    break;
                }
                to_client += 1;
                counter!("bridge_frames_relayed_total", "direction" => "upstream_to_client")
                    .increment(1);
            }
            Event::Upstream(Some(Ok(Frame::Close(_)))) | Event::Upstream(None) => {
                debug!("pair {}: upstream closed", pair_id);
                break;
            }
            Event::Upstream(Some(Ok(_))) => {}
            Event::Upstream(Some(Err(e))) => {
                error!("pair {}: upstream error: {}", pair_id, e);
                break;
            }
        }
    }

    // Whichever side ended the pair, close both halves before returning.
    let _ = client_tx.close().await;
    let _ = upstream_tx.close().await;

    debug!(
        "pair {}: relayed {} frame(s) client to upstream, {} upstream to client",
        pair_id, to_upstream, to_client
    );

    Ok(())
}
