//! Opaque frame type and socket adapters
//!
//! The relay is frame-transparent: it never inspects payloads. `Frame` is the
//! single message representation the bridge routine works with, and the
//! adapters in this module lift the two concrete socket types (a raw
//! tungstenite stream and a framework-managed axum socket) into that shape so
//! both entry points share one relay implementation.

use futures::{future, Sink, SinkExt, Stream, StreamExt};

use axum::extract::ws as axum_ws;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::common::{BridgeError, Result};

/// One WebSocket message, uninterpreted.
///
/// Text and Binary are the relayed set. Ping/Pong are answered by each leg's
/// own transport and never cross the pair. Close carries the optional close
/// code and reason so a clean shutdown initiated by one peer is visible to
/// the relay loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// UTF-8 text frame
    Text(String),
    /// Binary frame
    Binary(Vec<u8>),
    /// Ping frame (handled per-leg, not relayed)
    Ping(Vec<u8>),
    /// Pong frame (handled per-leg, not relayed)
    Pong(Vec<u8>),
    /// Close frame with optional code and reason
    Close(Option<(u16, String)>),
}

impl Frame {
    /// Whether this frame is part of the relayed set (Text or Binary)
    pub fn is_data(&self) -> bool {
        matches!(self, Frame::Text(_) | Frame::Binary(_))
    }
}

impl From<WsMessage> for Frame {
    fn from(msg: WsMessage) -> Self {
        match msg {
            WsMessage::Text(text) => Frame::Text(text),
            WsMessage::Binary(data) => Frame::Binary(data),
            WsMessage::Ping(data) => Frame::Ping(data),
            WsMessage::Pong(data) => Frame::Pong(data),
            WsMessage::Close(close) => Frame::Close(
                close.map(|c| (u16::from(c.code), c.reason.into_owned())),
            ),
            // Raw frames are not produced by a read loop; treat as opaque bytes
            WsMessage::Frame(frame) => Frame::Binary(frame.into_data()),
        }
    }
}

impl From<Frame> for WsMessage {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Text(text) => WsMessage::Text(text),
            Frame::Binary(data) => WsMessage::Binary(data),
            Frame::Ping(data) => WsMessage::Ping(data),
            Frame::Pong(data) => WsMessage::Pong(data),
            Frame::Close(close) => WsMessage::Close(close.map(|(code, reason)| CloseFrame {
                code: CloseCode::from(code),
                reason: reason.into(),
            })),
        }
    }
}

impl From<axum_ws::Message> for Frame {
    fn from(msg: axum_ws::Message) -> Self {
        match msg {
            axum_ws::Message::Text(text) => Frame::Text(text),
            axum_ws::Message::Binary(data) => Frame::Binary(data),
            axum_ws::Message::Ping(data) => Frame::Ping(data),
            axum_ws::Message::Pong(data) => Frame::Pong(data),
            axum_ws::Message::Close(close) => Frame::Close(
                close.map(|c| (c.code, c.reason.into_owned())),
            ),
        }
    }
}

impl From<Frame> for axum_ws::Message {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Text(text) => axum_ws::Message::Text(text),
            Frame::Binary(data) => axum_ws::Message::Binary(data),
            Frame::Ping(data) => axum_ws::Message::Ping(data),
            Frame::Pong(data) => axum_ws::Message::Pong(data),
            Frame::Close(close) => axum_ws::Message::Close(close.map(|(code, reason)| {
                axum_ws::CloseFrame {
                    code,
                    reason: reason.into(),
                }
            })),
        }
    }
}

/// Adapt a message-typed WebSocket into the frame-typed duplex socket the
/// bridge routine consumes.
///
/// Works for any socket whose message type converts to and from [`Frame`]
/// and whose error type converts into [`BridgeError`]: in practice the
/// tungstenite stream of the standalone listener and the axum socket of the
/// route entry point.
pub fn frame_socket<S, M, E>(
    ws: S,
) -> impl Stream<Item = Result<Frame>> + Sink<Frame, Error = BridgeError> + Unpin
where
    S: Stream<Item = std::result::Result<M, E>> + Sink<M, Error = E> + Unpin,
    M: From<Frame>,
    Frame: From<M>,
    BridgeError: From<E>,
{
    ws.map(|msg| msg.map(Frame::from).map_err(BridgeError::from))
        .sink_map_err(BridgeError::from)
        .with(|frame: Frame| future::ready(Ok::<M, BridgeError>(M::from(frame))))
}
