//! Connection bridge module
//!
//! This module implements the core functionality of the relay: accepting
//! client WebSocket connections, opening one upstream connection per client,
//! and relaying frames in both directions until either side terminates.
//!
//! Two entry points share one bridge routine: the standalone listener
//! ([`BridgeServer`]) and the embeddable axum route ([`bridge_router`]).

mod frame;
mod handler;
mod relay;
mod route;
pub mod server;

pub use frame::{frame_socket, Frame};
pub use relay::{bridge, RelayOptions};
pub use route::{bridge_router, BridgeState};
pub use server::BridgeServer;
