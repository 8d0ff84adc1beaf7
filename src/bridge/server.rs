//! Relay server module
//!
//! This module implements the standalone listener entry point: it accepts
//! inbound connections, performs admission control when configured, and runs
//! one bridge pair per accepted connection.

use log::{debug, error, info, warn};
use metrics::{counter, gauge};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

use crate::common::{BridgeError, Result};
use crate::config::BridgeConfig;

use super::handler::handle_connection;

/// How long shutdown waits for active pairs to drain before aborting them
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Standalone relay server
///
/// Accepts inbound WebSocket upgrade requests on the configured listen
/// address and runs one bridge pair per accepted connection. Pairs are
/// independent; closing one has no effect on the others.
pub struct BridgeServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    config: Arc<BridgeConfig>,
}

impl BridgeServer {
    /// Bind the listen socket
    ///
    /// Binding is separate from [`run`](Self::run) so a caller can bind port
    /// 0 and read the assigned address before serving.
    pub async fn bind(config: Arc<BridgeConfig>) -> Result<Self> {
        let listener = TcpListener::bind(config.listen).await.map_err(BridgeError::Io)?;
        let local_addr = listener.local_addr().map_err(BridgeError::Io)?;
        Ok(Self {
            listener,
            local_addr,
            config,
        })
    }

    /// The address the server is listening on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run the relay service until the process ends
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Run the relay service until the shutdown future resolves
    ///
    /// On shutdown the accept loop stops and active pairs are given a
    /// bounded drain window before being aborted.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!("Relay service started, listening on {}", self.local_addr);
        info!("Bridging {} to {}", self.config.ws_path, self.config.upstream);

        let mut tasks: JoinSet<Result<()>> = JoinSet::new();
        let mut active: usize = 0;
        let mut next_pair_id: u64 = 0;

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer)) => {
                            if let Some(max) = self.config.max_pairs {
                                if active >= max {
                                    warn!(
                                        "refusing connection from {}: {} active pair(s), limit {}",
                                        peer, active, max
                                    );
                                    drop(stream);
                                    continue;
                                }
                            }

                            active += 1;
                            next_pair_id += 1;
                            let pair_id = next_pair_id;

                            counter!("bridge_pairs_total").increment(1);
                            gauge!("bridge_pairs_active").increment(1.0);
                            info!("pair {}: accepted connection from {}", pair_id, peer);

                            let config = Arc::clone(&self.config);
                            tasks.spawn(async move {
                                handle_connection(stream, peer, pair_id, &config).await
                            });
                        }
                        Err(e) => {
                            error!("Error accepting connection: {}", e);
                        }
                    }
                }

                // Reap completed pairs and log any errors
                Some(result) = tasks.join_next() => {
                    active = active.saturating_sub(1);
                    gauge!("bridge_pairs_active").decrement(1.0);
                    match result {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => error!("Connection error: {}", e),
                        Err(e) => error!("Task error: {}", e),
                    }
                }

                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }

            if active > 0 && active % 100 == 0 {
                info!("Active pairs: {}", active);
            }
        }

        // Drain active pairs with a bounded wait
        if !tasks.is_empty() {
            info!("Waiting for {} active pair(s) to finish...", active);
            let drain = async {
                while let Some(result) = tasks.join_next().await {
                    if let Ok(Err(e)) = result {
                        error!("Connection error during shutdown: {}", e);
                    }
                }
            };
            if tokio::time::timeout(SHUTDOWN_TIMEOUT, drain).await.is_err() {
                warn!(
                    "Shutdown timeout reached after {:?}, aborting remaining pairs",
                    SHUTDOWN_TIMEOUT
                );
                tasks.shutdown().await;
            }
            gauge!("bridge_pairs_active").set(0.0);
        }

        debug!("Accepted {} connection(s) over the server lifetime", next_pair_id);
        info!("Relay service shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_assigns_port() {
        let mut config = BridgeConfig::default();
        config.listen = "127.0.0.1:0".parse().unwrap();

        let server = BridgeServer::bind(Arc::new(config)).await.unwrap();
        assert_ne!(server.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_rejects_busy_port() {
        let mut config = BridgeConfig::default();
        config.listen = "127.0.0.1:0".parse().unwrap();
        let first = BridgeServer::bind(Arc::new(config.clone())).await.unwrap();

        config.listen = first.local_addr();
        let second = BridgeServer::bind(Arc::new(config)).await;
        assert!(second.is_err(), "Should fail to bind an occupied port");
    }
}
