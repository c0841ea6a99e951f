//! WebSocket relay server: accept loop and per-peer read loops.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Upgrading each accepted connection to a WebSocket session.
//! 3. Registering the peer in the [`PeerRegistry`] with a bounded outbound
//!    queue drained by a dedicated writer task.
//! 4. Running a read loop per peer: every decodable command frame is
//!    rebroadcast to **all** registered peers — the sender included. The
//!    echo is deliberate: controllers rely on the round-trip for
//!    confirmation, and the display applies its own commands only when they
//!    come back through the relay.
//! 5. Removing the peer from the registry on disconnect or transport error.
//!
//! # Failure containment
//!
//! A malformed frame from one peer is logged and discarded; the connection
//! stays open and no other peer is affected. A broken connection is removed
//! and never reconnected from the server side. Neither is ever fatal to the
//! process.
//!
//! # Scalability
//!
//! Each peer runs in its own Tokio task. The accept loop never blocks on a
//! session: it registers the connection and immediately goes back to
//! `accept()`. Because broadcast only queues onto per-peer channels, a slow
//! peer delays nobody but itself.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};

use robot_core::protocol::messages::CommandEnvelope;

use crate::domain::config::RelayConfig;
use crate::infrastructure::registry::{PeerRegistry, OUTBOUND_QUEUE_CAPACITY};

/// Error type for relay server startup.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("bind failed on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// A bound, not-yet-running relay server.
///
/// Binding and running are split so tests can bind port 0 and read the
/// ephemeral port back through [`RelayServer::local_addr`] before starting
/// the accept loop.
pub struct RelayServer {
    listener: TcpListener,
    registry: Arc<PeerRegistry>,
}

impl RelayServer {
    /// Binds the TCP listener for `config.bind_addr`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::BindFailed`] when the address is unavailable
    /// (port in use, missing privileges).
    pub async fn bind(config: &RelayConfig) -> Result<Self, RelayError> {
        let listener =
            TcpListener::bind(config.bind_addr)
                .await
                .map_err(|source| RelayError::BindFailed {
                    addr: config.bind_addr,
                    source,
                })?;
        Ok(Self {
            listener,
            registry: Arc::new(PeerRegistry::new()),
        })
    }

    /// The address the listener actually bound (resolves port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared handle to the peer registry.
    pub fn registry(&self) -> Arc<PeerRegistry> {
        Arc::clone(&self.registry)
    }

    /// Runs the accept loop until `running` is cleared.
    ///
    /// Each accepted connection is handed to a dedicated Tokio task; peer
    /// tasks outlive the accept loop only until their connections close.
    pub async fn run(self, running: Arc<AtomicBool>) {
        match self.listener.local_addr() {
            Ok(addr) => info!("relay listening on ws://{addr}"),
            Err(_) => info!("relay listening"),
        }

        loop {
            if !running.load(Ordering::Relaxed) {
                info!("shutdown flag set; stopping accept loop");
                break;
            }

            // Short timeout on accept() so the loop can re-check the
            // shutdown flag even when nobody is connecting.
            let accept_result = timeout(Duration::from_millis(200), self.listener.accept()).await;

            match accept_result {
                Ok(Ok((stream, peer_addr))) => {
                    let registry = Arc::clone(&self.registry);
                    tokio::spawn(async move {
                        handle_peer(stream, peer_addr, registry).await;
                    });
                }
                Ok(Err(e)) => {
                    // Transient accept error (e.g. fd exhaustion). Keep serving.
                    error!("accept error: {e}");
                }
                Err(_) => {
                    // Timeout; loop back to the flag check.
                }
            }
        }
    }
}

// ── Per-peer handler ──────────────────────────────────────────────────────────

/// Runs the complete lifecycle of one peer connection.
///
/// Upgrades the TCP stream to a WebSocket session, registers the peer, and
/// then reads frames until the connection ends. The registry entry is the
/// only long-lived sender for the peer's outbound queue, so removing it lets
/// the writer task drain and exit on its own.
async fn handle_peer(raw_stream: TcpStream, peer_addr: SocketAddr, registry: Arc<PeerRegistry>) {
    let ws_stream = match accept_async(raw_stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake failed with {peer_addr}: {e}");
            return;
        }
    };

    let peer_id = registry.next_peer_id();
    info!("peer {peer_id} connected from {peer_addr}");

    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    // Bounded outbound queue; the registry holds the sender, this writer
    // task drains the receiver into the WebSocket sink.
    let (out_tx, mut out_rx) = mpsc::channel::<String>(OUTBOUND_QUEUE_CAPACITY);

    if let Err(e) = registry.add(peer_id, out_tx).await {
        // Ids come from an atomic counter, so a collision means the accept
        // loop itself is broken. Surface it loudly and refuse the peer.
        error!("peer {peer_id}: registration failed: {e}");
        return;
    }

    let writer_task = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if ws_tx.send(WsMessage::Text(frame)).await.is_err() {
                debug!("peer {peer_id}: write failed (disconnected)");
                break;
            }
        }
        // Best-effort close; the peer may already be gone.
        let _ = ws_tx.close().await;
    });

    // ── Read loop ─────────────────────────────────────────────────────────────
    loop {
        let ws_msg = match ws_rx.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                debug!("peer {peer_id}: connection closed");
                break;
            }
            Some(Err(e)) => {
                warn!("peer {peer_id}: transport error: {e}");
                break;
            }
            None => {
                debug!("peer {peer_id}: stream ended");
                break;
            }
        };

        match ws_msg {
            WsMessage::Text(payload) => {
                // Validity gate only: the relay never interprets the
                // command tag, it re-encodes the canonical envelope and
                // fans it out (unknown tags pass through untouched).
                let envelope = match CommandEnvelope::decode(&payload) {
                    Ok(env) => env,
                    Err(e) => {
                        // One bad frame must not end the session or leak
                        // to other peers.
                        warn!("peer {peer_id}: discarding malformed frame: {e}");
                        continue;
                    }
                };

                debug!(
                    "peer {peer_id}: command {:?}",
                    envelope.command.as_deref().unwrap_or("<none>")
                );

                let delivered = registry.broadcast_all(&envelope.encode()).await;
                debug!("peer {peer_id}: broadcast queued to {delivered} peer(s)");
            }

            WsMessage::Binary(_) => {
                // The wire protocol is JSON text only.
                warn!("peer {peer_id}: unexpected binary frame (ignored)");
            }

            WsMessage::Ping(data) => {
                // tokio-tungstenite replies with Pong automatically on the
                // next sink write.
                debug!("peer {peer_id}: ping ({} bytes)", data.len());
            }

            WsMessage::Pong(_) => {
                debug!("peer {peer_id}: pong received");
            }

            WsMessage::Close(_) => {
                debug!("peer {peer_id}: close frame received");
                break;
            }

            WsMessage::Frame(_) => {
                debug!("peer {peer_id}: raw frame (ignored)");
            }
        }
    }

    // Dropping the registry entry closes the outbound queue, which ends the
    // writer task once the queue drains.
    registry.remove(peer_id).await;
    let _ = writer_task.await;
    info!("peer {peer_id} disconnected");
}
