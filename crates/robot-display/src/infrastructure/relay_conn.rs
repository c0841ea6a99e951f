//! CommandChannel: the display's persistent connection to the relay.
//!
//! One WebSocket, two directions:
//!
//! - **Inbound**: every broadcast text frame is decoded into a
//!   [`WireCommand`]; recognised commands are enqueued on the actuator,
//!   unknown tags are skipped (forward compatibility), undecodable frames
//!   are logged and discarded without closing the connection.
//! - **Outbound**: locally generated commands are queued through
//!   [`CommandChannel::send`] and written by a dedicated writer task. The
//!   display does not apply them locally — it waits for the relay echo like
//!   every other peer, so all displays replay the same stream.

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, info, warn};

use robot_core::protocol::messages::WireCommand;

use crate::application::actuator::ActuatorHandle;

/// A connected, running command channel.
pub struct CommandChannel {
    out_tx: mpsc::UnboundedSender<WireCommand>,
    reader: JoinHandle<()>,
}

impl CommandChannel {
    /// Connects to the relay at `url` and starts the reader/writer tasks.
    ///
    /// Inbound commands are fed to `actuator`; the channel runs until the
    /// relay closes the connection (there is no client-side reconnect — a
    /// disconnected display simply stops following the actor).
    ///
    /// # Errors
    ///
    /// Returns an error when the WebSocket connection cannot be
    /// established.
    pub async fn connect(url: &str, actuator: ActuatorHandle) -> anyhow::Result<Self> {
        let (ws_stream, _response) = connect_async(url)
            .await
            .with_context(|| format!("failed to connect to relay at {url}"))?;
        info!("connected to relay at {url}");

        let (mut ws_tx, mut ws_rx) = ws_stream.split();

        // ── Writer: local commands → relay ────────────────────────────────────
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<WireCommand>();
        tokio::spawn(async move {
            while let Some(command) = out_rx.recv().await {
                if ws_tx.send(WsMessage::Text(command.to_json())).await.is_err() {
                    debug!("outbound send failed (relay disconnected)");
                    break;
                }
            }
            let _ = ws_tx.close().await;
        });

        // ── Reader: relay broadcast → actuator ────────────────────────────────
        let reader = tokio::spawn(async move {
            loop {
                let ws_msg = match ws_rx.next().await {
                    Some(Ok(msg)) => msg,
                    Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                        debug!("relay connection closed");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("relay transport error: {e}");
                        break;
                    }
                    None => {
                        debug!("relay stream ended");
                        break;
                    }
                };

                match ws_msg {
                    WsMessage::Text(payload) => {
                        let wire: WireCommand = match serde_json::from_str(&payload) {
                            Ok(w) => w,
                            Err(e) => {
                                // One bad frame is the sender's problem,
                                // not this connection's.
                                warn!("discarding malformed frame: {e}");
                                continue;
                            }
                        };
                        match wire.into_command() {
                            Some(command) => {
                                if !actuator.enqueue(command) {
                                    warn!("actuator gone; closing command channel");
                                    break;
                                }
                            }
                            None => {
                                debug!("ignoring unknown command tag");
                            }
                        }
                    }
                    WsMessage::Binary(_) => {
                        warn!("unexpected binary frame from relay (ignored)");
                    }
                    WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => {}
                    WsMessage::Close(_) => {
                        debug!("close frame from relay");
                        break;
                    }
                }
            }
        });

        Ok(Self { out_tx, reader })
    }

    /// Queues a locally generated command for the relay.
    ///
    /// Fire-and-forget: the command takes effect when it comes back in the
    /// broadcast. Returns `false` once the writer task has shut down.
    pub fn send(&self, command: WireCommand) -> bool {
        self.out_tx.send(command).is_ok()
    }

    /// Resolves when the relay connection has closed.
    pub async fn closed(self) {
        let _ = self.reader.await;
    }
}
