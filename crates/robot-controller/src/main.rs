//! Robot controller — entry point.
//!
//! Reads keys from stdin and sends the corresponding command frames to the
//! relay over one persistent WebSocket connection. The relay echoes every
//! frame back (that is how the display confirms motion); the controller
//! drains and discards its copy of the broadcast.
//!
//! Input is line-based: type any mix of bound keys and press Enter, and
//! each character is sent as one command, in order — `jjji<Enter>` queues
//! three moves and a turn. `q` exits.
//!
//! # Usage
//!
//! ```text
//! robot-controller [--relay-url <URL>]     # default ws://[::1]:8765
//! ```
//!
//! Environment override: `ROBOT_RELAY_URL`.

mod input;

use anyhow::Context;
use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use crate::input::{map_key, ControllerAction};

/// Interactive controller for the robot relay system.
#[derive(Debug, Parser)]
#[command(name = "robot-controller", about = "Sends keyboard commands to the robot relay", version)]
struct Cli {
    /// WebSocket URL of the relay server.
    #[arg(long, default_value = "ws://[::1]:8765", env = "ROBOT_RELAY_URL")]
    relay_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let (ws_stream, _response) = connect_async(&cli.relay_url)
        .await
        .with_context(|| format!("failed to connect to relay at {}", cli.relay_url))?;
    info!("connected to relay at {}", cli.relay_url);

    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    // Drain the echo so the socket never backs up; the controller has no
    // actor to drive.
    tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            if let WsMessage::Text(frame) = msg {
                debug!("echo: {frame}");
            }
        }
    });

    println!("press 'j' to move, 'i' to turn left, 'q' to quit (Enter to submit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    'outer: while let Some(line) = lines.next_line().await.context("stdin read failed")? {
        for key in line.chars() {
            match map_key(key) {
                Some(ControllerAction::Send(command)) => {
                    ws_tx
                        .send(WsMessage::Text(command.to_json()))
                        .await
                        .context("send to relay failed")?;
                    info!("sent {}", command.to_json());
                }
                Some(ControllerAction::Quit) => break 'outer,
                None => {}
            }
        }
    }

    let _ = ws_tx.close().await;
    info!("controller stopped");
    Ok(())
}
