//! Robot relay server — entry point.
//!
//! Accepts persistent WebSocket connections from controllers and displays
//! and rebroadcasts every inbound command frame to all connected peers,
//! sender included. The relay is single-topic: every peer sees every
//! command, and the display's actuator replays them against the shared
//! actor.
//!
//! # Usage
//!
//! ```text
//! robot-relay [OPTIONS]
//!
//! Options:
//!   --bind <ADDR>   IP address to listen on [default: ::]
//!   --port <PORT>   TCP port to listen on   [default: 8765]
//! ```
//!
//! Environment overrides: `ROBOT_RELAY_BIND`, `ROBOT_RELAY_PORT`. CLI args
//! take precedence. Log level via `RUST_LOG`.

use std::net::{IpAddr, SocketAddr};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use robot_relay::domain::RelayConfig;
use robot_relay::infrastructure::RelayServer;

/// Broadcast relay for robot commands.
///
/// Every JSON command frame received from any peer is fanned out to every
/// currently connected peer over its own WebSocket connection.
#[derive(Debug, Parser)]
#[command(name = "robot-relay", about = "WebSocket broadcast relay for robot commands", version)]
struct Cli {
    /// IP address to bind the listener to.
    ///
    /// The default `::` (IPv6 wildcard) also accepts IPv4 connections on
    /// dual-stack hosts. Use `127.0.0.1` to accept only local peers.
    #[arg(long, default_value = "::", env = "ROBOT_RELAY_BIND")]
    bind: IpAddr,

    /// TCP port for the WebSocket listener.
    #[arg(long, default_value_t = 8765, env = "ROBOT_RELAY_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging. Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = RelayConfig {
        bind_addr: SocketAddr::new(cli.bind, cli.port),
    };

    info!("robot relay starting");

    let server = RelayServer::bind(&config)
        .await
        .with_context(|| format!("failed to bind relay listener on {}", config.bind_addr))?;

    // Shutdown flag cleared by Ctrl-C.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    server.run(running).await;

    info!("robot relay stopped");
    Ok(())
}
