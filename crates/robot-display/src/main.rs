//! Robot display client — entry point.
//!
//! Connects to the relay, replays the broadcast command stream through the
//! sequential actuator, and logs every actor state change. The pixel canvas
//! of the original display is out of scope here; [`LogRenderer`] sits at
//! its seam.
//!
//! # Usage
//!
//! ```text
//! robot-display [OPTIONS]
//!
//! Options:
//!   --relay-url <URL>  Relay WebSocket URL [default: ws://[::1]:8765]
//!   --width <CELLS>    World width          [default: 10]
//!   --height <CELLS>   World height         [default: 10]
//!   --start-x <CELL>   Actor start column   [default: 0]
//!   --start-y <CELL>   Actor start row      [default: 0]
//! ```
//!
//! Environment override: `ROBOT_RELAY_URL`. The actor starts facing East,
//! matching the reference display.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use robot_core::domain::actor::{Actor, Facing};
use robot_core::domain::world::{Position, World};
use robot_display::application::ActuatorQueue;
use robot_display::infrastructure::{CommandChannel, LogRenderer};

/// Display client for the robot relay system.
#[derive(Debug, Parser)]
#[command(name = "robot-display", about = "Replays the relayed command stream against the shared actor", version)]
struct Cli {
    /// WebSocket URL of the relay server.
    #[arg(long, default_value = "ws://[::1]:8765", env = "ROBOT_RELAY_URL")]
    relay_url: String,

    /// World width in cells.
    #[arg(long, default_value_t = 10)]
    width: u32,

    /// World height in cells.
    #[arg(long, default_value_t = 10)]
    height: u32,

    /// Actor start column (0-indexed).
    #[arg(long, default_value_t = 0)]
    start_x: i32,

    /// Actor start row (0-indexed).
    #[arg(long, default_value_t = 0)]
    start_y: i32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let (world, start) = build_geometry(cli.width, cli.height, cli.start_x, cli.start_y)?;
    let actor = Actor::new(&world, start, Facing::East);

    info!(
        "display starting: {}x{} world, actor at {start} facing E",
        cli.width, cli.height
    );

    // Single consumer loop; its handle is the only way commands reach the actor.
    let queue = ActuatorQueue::new(world, actor, Arc::new(LogRenderer));
    let (actuator, _join) = queue.spawn();

    let channel = CommandChannel::connect(&cli.relay_url, actuator)
        .await
        .context("relay connection failed")?;

    // Run until the relay goes away or the user interrupts.
    tokio::select! {
        _ = channel.closed() => {
            info!("relay connection closed");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    info!("display stopped");
    Ok(())
}

/// Validates CLI geometry before constructing anything that asserts.
///
/// Bad flag values are operator input, so they surface as errors rather
/// than panics.
fn build_geometry(
    width: u32,
    height: u32,
    start_x: i32,
    start_y: i32,
) -> anyhow::Result<(World, Position)> {
    anyhow::ensure!(
        width > 0 && height > 0,
        "world dimensions must be positive, got {width}x{height}"
    );
    let world = World::new(width, height);
    let start = Position::new(start_x, start_y);
    anyhow::ensure!(
        world.contains(start),
        "start position {start} outside {width}x{height} world"
    );
    Ok((world, start))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_geometry_accepts_valid_flags() {
        let (world, start) = build_geometry(10, 10, 1, 1).unwrap();
        assert_eq!((world.width(), world.height()), (10, 10));
        assert_eq!(start, Position::new(1, 1));
    }

    #[test]
    fn test_build_geometry_rejects_zero_dimensions_without_panicking() {
        assert!(build_geometry(0, 10, 0, 0).is_err());
        assert!(build_geometry(10, 0, 0, 0).is_err());
    }

    #[test]
    fn test_build_geometry_rejects_out_of_bounds_start() {
        assert!(build_geometry(10, 10, 10, 1).is_err());
        assert!(build_geometry(10, 10, 0, -1).is_err());
    }
}
