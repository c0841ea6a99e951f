//! Infrastructure layer for robot-relay.
//!
//! All of the relay's I/O lives here:
//!
//! - `registry` — the authoritative set of currently open peer connections
//!   and the broadcast fan-out over their outbound queues.
//! - `ws_server` — the TCP listener, WebSocket upgrade, and per-peer read
//!   loops that feed the registry.

pub mod registry;
pub mod ws_server;

pub use registry::{PeerId, PeerRegistry, RegistryError};
pub use ws_server::{RelayError, RelayServer};
