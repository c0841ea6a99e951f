//! # robot-core
//!
//! Shared library for the robot relay system containing the wire protocol
//! types and the pure actor state machine.
//!
//! This crate is used by the relay server, the display client, and the
//! controller. It has zero dependencies on network sockets, async runtimes,
//! or terminal I/O.
//!
//! # System overview
//!
//! The robot relay system lets several remote controllers drive a single
//! simulated robot that lives on a bounded grid. Controllers send discrete
//! commands ("move", "turn_left") to a relay server over persistent
//! WebSocket connections; the relay rebroadcasts every command to all
//! connected peers, display clients included, so everyone observes the same
//! command stream.
//!
//! This crate defines:
//!
//! - **`protocol`** – The JSON wire format: a single-field object
//!   `{"command": "<tag>"}` decoded into a closed tagged-variant type.
//!   Unknown tags decode to an explicit no-op variant rather than failing,
//!   so new command types can be introduced without breaking old receivers.
//!
//! - **`domain`** – Pure business logic with no I/O: the `World` bounds, the
//!   four cardinal `Facing` values, and the `Actor` whose single-step state
//!   machine commits in-bounds moves and reports blocked ones.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `robot_core::Command` instead of `robot_core::domain::actor::Command`.
pub use domain::actor::{Actor, Command, Facing, StepOutcome};
pub use domain::world::{Position, World};
pub use protocol::messages::{CommandEnvelope, WireCommand};
