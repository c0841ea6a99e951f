//! Wire protocol module: the JSON command format shared by every peer.

pub mod messages;

pub use messages::{CommandEnvelope, WireCommand};
