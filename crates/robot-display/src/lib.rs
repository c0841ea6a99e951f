//! robot-display library crate.
//!
//! The display client is the consuming end of the relay: it receives the
//! broadcast command stream, replays it through a strictly sequential
//! actuator, and reports every state change to a render sink.
//!
//! ```text
//! relay (JSON over WebSocket)
//!         ↕
//! [robot-display]
//!   ├── application/
//!   │     └── actuator/    FIFO queue + single-flight execution loop
//!   └── infrastructure/
//!         ├── relay_conn/  WebSocket command channel (inbound + outbound)
//!         └── render/      RenderSink implementations
//! ```
//!
//! The display applies its *own* outbound commands only when they come back
//! through the relay — the echo round-trip is the single source of truth, so
//! every connected display replays an identical stream.

pub mod application;
pub mod infrastructure;
