//! Infrastructure layer for robot-display.
//!
//! - `relay_conn` — the WebSocket command channel to the relay (inbound
//!   decode → actuator, outbound local commands → relay).
//! - `render` — [`crate::application::RenderSink`] implementations: the
//!   tracing-backed renderer and the recording test double.

pub mod relay_conn;
pub mod render;

pub use relay_conn::CommandChannel;
pub use render::{LogRenderer, RecordingRenderer, RenderEvent};
