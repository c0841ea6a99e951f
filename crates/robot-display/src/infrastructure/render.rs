//! RenderSink implementations.
//!
//! The actual canvas (grid, walls, robot sprites, trace lines) is an
//! external collaborator; [`LogRenderer`] is its seam in this build,
//! reporting every state change as a structured log line.
//! [`RecordingRenderer`] captures the same callbacks for assertions and is
//! used by the unit, integration, and end-to-end tests.

use std::sync::Mutex;

use tracing::info;

use robot_core::domain::actor::Facing;
use robot_core::domain::world::Position;

use crate::application::actuator::RenderSink;

/// Renderer that reports state changes via `tracing`.
pub struct LogRenderer;

impl RenderSink for LogRenderer {
    fn on_position_changed(&self, from: Position, to: Position) {
        info!("robot moved {from} -> {to}");
    }

    fn on_facing_changed(&self, facing: Facing) {
        info!("robot now facing {facing}");
    }

    fn on_blocked(&self) {
        info!("robot blocked at the wall");
    }
}

/// One recorded render callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    Position { from: Position, to: Position },
    Facing(Facing),
    Blocked,
}

/// Test renderer that records every callback in order.
///
/// The std mutex is fine here: callbacks are synchronous and never held
/// across an await point.
#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in callback order.
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl RenderSink for RecordingRenderer {
    fn on_position_changed(&self, from: Position, to: Position) {
        self.events
            .lock()
            .unwrap()
            .push(RenderEvent::Position { from, to });
    }

    fn on_facing_changed(&self, facing: Facing) {
        self.events.lock().unwrap().push(RenderEvent::Facing(facing));
    }

    fn on_blocked(&self) {
        self.events.lock().unwrap().push(RenderEvent::Blocked);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
