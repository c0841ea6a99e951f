//! Key-to-command mapping for the interactive controller.
//!
//! The reference bindings: `j` moves forward, `i` turns left, `q` quits.
//! Anything else is ignored so stray input never sends a frame.

use robot_core::protocol::messages::WireCommand;

/// What a key press asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerAction {
    /// Send this command to the relay.
    Send(WireCommand),
    /// Exit the controller.
    Quit,
}

/// Maps one key press to its action, case-insensitively.
pub fn map_key(key: char) -> Option<ControllerAction> {
    match key.to_ascii_lowercase() {
        'j' => Some(ControllerAction::Send(WireCommand::Move)),
        'i' => Some(ControllerAction::Send(WireCommand::TurnLeft)),
        'q' => Some(ControllerAction::Quit),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
