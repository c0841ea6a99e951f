//! JSON message types for the relay wire protocol.
//!
//! Every frame, in both directions, is one single-level JSON object with a
//! single recognised field:
//!
//! ```json
//! {"command": "move"}
//! {"command": "turn_left"}
//! ```
//!
//! # Forward compatibility
//!
//! Receivers must tolerate command tags they do not understand and extra
//! fields they have never seen — ignore, never reject. Two types enforce the
//! two halves of that policy:
//!
//! - [`WireCommand`] is the *closed* decoding used by actuating clients: an
//!   internally tagged enum whose `#[serde(other)] Unknown` variant absorbs
//!   unrecognised tags so they become an explicit no-op.
//! - [`CommandEnvelope`] is the *loose* decoding used by the relay, which
//!   must not interpret commands at all: it only checks that a frame is a
//!   well-formed object and re-encodes the canonical single-field form,
//!   passing unknown tags through untouched.

use serde::{Deserialize, Serialize};

// ── Typed command frames ──────────────────────────────────────────────────────

/// A decoded command frame, as seen by an actuating client.
///
/// # Serde representation
///
/// ```json
/// {"command":"move"}
/// {"command":"turn_left"}
/// ```
///
/// `tag = "command"` makes serde read the `"command"` field to pick the
/// variant; `rename_all = "snake_case"` maps `TurnLeft` to `"turn_left"`.
/// Extra fields in the object are ignored by serde's default behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WireCommand {
    /// Advance the actor one cell in its current facing.
    Move,
    /// Rotate the actor 90° counter-clockwise.
    TurnLeft,
    /// Any command tag this build does not recognise.
    ///
    /// Decoding an unknown tag lands here instead of failing, so a newer
    /// controller talking through the same relay does not break older
    /// displays. Receivers treat it as a no-op.
    #[serde(other)]
    Unknown,
}

impl WireCommand {
    /// Maps a wire frame to the typed actuator command, if it has one.
    ///
    /// `Unknown` maps to `None` — the explicit "ignore this frame" signal.
    /// The wire only ever carries single-step moves.
    pub fn into_command(self) -> Option<crate::domain::actor::Command> {
        use crate::domain::actor::Command;
        match self {
            WireCommand::Move => Some(Command::Move(1)),
            WireCommand::TurnLeft => Some(Command::TurnLeft),
            WireCommand::Unknown => None,
        }
    }

    /// Encodes this command as a canonical wire frame.
    pub fn to_json(self) -> String {
        // An internally tagged unit variant cannot fail to serialize.
        serde_json::to_string(&self).unwrap_or_else(|_| String::from(r#"{"command":null}"#))
    }
}

// ── Relay envelope ────────────────────────────────────────────────────────────

/// The relay's uninterpreted view of a command frame.
///
/// The relay rebroadcasts whatever tag it received, known or not; decoding
/// into this envelope is only a validity gate against non-JSON garbage.
/// A frame without a `"command"` field still broadcasts (as
/// `{"command":null}`), matching the single-field canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    #[serde(default)]
    pub command: Option<String>,
}

impl CommandEnvelope {
    /// Decodes an inbound text frame.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the payload is not a JSON object;
    /// callers log it and discard the single frame.
    pub fn decode(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Re-encodes the canonical single-field broadcast frame.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from(r#"{"command":null}"#))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
