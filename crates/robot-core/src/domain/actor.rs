//! The actor state machine.
//!
//! An [`Actor`] is the simulated robot: a grid [`Position`] plus a cardinal
//! [`Facing`]. The only mutations are the two discrete actions the system
//! understands — advance one cell in the current facing, or rotate 90°
//! counter-clockwise. Both are pure and synchronous here; the actuator queue
//! in the display client decides *when* they happen and how long each takes.
//!
//! # Invariants
//!
//! - `position` is always inside the world passed to [`Actor::step_forward`];
//!   a step that would leave the world returns [`StepOutcome::Blocked`] and
//!   changes nothing.
//! - `facing` is always one of the four cardinal values; [`Facing::turn_left`]
//!   is total and cycles `E → N → W → S → E`.

use crate::domain::world::{Position, World};

/// The four cardinal directions the actor can face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    North,
    East,
    South,
    West,
}

impl Facing {
    /// Returns the facing one 90° step counter-clockwise.
    ///
    /// The cycle is `E → N → W → S → E`, so four turns return to the start.
    pub fn turn_left(self) -> Self {
        match self {
            Facing::East => Facing::North,
            Facing::North => Facing::West,
            Facing::West => Facing::South,
            Facing::South => Facing::East,
        }
    }

    /// Returns the unit step vector `(dx, dy)` for one move in this facing.
    ///
    /// North is +y, matching a grid whose origin is the south-west corner.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Facing::East => (1, 0),
            Facing::West => (-1, 0),
            Facing::North => (0, 1),
            Facing::South => (0, -1),
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Facing::North => "N",
            Facing::East => "E",
            Facing::South => "S",
            Facing::West => "W",
        };
        f.write_str(s)
    }
}

/// A discrete instruction for the actor.
///
/// Immutable once constructed. Commands are never reordered, merged, or
/// deduplicated anywhere in the pipeline: burst input accumulates and plays
/// back serially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Advance `n` cells in the current facing, one cell at a time.
    ///
    /// The wire protocol only carries single-step moves; larger step counts
    /// exist for local/programmatic use and truncate at the world edge.
    Move(u32),
    /// Rotate 90° counter-clockwise.
    TurnLeft,
}

/// The result of asking the actor to advance one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step was committed; the actor now stands on `to`.
    Moved { from: Position, to: Position },
    /// The next cell lies outside the world; nothing changed.
    Blocked,
}

/// The simulated robot: position plus facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    position: Position,
    facing: Facing,
}

impl Actor {
    /// Creates an actor at `position` facing `facing`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is outside `world` — starting out of bounds is a
    /// configuration bug, and the bounds invariant must hold from the first
    /// observable state.
    pub fn new(world: &World, position: Position, facing: Facing) -> Self {
        assert!(
            world.contains(position),
            "actor start position {position} outside {}x{} world",
            world.width(),
            world.height()
        );
        Self { position, facing }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Attempts to advance one cell in the current facing.
    ///
    /// Commits and returns [`StepOutcome::Moved`] when the target cell is
    /// inside `world`; otherwise returns [`StepOutcome::Blocked`] and leaves
    /// the actor untouched. Blocked is a normal outcome, not an error.
    pub fn step_forward(&mut self, world: &World) -> StepOutcome {
        let (dx, dy) = self.facing.delta();
        let from = self.position;
        let to = from.offset(dx, dy);
        if world.contains(to) {
            self.position = to;
            StepOutcome::Moved { from, to }
        } else {
            StepOutcome::Blocked
        }
    }

    /// Rotates 90° counter-clockwise and returns the new facing.
    pub fn turn_left(&mut self) -> Facing {
        self.facing = self.facing.turn_left();
        self.facing
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
