//! World bounds and grid positions.
//!
//! The world is a fixed rectangle of unit cells. Cell coordinates are
//! 0-indexed: a valid position satisfies `0 <= x < width` and
//! `0 <= y < height`. The actor is never allowed outside these bounds; a
//! move that would cross them is reported as blocked, not applied.

use serde::{Deserialize, Serialize};

/// A single grid cell coordinate.
///
/// Signed so that "the cell one step past the edge" is representable while
/// computing a move; only in-bounds positions are ever committed to an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position displaced by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The fixed rectangular world the actor moves in.
///
/// Created once at startup and never resized. Width and height are in cells;
/// rendering concerns such as cell pixel size belong to the display client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct World {
    width: u32,
    height: u32,
}

impl World {
    /// Creates a world of `width` x `height` cells.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero — a zero-area world has no valid
    /// actor position, which is a construction bug, not a runtime condition.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "world dimensions must be positive");
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `true` if `pos` lies within `[0, width) x [0, height)`.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && (pos.x as u32) < self.width && pos.y >= 0 && (pos.y as u32) < self.height
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_accepts_interior_cells() {
        let world = World::new(10, 10);
        assert!(world.contains(Position::new(0, 0)));
        assert!(world.contains(Position::new(5, 5)));
        assert!(world.contains(Position::new(9, 9)));
    }

    #[test]
    fn test_contains_rejects_cells_past_each_edge() {
        let world = World::new(10, 10);
        assert!(!world.contains(Position::new(-1, 5)));
        assert!(!world.contains(Position::new(10, 5)));
        assert!(!world.contains(Position::new(5, -1)));
        assert!(!world.contains(Position::new(5, 10)));
    }

    #[test]
    fn test_contains_handles_non_square_worlds() {
        let world = World::new(3, 7);
        assert!(world.contains(Position::new(2, 6)));
        assert!(!world.contains(Position::new(3, 0)));
        assert!(!world.contains(Position::new(0, 7)));
    }

    #[test]
    #[should_panic(expected = "world dimensions must be positive")]
    fn test_zero_width_world_panics() {
        let _ = World::new(0, 10);
    }

    #[test]
    fn test_position_offset() {
        let p = Position::new(4, 2);
        assert_eq!(p.offset(1, 0), Position::new(5, 2));
        assert_eq!(p.offset(0, -3), Position::new(4, -1));
    }
}
