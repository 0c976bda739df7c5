//! Common types used throughout icebreaker

use std::fmt;

use serde::Deserialize;

/// Traversal cost of a single step or a whole path
pub type Cost = u32;

/// Grid cell coordinate (column, row), 0-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Neighbouring position one step in `direction`
    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(&self, other: &Position) -> Cost {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as Cost
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(i32, i32)> for Position {
    fn from(tuple: (i32, i32)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal move on the grid. Rows grow downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Up,
    Right,
    Left,
}

impl Direction {
    /// Expansion order used by the planners
    pub const ALL: [Direction; 4] = [Direction::Down, Direction::Up, Direction::Right, Direction::Left];

    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Down => (0, 1),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
        }
    }

    /// Direction of a single step from `from` to `to`, if they are adjacent
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        let delta = (to.x - from.x, to.y - from.y);
        Direction::ALL.iter().copied().find(|d| d.offset() == delta)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Down => "DOWN",
            Direction::Up => "UP",
            Direction::Right => "RIGHT",
            Direction::Left => "LEFT",
        };
        write!(f, "{}", name)
    }
}
