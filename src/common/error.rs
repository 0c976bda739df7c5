//! Error types for icebreaker

use thiserror::Error;

use crate::common::types::Position;

/// Main error type for grid planning and replanning
#[derive(Debug, Error)]
pub enum PlanningError {
    /// Position outside the grid extents (caller bug)
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: usize,
        height: usize,
    },
    /// Search exhausted the frontier without reaching the goal
    #[error("no path from {start} to {goal}")]
    NotFound { start: Position, goal: Position },
    /// Goal placed on a cell that is not Normal
    #[error("goal {0} is not on a Normal cell")]
    InvalidGoal(Position),
    /// Plan step that is not a single orthogonal move
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    /// No Normal cell left to place a goal on
    #[error("no free cell available for a new goal")]
    NoFreeCell,
    /// Invalid parameter
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Malformed ASCII map
    #[error("invalid map: {0}")]
    InvalidMap(String),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration file could not be parsed
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;
