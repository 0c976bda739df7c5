//! icebreaker - grid world replanning with breakable ice
//!
//! An agent collects a series of goals on a grid. Each leg is planned with
//! A* over a four-connected grid where ice cells cost more to enter and turn
//! into Normal terrain once the agent crosses them.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod mapping;
pub mod path_planning;
pub mod mission_planning;

// Re-export common types for convenience
pub use common::{Cost, Direction, Position, SimulationConfig};
pub use common::{GoalSource, StepCost};
pub use common::{PlanningError, PlanningResult};
pub use utils::{CellKind, Grid};
pub use path_planning::{AStarPlanner, CostModel, PathPlan, SearchStats};
pub use mission_planning::{ControllerState, GoalReport, Move, ReplanningController, SessionReport, StepEvent};
