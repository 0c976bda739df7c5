//! Common traits defining the seams between grid, planner and controller

use crate::common::error::PlanningResult;
use crate::common::types::{Cost, Position};
use crate::utils::Grid;

/// Cost of moving between two cells under the current grid state
pub trait StepCost {
    /// Cost of stepping from `from` onto `to`, or `None` if there is no such edge
    fn step_cost(&self, grid: &Grid, from: Position, to: Position) -> Option<Cost>;

    /// Lower bound on any single step cost, used to scale the heuristic
    fn min_step_cost(&self) -> Cost;
}

/// Supplies the next goal once the previous one has been reached
pub trait GoalSource {
    /// Pick a goal on a currently Normal cell
    fn next_goal(&mut self, grid: &Grid, agent: Position) -> PlanningResult<Position>;
}
