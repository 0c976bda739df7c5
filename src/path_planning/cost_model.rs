//! Step costs over a grid of Normal and ice cells

use crate::common::{Cost, PlanningError, PlanningResult, Position, SimulationConfig, StepCost};
use crate::utils::{CellKind, Grid};

/// Entering a Normal cell costs `normal_cost`; entering ice costs `obstructed_cost`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    normal_cost: Cost,
    obstructed_cost: Cost,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            normal_cost: 1,
            obstructed_cost: 2,
        }
    }
}

impl CostModel {
    pub fn new(normal_cost: Cost, obstructed_cost: Cost) -> PlanningResult<Self> {
        if normal_cost == 0 {
            return Err(PlanningError::InvalidConfig(
                "normal step cost must be at least 1".to_string(),
            ));
        }
        if obstructed_cost <= normal_cost {
            return Err(PlanningError::InvalidConfig(format!(
                "obstructed step cost ({}) must exceed normal step cost ({})",
                obstructed_cost, normal_cost
            )));
        }
        Ok(Self {
            normal_cost,
            obstructed_cost,
        })
    }

    pub fn from_config(config: &SimulationConfig) -> PlanningResult<Self> {
        Self::new(config.normal_cost, config.ice_cost)
    }

    pub fn normal_cost(&self) -> Cost {
        self.normal_cost
    }

    pub fn obstructed_cost(&self) -> Cost {
        self.obstructed_cost
    }

    /// Cost of entering a cell of the given kind
    pub fn cost_of(&self, kind: CellKind) -> Cost {
        match kind {
            CellKind::Normal => self.normal_cost,
            CellKind::Obstructed => self.obstructed_cost,
        }
    }

    /// Sum of step costs along `path`, starting from `start`
    pub fn path_cost(&self, grid: &Grid, start: Position, path: &[Position]) -> Option<Cost> {
        let mut total = 0;
        let mut from = start;
        for &to in path {
            total += self.step_cost(grid, from, to)?;
            from = to;
        }
        Some(total)
    }
}

impl StepCost for CostModel {
    fn step_cost(&self, grid: &Grid, from: Position, to: Position) -> Option<Cost> {
        if !from.is_adjacent(&to) {
            return None;
        }
        grid.kind_at(to).ok().map(|kind| self.cost_of(kind))
    }

    fn min_step_cost(&self) -> Cost {
        self.normal_cost
    }
}
