//! Session configuration
//!
//! All tunables for a run live here and are threaded through construction of
//! the grid, cost model and controller.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::{PlanningError, PlanningResult};
use crate::common::types::{Cost, Position};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Grid columns
    pub width: usize,
    /// Grid rows
    pub height: usize,
    /// Cost of stepping onto a Normal cell
    pub normal_cost: Cost,
    /// Cost of stepping onto (and breaking) an ice cell
    pub ice_cost: Cost,
    /// Single ice cells scattered at random
    pub scattered_ice: usize,
    /// Number of square ice blocks
    pub ice_blocks: usize,
    /// Side length of each ice block
    pub block_size: usize,
    /// Agent start position
    pub start: Position,
    /// Goals to collect before the session ends
    pub target_goals: usize,
    /// RNG seed for world generation; entropy when unset
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            normal_cost: 1,
            ice_cost: 2,
            scattered_ice: 100,
            ice_blocks: 5,
            block_size: 3,
            start: Position::new(5, 5),
            target_goals: 1,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(text: &str) -> PlanningResult<Self> {
        let config: SimulationConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> PlanningResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> PlanningResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PlanningError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.normal_cost == 0 {
            return Err(PlanningError::InvalidConfig(
                "normal_cost must be at least 1".to_string(),
            ));
        }
        if self.ice_cost <= self.normal_cost {
            return Err(PlanningError::InvalidConfig(format!(
                "ice_cost ({}) must exceed normal_cost ({})",
                self.ice_cost, self.normal_cost
            )));
        }
        // path costs and frontier priorities both stay below 2 * ice_cost * cells
        let worst_priority = 2 * self.ice_cost as u128 * self.width as u128 * self.height as u128;
        if worst_priority > Cost::MAX as u128 {
            return Err(PlanningError::InvalidConfig(format!(
                "ice_cost ({}) is too large for a {}x{} grid",
                self.ice_cost, self.width, self.height
            )));
        }
        // block corners are drawn from [0, side - block_size)
        if self.ice_blocks > 0
            && (self.block_size == 0 || self.block_size >= self.width || self.block_size >= self.height)
        {
            return Err(PlanningError::InvalidConfig(format!(
                "ice block of size {} does not fit a {}x{} grid",
                self.block_size, self.width, self.height
            )));
        }
        let start = self.start;
        if start.x < 0 || start.y < 0 || start.x as usize >= self.width || start.y as usize >= self.height {
            return Err(PlanningError::InvalidConfig(format!(
                "start {} lies outside the {}x{} grid",
                start, self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.start, Position::new(5, 5));
        assert_eq!(config.ice_cost, 2);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimulationConfig::from_toml_str(
            "width = 8\nheight = 6\ntarget_goals = 3\nseed = 42\nstart = { x = 1, y = 2 }\n",
        )
        .unwrap();
        assert_eq!(config.width, 8);
        assert_eq!(config.height, 6);
        assert_eq!(config.target_goals, 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.start, Position::new(1, 2));
        assert_eq!(config.block_size, 3);
    }

    #[test]
    fn test_rejects_bad_costs() {
        let result = SimulationConfig::from_toml_str("normal_cost = 2\nice_cost = 2\n");
        assert!(matches!(result, Err(PlanningError::InvalidConfig(_))));

        let result = SimulationConfig::from_toml_str("normal_cost = 0\n");
        assert!(matches!(result, Err(PlanningError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_costs_that_overflow() {
        let result = SimulationConfig::from_toml_str("ice_cost = 4294967295
");
        assert!(matches!(result, Err(PlanningError::InvalidConfig(_))));

        // 2 * 5_000_000 * 400 still fits in a u32
        let config = SimulationConfig {
            ice_cost: 5_000_000,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_start_outside_grid() {
        let config = SimulationConfig {
            width: 4,
            height: 4,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PlanningError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_oversized_blocks() {
        let config = SimulationConfig {
            width: 6,
            height: 2,
            start: Position::new(0, 0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PlanningError::InvalidConfig(_))));

        let config = SimulationConfig {
            width: 3,
            height: 3,
            start: Position::new(0, 0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PlanningError::InvalidConfig(_))));

        let config = SimulationConfig {
            ice_blocks: 0,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_toml() {
        let result = SimulationConfig::from_toml_str("width = \"wide\"\n");
        assert!(matches!(result, Err(PlanningError::ConfigParse(_))));
    }
}
