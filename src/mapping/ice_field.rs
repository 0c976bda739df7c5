//! Random ice field generation and goal placement
//!
//! The field is built in two passes: single ice cells scattered uniformly
//! (repeats allowed), then square ice blocks stamped at uniform offsets that
//! never reach the last row or column. Goals are found by drawing uniform
//! cells until one is Normal.

use itertools::iproduct;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::common::{GoalSource, PlanningError, PlanningResult, Position, SimulationConfig};
use crate::utils::Grid;

/// Parameters for the random ice field
#[derive(Debug, Clone, PartialEq)]
pub struct IceFieldConfig {
    pub width: usize,
    pub height: usize,
    pub scattered_ice: usize,
    pub ice_blocks: usize,
    pub block_size: usize,
}

impl Default for IceFieldConfig {
    fn default() -> Self {
        Self::from(&SimulationConfig::default())
    }
}

impl From<&SimulationConfig> for IceFieldConfig {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            scattered_ice: config.scattered_ice,
            ice_blocks: config.ice_blocks,
            block_size: config.block_size,
        }
    }
}

pub struct IceFieldGenerator {
    config: IceFieldConfig,
    rng: StdRng,
}

impl IceFieldGenerator {
    pub fn new(config: IceFieldConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(IceFieldConfig::from(config), config.seed)
    }

    pub fn generate(&mut self) -> PlanningResult<Grid> {
        let IceFieldConfig {
            width,
            height,
            scattered_ice,
            ice_blocks,
            block_size,
        } = self.config;

        if width == 0 || height == 0 {
            return Err(PlanningError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                width, height
            )));
        }
        if ice_blocks > 0 && (block_size == 0 || block_size >= width || block_size >= height) {
            return Err(PlanningError::InvalidConfig(format!(
                "ice block of size {} does not fit a {}x{} grid",
                block_size, width, height
            )));
        }

        let mut ice = Vec::with_capacity(scattered_ice + ice_blocks * block_size * block_size);

        for _ in 0..scattered_ice {
            let x = self.rng.gen_range(0..width) as i32;
            let y = self.rng.gen_range(0..height) as i32;
            ice.push(Position::new(x, y));
        }

        for _ in 0..ice_blocks {
            let bx = self.rng.gen_range(0..width - block_size);
            let by = self.rng.gen_range(0..height - block_size);
            ice.extend(
                iproduct!(0..block_size, 0..block_size)
                    .map(|(i, j)| Position::new((bx + i) as i32, (by + j) as i32)),
            );
        }

        let grid = Grid::with_obstructed(width, height, ice)?;
        debug!(
            width,
            height,
            ice_cells = grid.obstructed_count(),
            "generated ice field"
        );
        Ok(grid)
    }

    /// Hand the generator's RNG over to goal placement
    pub fn into_goal_source(self) -> RandomGoalSource {
        RandomGoalSource { rng: self.rng }
    }
}

/// Uniform goal placement by rejection sampling over the whole grid
pub struct RandomGoalSource {
    rng: StdRng,
}

impl RandomGoalSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl GoalSource for RandomGoalSource {
    fn next_goal(&mut self, grid: &Grid, _agent: Position) -> PlanningResult<Position> {
        if grid.obstructed_count() == grid.width() * grid.height() {
            return Err(PlanningError::NoFreeCell);
        }
        loop {
            let x = self.rng.gen_range(0..grid.width()) as i32;
            let y = self.rng.gen_range(0..grid.height()) as i32;
            let candidate = Position::new(x, y);
            if !grid.is_obstructed(candidate) {
                return Ok(candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::CellKind;

    #[test]
    fn test_same_seed_same_field() {
        let config = IceFieldConfig::default();
        let a = IceFieldGenerator::new(config.clone(), Some(3)).generate().unwrap();
        let b = IceFieldGenerator::new(config, Some(3)).generate().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ice_count_bounds() {
        let config = IceFieldConfig {
            width: 20,
            height: 20,
            scattered_ice: 100,
            ice_blocks: 5,
            block_size: 3,
        };
        let grid = IceFieldGenerator::new(config, Some(99)).generate().unwrap();
        // repeats and overlaps only ever reduce the count
        assert!(grid.obstructed_count() >= 9);
        assert!(grid.obstructed_count() <= 100 + 5 * 9);
    }

    #[test]
    fn test_single_block_is_contiguous() {
        let config = IceFieldConfig {
            width: 6,
            height: 5,
            scattered_ice: 0,
            ice_blocks: 1,
            block_size: 3,
        };
        let grid = IceFieldGenerator::new(config, Some(1)).generate().unwrap();
        assert_eq!(grid.obstructed_count(), 9);

        let ice: Vec<Position> = iproduct!(0..5, 0..6)
            .map(|(y, x)| Position::new(x, y))
            .filter(|p| grid.is_obstructed(*p))
            .collect();
        let min_x = ice.iter().map(|p| p.x).min().unwrap();
        let min_y = ice.iter().map(|p| p.y).min().unwrap();
        for p in &ice {
            assert!(p.x - min_x < 3 && p.y - min_y < 3);
        }
    }

    #[test]
    fn test_rejects_block_as_wide_as_grid() {
        let config = IceFieldConfig {
            width: 3,
            height: 3,
            scattered_ice: 0,
            ice_blocks: 2,
            block_size: 3,
        };
        let result = IceFieldGenerator::new(config, Some(5)).generate();
        assert!(matches!(result, Err(PlanningError::InvalidConfig(_))));
    }

    #[test]
    fn test_blocks_never_reach_last_row_or_column() {
        let config = IceFieldConfig {
            width: 5,
            height: 4,
            scattered_ice: 0,
            ice_blocks: 3,
            block_size: 3,
        };
        for seed in 0..30 {
            let grid = IceFieldGenerator::new(config.clone(), Some(seed)).generate().unwrap();
            for y in 0..4 {
                assert!(!grid.is_obstructed(Position::new(4, y)), "seed {}", seed);
            }
            for x in 0..5 {
                assert!(!grid.is_obstructed(Position::new(x, 3)), "seed {}", seed);
            }
        }
    }

    #[test]
    fn test_rejects_oversized_block() {
        let config = IceFieldConfig {
            width: 2,
            height: 8,
            scattered_ice: 0,
            ice_blocks: 1,
            block_size: 3,
        };
        let result = IceFieldGenerator::new(config, Some(0)).generate();
        assert!(matches!(result, Err(PlanningError::InvalidConfig(_))));
    }

    #[test]
    fn test_goals_land_on_normal_cells() {
        let mut generator = IceFieldGenerator::new(IceFieldConfig::default(), Some(17));
        let grid = generator.generate().unwrap();
        let mut goals = generator.into_goal_source();
        for _ in 0..50 {
            let goal = goals.next_goal(&grid, Position::new(5, 5)).unwrap();
            assert_eq!(grid.kind_at(goal).unwrap(), CellKind::Normal);
        }
    }

    #[test]
    fn test_single_free_cell_is_found() {
        let grid: Grid = "###\n#.#\n###\n".parse().unwrap();
        let mut goals = RandomGoalSource::new(Some(8));
        for _ in 0..10 {
            assert_eq!(goals.next_goal(&grid, Position::origin()).unwrap(), Position::new(1, 1));
        }
    }

    #[test]
    fn test_no_free_cell() {
        let grid: Grid = "##\n##\n".parse().unwrap();
        let mut goals = RandomGoalSource::new(Some(0));
        assert!(matches!(
            goals.next_goal(&grid, Position::origin()),
            Err(PlanningError::NoFreeCell)
        ));
    }
}
