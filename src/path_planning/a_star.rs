//! A* path planning over a four-connected grid with weighted cells
//!
//! The planner borrows the grid immutably for the duration of one search and
//! keeps no state between calls, so it can be reused freely while the caller
//! mutates the grid between searches.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::common::{Cost, PlanningError, PlanningResult, Position, StepCost};
use crate::path_planning::cost_model::CostModel;
use crate::path_planning::heuristic;
use crate::utils::Grid;

/// Search-effort metadata for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Frontier extractions that were expanded. Entries superseded by a
    /// cheaper route are discarded when popped and are not counted, so this
    /// never exceeds the number of reachable cells.
    pub nodes_expanded: usize,
    /// Wall-clock duration of the search
    pub elapsed: Duration,
}

/// Result of a successful search
#[derive(Debug, Clone)]
pub struct PathPlan {
    /// Positions after the start, ending at the goal
    pub steps: Vec<Position>,
    /// Total accumulated step cost
    pub cost: Cost,
    pub stats: SearchStats,
}

impl PathPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn nodes_expanded(&self) -> usize {
        self.stats.nodes_expanded
    }
}

/// Frontier entry (min-heap on priority, then insertion order)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PriorityNode {
    priority: Cost,
    sequence: u64,
    cost: Cost,
    position: Position,
}

impl Ord for PriorityNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for PriorityNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* planner parameterised by its step cost model
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner<C: StepCost = CostModel> {
    cost_model: C,
}

impl<C: StepCost> AStarPlanner<C> {
    pub fn new(cost_model: C) -> Self {
        AStarPlanner { cost_model }
    }

    /// Find a minimum-cost path from `start` to `goal` on the current grid
    pub fn search(&self, grid: &Grid, start: Position, goal: Position) -> PlanningResult<PathPlan> {
        let timer = Instant::now();
        grid.kind_at(start)?;
        grid.kind_at(goal)?;

        let mut open_set = BinaryHeap::new();
        let mut g_score: HashMap<Position, Cost> = HashMap::new();
        let mut came_from: HashMap<Position, Position> = HashMap::new();
        let mut sequence: u64 = 0;
        let mut nodes_expanded = 0;

        g_score.insert(start, 0);
        open_set.push(PriorityNode {
            priority: self.calc_heuristic(start, goal),
            sequence,
            cost: 0,
            position: start,
        });

        while let Some(current) = open_set.pop() {
            // Skip entries superseded by a cheaper route
            if let Some(&best) = g_score.get(&current.position) {
                if current.cost > best {
                    continue;
                }
            }

            nodes_expanded += 1;
            if nodes_expanded % 100 == 0 {
                trace!(
                    nodes_expanded,
                    open = open_set.len(),
                    visited = g_score.len(),
                    "a* progress"
                );
            }

            if current.position == goal {
                let steps = Self::calc_final_path(goal, &came_from);
                let stats = SearchStats {
                    nodes_expanded,
                    elapsed: timer.elapsed(),
                };
                debug!(
                    %start,
                    %goal,
                    cost = current.cost,
                    steps = steps.len(),
                    nodes_expanded,
                    "path found"
                );
                return Ok(PathPlan {
                    steps,
                    cost: current.cost,
                    stats,
                });
            }

            for neighbor in grid.neighbors(current.position) {
                let step_cost = match self.cost_model.step_cost(grid, current.position, neighbor) {
                    Some(cost) => cost,
                    None => continue,
                };
                // a sum that does not fit in `Cost` is treated as no edge
                let tentative = match current.cost.checked_add(step_cost) {
                    Some(cost) => cost,
                    None => continue,
                };
                let priority = match tentative.checked_add(self.calc_heuristic(neighbor, goal)) {
                    Some(priority) => priority,
                    None => continue,
                };

                let improved = g_score.get(&neighbor).map_or(true, |&best| tentative < best);
                if !improved {
                    continue;
                }

                g_score.insert(neighbor, tentative);
                came_from.insert(neighbor, current.position);
                sequence += 1;
                open_set.push(PriorityNode {
                    priority,
                    sequence,
                    cost: tentative,
                    position: neighbor,
                });
            }
        }

        debug!(%start, %goal, nodes_expanded, "open set exhausted");
        Err(PlanningError::NotFound { start, goal })
    }

    fn calc_heuristic(&self, from: Position, goal: Position) -> Cost {
        heuristic::estimate(from, goal).saturating_mul(self.cost_model.min_step_cost())
    }

    fn calc_final_path(goal: Position, came_from: &HashMap<Position, Position>) -> Vec<Position> {
        let mut path = Vec::new();
        let mut current = goal;

        while let Some(&previous) = came_from.get(&current) {
            path.push(current);
            current = previous;
        }

        path.reverse();
        path
    }
}
