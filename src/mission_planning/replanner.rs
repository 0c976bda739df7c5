/*!
 * Replanning controller for repeated goal pursuit
 *
 * The controller owns the grid and drives a three-state machine:
 * Planning -> Executing -> (Planning | Done). Each call to `step` is one
 * logical turn. A committed plan is always followed to the end; the only
 * grid mutation is the agent breaking ice it steps on, and the next search
 * sees the cleared cells.
 */

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::common::{
    Cost, Direction, GoalSource, PlanningError, PlanningResult, Position, SimulationConfig, StepCost,
};
use crate::path_planning::{AStarPlanner, CostModel, PathPlan};
use crate::utils::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Waiting for a search result for the current goal
    Planning,
    /// Stepping through a committed plan
    Executing,
    /// Target goal count satisfied
    Done,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerState::Planning => "planning",
            ControllerState::Executing => "executing",
            ControllerState::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Telemetry for one satisfied goal
#[derive(Debug, Clone, PartialEq)]
pub struct GoalReport {
    /// 1-based count of goals satisfied so far
    pub index: usize,
    pub goal: Position,
    /// Cost of the plan that reached this goal
    pub cost: Cost,
    pub steps: usize,
    pub nodes_expanded: usize,
    pub search_time: Duration,
    /// Ice cells broken on the way
    pub ice_broken: usize,
}

/// One step of the agent along its plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub direction: Direction,
    pub broke_ice: bool,
}

/// Outcome of a single logical turn
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    Planned {
        goal: Position,
        cost: Cost,
        steps: usize,
        nodes_expanded: usize,
    },
    Moved(Move),
    /// The goal is credited on the turn the agent steps onto it; `arrival`
    /// is `None` only for a zero-step plan.
    GoalReached {
        arrival: Option<Move>,
        report: GoalReport,
    },
    Finished,
}

/// Summary of a completed session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionReport {
    pub goals: Vec<GoalReport>,
}

impl SessionReport {
    pub fn total_cost(&self) -> Cost {
        self.goals.iter().map(|g| g.cost).sum()
    }

    pub fn total_nodes_expanded(&self) -> usize {
        self.goals.iter().map(|g| g.nodes_expanded).sum()
    }

    pub fn total_steps(&self) -> usize {
        self.goals.iter().map(|g| g.steps).sum()
    }

    pub fn total_search_time(&self) -> Duration {
        self.goals.iter().map(|g| g.search_time).sum()
    }
}

/// Plan currently being executed
#[derive(Debug)]
struct ActivePlan {
    goal: Position,
    plan: PathPlan,
    next: usize,
    ice_broken: usize,
}

pub struct ReplanningController<G: GoalSource, C: StepCost = CostModel> {
    grid: Grid,
    planner: AStarPlanner<C>,
    goals: G,
    agent: Position,
    target_goals: usize,
    goals_satisfied: usize,
    state: ControllerState,
    active: Option<ActivePlan>,
    report: SessionReport,
}

impl<G: GoalSource> ReplanningController<G, CostModel> {
    /// Controller using the cost model and start position from `config`
    pub fn from_config(config: &SimulationConfig, grid: Grid, goals: G) -> PlanningResult<Self> {
        config.validate()?;
        let planner = AStarPlanner::new(CostModel::from_config(config)?);
        Self::new(grid, planner, goals, config.start, config.target_goals)
    }
}

impl<G: GoalSource, C: StepCost> ReplanningController<G, C> {
    pub fn new(
        grid: Grid,
        planner: AStarPlanner<C>,
        goals: G,
        start: Position,
        target_goals: usize,
    ) -> PlanningResult<Self> {
        grid.kind_at(start)?;
        let state = if target_goals == 0 {
            ControllerState::Done
        } else {
            ControllerState::Planning
        };
        Ok(Self {
            grid,
            planner,
            goals,
            agent: start,
            target_goals,
            goals_satisfied: 0,
            state,
            active: None,
            report: SessionReport::default(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agent(&self) -> Position {
        self.agent
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn goals_satisfied(&self) -> usize {
        self.goals_satisfied
    }

    pub fn target_goals(&self) -> usize {
        self.target_goals
    }

    /// Goal of the committed plan, if any
    pub fn current_goal(&self) -> Option<Position> {
        self.active.as_ref().map(|a| a.goal)
    }

    /// Positions the agent has yet to visit on the committed plan
    pub fn remaining_path(&self) -> &[Position] {
        match &self.active {
            Some(active) => &active.plan.steps[active.next..],
            None => &[],
        }
    }

    pub fn report(&self) -> &SessionReport {
        &self.report
    }

    /// Advance one logical turn.
    ///
    /// A `NotFound` search result is returned as an error; the controller
    /// stays in Planning with the goal dropped, so calling `step` again asks
    /// the goal source for a different goal.
    pub fn step(&mut self) -> PlanningResult<StepEvent> {
        match self.state {
            ControllerState::Planning => self.plan(),
            ControllerState::Executing => self.execute(),
            ControllerState::Done => Ok(StepEvent::Finished),
        }
    }

    /// Drive the session until the target goal count is reached
    pub fn run(&mut self) -> PlanningResult<&SessionReport> {
        while self.state != ControllerState::Done {
            self.step()?;
        }
        Ok(&self.report)
    }

    fn plan(&mut self) -> PlanningResult<StepEvent> {
        let goal = self.goals.next_goal(&self.grid, self.agent)?;
        if self.grid.is_obstructed(goal) {
            return Err(PlanningError::InvalidGoal(goal));
        }

        let plan = self.planner.search(&self.grid, self.agent, goal)?;

        debug!(
            agent = %self.agent,
            %goal,
            cost = plan.cost,
            steps = plan.len(),
            nodes_expanded = plan.nodes_expanded(),
            "committed plan"
        );

        let event = StepEvent::Planned {
            goal,
            cost: plan.cost,
            steps: plan.len(),
            nodes_expanded: plan.nodes_expanded(),
        };
        self.active = Some(ActivePlan {
            goal,
            plan,
            next: 0,
            ice_broken: 0,
        });
        self.state = ControllerState::Executing;
        Ok(event)
    }

    fn execute(&mut self) -> PlanningResult<StepEvent> {
        let active = match self.active.as_mut() {
            Some(active) => active,
            None => {
                self.state = ControllerState::Planning;
                return self.plan();
            }
        };

        let mut arrival = None;
        if let Some(&to) = active.plan.steps.get(active.next) {
            let from = self.agent;
            let direction = Direction::between(from, to).ok_or_else(|| {
                PlanningError::InvalidPlan(format!("step {} -> {} is not adjacent", from, to))
            })?;
            let broke_ice = self.grid.clear(to)?;
            if broke_ice {
                active.ice_broken += 1;
                debug!(position = %to, "broke ice");
            }
            active.next += 1;
            self.agent = to;
            let step = Move {
                from,
                to,
                direction,
                broke_ice,
            };
            if active.next < active.plan.steps.len() {
                return Ok(StepEvent::Moved(step));
            }
            arrival = Some(step);
        }

        // Plan exhausted: the agent stands on the goal
        let finished = match self.active.take() {
            Some(finished) => finished,
            None => return Ok(StepEvent::Finished),
        };
        self.goals_satisfied += 1;
        let report = GoalReport {
            index: self.goals_satisfied,
            goal: finished.goal,
            cost: finished.plan.cost,
            steps: finished.plan.len(),
            nodes_expanded: finished.plan.nodes_expanded(),
            search_time: finished.plan.stats.elapsed,
            ice_broken: finished.ice_broken,
        };
        info!(
            goal = %report.goal,
            index = report.index,
            target = self.target_goals,
            cost = report.cost,
            nodes_expanded = report.nodes_expanded,
            "goal reached"
        );
        self.report.goals.push(report.clone());

        self.state = if self.goals_satisfied >= self.target_goals {
            ControllerState::Done
        } else {
            ControllerState::Planning
        };
        Ok(StepEvent::GoalReached { arrival, report })
    }
}
