use icebreaker::mapping::IceFieldGenerator;
use icebreaker::{
    AStarPlanner, ControllerState, CostModel, Move, Position, ReplanningController, SimulationConfig,
    StepCost, StepEvent,
};

fn seeded_config(seed: u64, goals: usize) -> SimulationConfig {
    SimulationConfig {
        seed: Some(seed),
        target_goals: goals,
        ..Default::default()
    }
}

#[test]
fn test_full_session_collects_all_goals() {
    let config = seeded_config(42, 5);
    let mut generator = IceFieldGenerator::from_config(&config);
    let grid = generator.generate().unwrap();
    let initial_ice = grid.obstructed_count();

    let mut controller =
        ReplanningController::from_config(&config, grid, generator.into_goal_source()).unwrap();
    let model = CostModel::from_config(&config).unwrap();

    let mut leg_cost = 0;
    let mut ice_broken = 0;
    loop {
        let before = controller.grid().clone();
        let (step, reached) = match controller.step().unwrap() {
            StepEvent::Planned { .. } => {
                leg_cost = 0;
                continue;
            }
            StepEvent::Moved(step) => (Some(step), None),
            StepEvent::GoalReached { arrival, report } => (arrival, Some(report)),
            StepEvent::Finished => break,
        };

        if let Some(Move { from, to, broke_ice, .. }) = step {
            assert!(from.is_adjacent(&to));
            assert_eq!(broke_ice, before.is_obstructed(to));
            assert!(!controller.grid().is_obstructed(to));
            leg_cost += model.step_cost(&before, from, to).unwrap();
            if broke_ice {
                ice_broken += 1;
            }
        }
        if let Some(report) = reached {
            // nothing else mutates the grid, so the plan cost is what was paid
            assert_eq!(report.cost, leg_cost);
            assert_eq!(controller.agent(), report.goal);
        }
    }

    assert_eq!(controller.state(), ControllerState::Done);
    assert_eq!(controller.goals_satisfied(), 5);
    assert_eq!(controller.report().goals.len(), 5);
    assert_eq!(controller.grid().obstructed_count(), initial_ice - ice_broken);
}

#[test]
fn test_session_is_reproducible_with_seed() {
    let run = |seed| {
        let config = seeded_config(seed, 4);
        let mut generator = IceFieldGenerator::from_config(&config);
        let grid = generator.generate().unwrap();
        let mut controller =
            ReplanningController::from_config(&config, grid, generator.into_goal_source()).unwrap();
        let report = controller.run().unwrap();
        report
            .goals
            .iter()
            .map(|g| (g.goal, g.cost, g.nodes_expanded))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(9), run(9));
}

#[test]
fn test_replanning_benefits_from_cleared_path() {
    let config = seeded_config(3, 1);
    let mut generator = IceFieldGenerator::from_config(&config);
    let grid = generator.generate().unwrap();
    let model = CostModel::from_config(&config).unwrap();
    let planner = AStarPlanner::new(model);
    let start = config.start;

    let mut controller =
        ReplanningController::from_config(&config, grid.clone(), generator.into_goal_source()).unwrap();
    let first = controller.step().unwrap();
    assert!(matches!(first, StepEvent::Planned { .. }));
    let outbound: Vec<Position> = controller.remaining_path().to_vec();
    let report = controller.run().unwrap().clone();
    let goal = report.goals[0].goal;

    // the way home over cleared ice is never dearer than on the untouched grid
    let back = planner.search(controller.grid(), goal, start).unwrap();
    let untouched = planner.search(&grid, goal, start).unwrap();
    assert!(back.cost <= untouched.cost);

    // and never dearer than retracing the outbound route, which is now ice-free
    if outbound.is_empty() {
        return;
    }
    let mut retrace: Vec<Position> = outbound.iter().rev().skip(1).copied().collect();
    retrace.push(start);
    let retrace_cost = model.path_cost(controller.grid(), goal, &retrace).unwrap();
    assert!(back.cost <= retrace_cost);
    assert!(outbound.iter().all(|p| !controller.grid().is_obstructed(*p)));
}
