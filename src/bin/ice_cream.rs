// Ice-breaking goal collection session
//
// usage: ice_cream [config.toml]
// The number of goals is asked for on stdin unless given as ICE_CREAM_GOALS.

use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use icebreaker::mapping::IceFieldGenerator;
use icebreaker::{CostModel, Move, ReplanningController, SimulationConfig, StepEvent};

fn prompt_goal_count() -> Result<usize> {
    print!("How many goals should the agent collect? ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    parse_goal_count(&line)
}

fn parse_goal_count(text: &str) -> Result<usize> {
    let count: usize = text
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a number of goals", text.trim()))?;
    if count == 0 {
        bail!("the number of goals must be positive");
    }
    Ok(count)
}

fn log_move(step: &Move) {
    info!(direction = %step.direction, broke_ice = step.broke_ice, "move");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = match env::args().nth(1) {
        Some(path) => SimulationConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => SimulationConfig::default(),
    };
    config.target_goals = match env::var("ICE_CREAM_GOALS") {
        Ok(value) => parse_goal_count(&value)?,
        Err(_) => prompt_goal_count()?,
    };
    config.validate()?;

    let mut generator = IceFieldGenerator::from_config(&config);
    let grid = generator.generate()?;
    info!(
        width = config.width,
        height = config.height,
        ice_cells = grid.obstructed_count(),
        "world ready"
    );

    let costs = CostModel::from_config(&config)?;
    info!(
        normal_cost = costs.normal_cost(),
        ice_cost = costs.obstructed_cost(),
        "cost model"
    );

    let mut controller = ReplanningController::from_config(&config, grid, generator.into_goal_source())?;
    loop {
        match controller.step()? {
            StepEvent::Planned { goal, cost, nodes_expanded, .. } => {
                info!(%goal, cost, nodes_expanded, "new plan");
            }
            StepEvent::Moved(step) => log_move(&step),
            StepEvent::GoalReached { arrival, report } => {
                if let Some(step) = arrival {
                    log_move(&step);
                }
                info!(
                    "goal {}/{} collected at {} with total cost {} ({} nodes expanded, {:?})",
                    report.index,
                    controller.target_goals(),
                    report.goal,
                    report.cost,
                    report.nodes_expanded,
                    report.search_time
                );
            }
            StepEvent::Finished => break,
        }
    }

    let report = controller.report();
    info!(
        goals = report.goals.len(),
        total_cost = report.total_cost(),
        total_nodes_expanded = report.total_nodes_expanded(),
        search_time = ?report.total_search_time(),
        "all goals collected"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_goal_count() {
        assert_eq!(parse_goal_count(" 3\n").unwrap(), 3);
        assert!(parse_goal_count("0").is_err());
        assert!(parse_goal_count("many").is_err());
    }
}
