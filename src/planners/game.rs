use std::time::Instant;

use tracing::info;

use crate::config::PlannerConfig;
use crate::infra::{GameObserver, HarnessError, PlanError};
use crate::planners::{EscapePlanner, EscapeReport, ExplorationReport, ExplorePlanner};
use crate::state::{Cave, ExplorationView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub exploration: ExplorationReport,
    pub escape: EscapeReport,
    pub escaped: bool,
}

/// Runs both phases of one episode against a generated cave.
pub struct Game {
    planner: EscapePlanner,
    observer: Box<dyn GameObserver>,
}

impl Game {
    pub fn new(config: PlannerConfig, observer: impl GameObserver + 'static) -> Self {
        Self {
            planner: EscapePlanner::new(config),
            observer: Box::new(observer),
        }
    }

    pub fn run(&mut self, cave: &Cave) -> Result<GameReport, PlanError> {
        let started = Instant::now();

        let mut exploration_view = cave.exploration().map_err(HarnessError::from)?;
        let exploration = ExplorePlanner::explore(&mut exploration_view, self.observer.as_mut())?;

        let mut escape_view = cave
            .escape_from(exploration_view.current_location())
            .map_err(HarnessError::from)?;
        let escape = self.planner.escape(&mut escape_view, self.observer.as_mut())?;

        let escaped = escape_view.has_escaped();
        info!(
            exploration_steps = exploration.steps,
            escape_steps = escape.steps,
            gold = escape.gold_collected,
            time_remaining = escape.time_remaining,
            escaped,
            "Episode finished in {:.2}ms",
            started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(GameReport {
            exploration,
            escape,
            escaped,
        })
    }
}
