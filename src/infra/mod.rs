mod default_observer;
mod error;
mod frontier;
mod game_observer;
mod pathfinding;
mod types;

pub use default_observer::DefaultObserver;
pub use error::{ConfigError, GraphError, HarnessError, PathError, PlanError};
pub use frontier::PriorityFrontier;
pub use game_observer::{GameObserver, Phase};
pub use pathfinding::{Dijkstra, Path};
pub use types::{Cost, NodeId, Position};

/// Observer that ignores everything, for callers that only want the report.
pub struct NullObserver;

impl GameObserver for NullObserver {
    fn on_phase_start(&mut self, _phase: Phase, _start: NodeId) {}

    fn on_phase_finished(&mut self, _phase: Phase, _at: NodeId, _steps: usize) {}
}
