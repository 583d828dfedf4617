pub mod config;
pub mod infra;
pub mod planners;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{CaveConfig, ExitPolicy, GoldTieBreak, PlannerConfig};
pub use infra::{Dijkstra, NodeId, Path, PriorityFrontier};
pub use planners::{EscapePlanner, ExplorePlanner, Game};
pub use state::Graph;
