use crate::infra::{Cost, HarnessError, NodeId};
use crate::state::Graph;

/// One open neighbour as seen during exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborStatus {
    pub id: NodeId,
    /// Oracle distance from this neighbour to the orb, ignoring walls.
    pub distance_to_target: u32,
}

/// What the agent can see and do while searching for the orb.
pub trait ExplorationView {
    fn current_location(&self) -> NodeId;

    fn neighbors(&self) -> Vec<NeighborStatus>;

    /// Zero exactly when standing on the orb.
    fn distance_to_target(&self) -> u32;

    fn move_to(&mut self, id: NodeId) -> Result<(), HarnessError>;
}

/// What the agent can see and do while escaping.
pub trait EscapeView {
    fn current_node(&self) -> NodeId;

    fn exit_node(&self) -> NodeId;

    /// The full cave, including current gold amounts.
    fn graph(&self) -> &Graph;

    fn time_remaining(&self) -> Cost;

    /// Walk one edge; the harness deducts its length from the remaining time.
    fn move_to(&mut self, node: NodeId) -> Result<(), HarnessError>;

    /// Take all gold on the current node. Fails if there is none.
    fn pick_up_gold(&mut self) -> Result<u32, HarnessError>;
}
