use crate::infra::{Cost, NodeId};
use crate::planners::EscapeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Exploration,
    Escape,
}

/// Trait for observing agent decisions and moves during an episode
pub trait GameObserver {
    /// Called when a phase starts, before the first decision
    fn on_phase_start(&mut self, phase: Phase, start: NodeId);

    /// Called after every successful move, backtracks included
    fn on_move(&mut self, _phase: Phase, _from: NodeId, _to: NodeId) {}

    /// Called when the explorer retreats from an exhausted node
    fn on_backtrack(&mut self, _from: NodeId, _to: NodeId) {}

    /// Called each time the escape planner re-evaluates harvest versus flee
    fn on_mode_selected(&mut self, _mode: &EscapeMode, _time_remaining: Cost) {}

    /// Called after gold is picked up; `total` is the running sum for the phase
    fn on_gold_collected(&mut self, _node: NodeId, _amount: u32, _total: u64) {}

    /// Called when a phase ends successfully
    fn on_phase_finished(&mut self, phase: Phase, at: NodeId, steps: usize);
}
