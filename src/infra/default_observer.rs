use tracing::{debug, info};

use crate::infra::{Cost, GameObserver, NodeId, Phase};
use crate::planners::EscapeMode;

/// Logs every event through `tracing`.
pub struct DefaultObserver;

impl GameObserver for DefaultObserver {
    fn on_phase_start(&mut self, phase: Phase, start: NodeId) {
        info!("{:?} phase started at {}", phase, start);
    }

    fn on_move(&mut self, phase: Phase, from: NodeId, to: NodeId) {
        debug!(?phase, "move {} -> {}", from, to);
    }

    fn on_backtrack(&mut self, from: NodeId, to: NodeId) {
        debug!("backtrack {} -> {}", from, to);
    }

    fn on_mode_selected(&mut self, mode: &EscapeMode, time_remaining: Cost) {
        debug!(time_remaining, "Selected mode: {:?}", mode);
    }

    fn on_gold_collected(&mut self, node: NodeId, amount: u32, total: u64) {
        info!("Picked up {} gold at {} (total {})", amount, node, total);
    }

    fn on_phase_finished(&mut self, phase: Phase, at: NodeId, steps: usize) {
        info!("{:?} phase finished at {} after {} steps", phase, at, steps);
    }
}
