use std::collections::HashMap;

use crate::infra::{Cost, GraphError, HarnessError, NodeId, Position};
use crate::state::{EscapeView, ExplorationView, Graph, NeighborStatus};

/// In-memory exploration harness. Distances to the orb are Manhattan
/// distances between tile positions, so walls are ignored.
#[derive(Debug, Clone)]
pub struct ExplorationCavern {
    graph: Graph,
    positions: HashMap<NodeId, Position>,
    orb: NodeId,
    current: NodeId,
    steps: usize,
}

impl ExplorationCavern {
    /// Every node in `graph` needs a position.
    pub fn new(
        graph: Graph,
        positions: HashMap<NodeId, Position>,
        start: NodeId,
        orb: NodeId,
    ) -> Result<Self, GraphError> {
        for id in [start, orb] {
            if !graph.contains(id) {
                return Err(GraphError::UnknownNode(id));
            }
        }
        if let Some(missing) = graph.nodes().find(|node| !positions.contains_key(&node.id())) {
            return Err(GraphError::UnknownNode(missing.id()));
        }
        Ok(Self {
            graph,
            positions,
            orb,
            current: start,
            steps: 0,
        })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    fn distance_from(&self, id: NodeId) -> u32 {
        match (self.positions.get(&id), self.positions.get(&self.orb)) {
            (Some(from), Some(orb)) => from.distance(orb),
            _ => u32::MAX,
        }
    }
}

impl ExplorationView for ExplorationCavern {
    fn current_location(&self) -> NodeId {
        self.current
    }

    fn neighbors(&self) -> Vec<NeighborStatus> {
        self.graph
            .neighbors(self.current)
            .map(|id| NeighborStatus {
                id,
                distance_to_target: self.distance_from(id),
            })
            .collect()
    }

    fn distance_to_target(&self) -> u32 {
        self.distance_from(self.current)
    }

    fn move_to(&mut self, id: NodeId) -> Result<(), HarnessError> {
        if !self.graph.is_adjacent(self.current, id) {
            return Err(HarnessError::NotAdjacent {
                from: self.current,
                to: id,
            });
        }
        self.current = id;
        self.steps += 1;
        Ok(())
    }
}

/// In-memory escape harness with a depleting time budget.
#[derive(Debug, Clone)]
pub struct EscapeCavern {
    graph: Graph,
    exit: NodeId,
    current: NodeId,
    time_remaining: Cost,
    gold_collected: u64,
    steps: usize,
}

impl EscapeCavern {
    pub fn new(
        graph: Graph,
        start: NodeId,
        exit: NodeId,
        time_budget: Cost,
    ) -> Result<Self, GraphError> {
        for id in [start, exit] {
            if !graph.contains(id) {
                return Err(GraphError::UnknownNode(id));
            }
        }
        Ok(Self {
            graph,
            exit,
            current: start,
            time_remaining: time_budget,
            gold_collected: 0,
            steps: 0,
        })
    }

    pub fn gold_collected(&self) -> u64 {
        self.gold_collected
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn has_escaped(&self) -> bool {
        self.current == self.exit && self.time_remaining >= 0
    }
}

impl EscapeView for EscapeCavern {
    fn current_node(&self) -> NodeId {
        self.current
    }

    fn exit_node(&self) -> NodeId {
        self.exit
    }

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn time_remaining(&self) -> Cost {
        self.time_remaining
    }

    fn move_to(&mut self, node: NodeId) -> Result<(), HarnessError> {
        let from = self.current;
        let cost = self
            .graph
            .edge_between(from, node)
            .map(|edge| edge.length())
            .ok_or(HarnessError::NotAdjacent { from, to: node })?;
        if cost > self.time_remaining {
            return Err(HarnessError::OutOfTime {
                from,
                to: node,
                cost,
                remaining: self.time_remaining,
            });
        }
        self.time_remaining -= cost;
        self.current = node;
        self.steps += 1;
        Ok(())
    }

    fn pick_up_gold(&mut self) -> Result<u32, HarnessError> {
        let amount = self.graph.take_gold(self.current)?;
        self.gold_collected += u64::from(amount);
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::graph::tests::graph_from;

    fn line_positions(ids: &[u64]) -> HashMap<NodeId, Position> {
        ids.iter()
            .map(|&id| (NodeId(id), Position::new(id as i32, 0)))
            .collect()
    }

    #[test]
    fn test_exploration_oracle_and_moves() {
        let graph = graph_from(&[(1, 0), (2, 0), (3, 0)], &[(1, 2, 1), (2, 3, 1)]);
        let positions = line_positions(&[1, 2, 3]);
        let mut cavern = ExplorationCavern::new(graph, positions, NodeId(1), NodeId(3)).unwrap();

        assert_eq!(cavern.distance_to_target(), 2);
        assert_eq!(
            cavern.neighbors(),
            vec![NeighborStatus {
                id: NodeId(2),
                distance_to_target: 1
            }]
        );
        assert_eq!(
            cavern.move_to(NodeId(3)),
            Err(HarnessError::NotAdjacent {
                from: NodeId(1),
                to: NodeId(3)
            })
        );
        cavern.move_to(NodeId(2)).unwrap();
        cavern.move_to(NodeId(3)).unwrap();
        assert_eq!(cavern.distance_to_target(), 0);
        assert_eq!(cavern.steps(), 2);
    }

    #[test]
    fn test_exploration_requires_positions() {
        let graph = graph_from(&[(1, 0), (2, 0)], &[(1, 2, 1)]);
        let result = ExplorationCavern::new(graph, line_positions(&[1]), NodeId(1), NodeId(1));
        assert_eq!(result.err(), Some(GraphError::UnknownNode(NodeId(2))));
    }

    #[test]
    fn test_escape_charges_edge_length() {
        let graph = graph_from(&[(1, 0), (2, 4), (3, 0)], &[(1, 2, 3), (2, 3, 5)]);
        let mut cavern = EscapeCavern::new(graph, NodeId(1), NodeId(3), 7).unwrap();

        cavern.move_to(NodeId(2)).unwrap();
        assert_eq!(cavern.time_remaining(), 4);
        assert_eq!(cavern.pick_up_gold(), Ok(4));
        assert_eq!(
            cavern.pick_up_gold(),
            Err(HarnessError::Graph(GraphError::Depleted(NodeId(2))))
        );
        assert_eq!(
            cavern.move_to(NodeId(3)),
            Err(HarnessError::OutOfTime {
                from: NodeId(2),
                to: NodeId(3),
                cost: 5,
                remaining: 4
            })
        );
        assert_eq!(cavern.current_node(), NodeId(2));
        assert_eq!(cavern.gold_collected(), 4);
        assert!(!cavern.has_escaped());
    }
}
