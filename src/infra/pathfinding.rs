use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::infra::{Cost, NodeId, PathError, PriorityFrontier};
use crate::state::Graph;

/// A reconstructed route, inclusive of both ends. Only the solver builds
/// these, so `nodes` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<NodeId>,
    cost: Cost,
}

impl Path {
    fn new(nodes: Vec<NodeId>, cost: Cost) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes, cost }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn start(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn goal(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Number of edges walked.
    pub fn hops(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn next_hop(&self) -> Option<NodeId> {
        self.nodes.get(1).copied()
    }
}

// Solver-local bookkeeping, dropped at the end of each search.
#[derive(Debug, Clone, Copy)]
struct PathRecord {
    prev: Option<NodeId>,
    distance: Cost,
}

pub struct Dijkstra;

impl Dijkstra {
    /// Cheapest path from `start` to `goal`.
    ///
    /// The search stops as soon as `goal` leaves the frontier. A graph holding
    /// any edge with a non-positive weight is rejected before searching.
    #[tracing::instrument(level = "trace", skip_all, fields(start = %start, goal = %goal))]
    pub fn find_path(graph: &Graph, start: NodeId, goal: NodeId) -> Result<Path, PathError> {
        for id in [start, goal] {
            if !graph.contains(id) {
                return Err(PathError::UnknownNode(id));
            }
        }
        check_weights(graph)?;
        if start == goal {
            return Ok(Path::new(vec![start], 0));
        }

        let mut records = HashMap::new();
        let mut expansions = 0usize;
        let found = Self::search(graph, start, &mut records, |current| {
            expansions += 1;
            current == goal
        })?;

        match found {
            Some(distance) => {
                tracing::trace!(expansions, distance, "Path found");
                Ok(Path::new(reconstruct_path(&records, goal), distance))
            }
            None => {
                tracing::trace!(expansions, "No path found");
                Err(PathError::Unreachable {
                    from: start,
                    to: goal,
                })
            }
        }
    }

    pub fn path_cost(graph: &Graph, start: NodeId, goal: NodeId) -> Result<Cost, PathError> {
        Self::find_path(graph, start, goal).map(|path| path.cost())
    }

    /// Cheapest cost from `start` to every node reachable from it.
    #[tracing::instrument(level = "trace", skip_all, fields(start = %start))]
    pub fn distances(graph: &Graph, start: NodeId) -> Result<HashMap<NodeId, Cost>, PathError> {
        if !graph.contains(start) {
            return Err(PathError::UnknownNode(start));
        }
        check_weights(graph)?;
        let mut records = HashMap::new();
        Self::search(graph, start, &mut records, |_| false)?;
        Ok(records
            .into_iter()
            .map(|(id, record)| (id, record.distance))
            .collect())
    }

    /// Core relaxation loop. Returns the settled distance of the first node
    /// for which `is_goal` holds, or None once the frontier runs dry.
    fn search<G>(
        graph: &Graph,
        start: NodeId,
        records: &mut HashMap<NodeId, PathRecord>,
        mut is_goal: G,
    ) -> Result<Option<Cost>, PathError>
    where
        G: FnMut(NodeId) -> bool,
    {
        let mut frontier = PriorityFrontier::new();
        records.insert(
            start,
            PathRecord {
                prev: None,
                distance: 0,
            },
        );
        frontier.insert(start, 0);

        while let Some((current, distance)) = frontier.extract_min() {
            if is_goal(current) {
                return Ok(Some(distance));
            }

            for (next, edge) in graph.exits(current) {
                let candidate = distance + edge.length();
                match records.entry(next) {
                    Entry::Vacant(slot) => {
                        slot.insert(PathRecord {
                            prev: Some(current),
                            distance: candidate,
                        });
                        frontier.insert(next, candidate);
                    }
                    Entry::Occupied(mut slot) => {
                        let record = slot.get_mut();
                        if candidate < record.distance {
                            record.prev = Some(current);
                            record.distance = candidate;
                            frontier.decrease_key(next, candidate);
                        }
                    }
                }
            }
        }

        Ok(None)
    }
}

/// Dijkstra's settled distances are only final with strictly positive weights.
fn check_weights(graph: &Graph) -> Result<(), PathError> {
    match graph.edges().find(|edge| edge.length() <= 0) {
        Some(edge) => {
            let (from, to) = edge.endpoints();
            Err(PathError::InvalidWeight {
                from,
                to,
                length: edge.length(),
            })
        }
        None => Ok(()),
    }
}

fn reconstruct_path(records: &HashMap<NodeId, PathRecord>, goal: NodeId) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(prev) = records.get(&current).and_then(|record| record.prev) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
