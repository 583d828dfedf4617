use std::collections::BTreeMap;

use crate::infra::{Cost, GraphError, NodeId};

/// Undirected weighted connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    a: NodeId,
    b: NodeId,
    length: Cost,
}

impl Edge {
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    pub fn length(&self) -> Cost {
        self.length
    }

    /// The endpoint opposite `from`. `from` must be one of the endpoints.
    pub fn other(&self, from: NodeId) -> NodeId {
        if from == self.a { self.b } else { self.a }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    gold: u32,
    edges: Vec<usize>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

/// Node and edge store for one episode.
///
/// Topology and weights are fixed once built; only per-node gold changes.
/// Nodes refer to their edges by index and never to each other, and iteration
/// is always in ascending id order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: NodeId, gold: u32) -> Result<(), GraphError> {
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.nodes.insert(
            id,
            Node {
                id,
                gold,
                edges: Vec::new(),
            },
        );
        Ok(())
    }

    /// Connect two existing nodes. Weights are not checked here; the solver
    /// rejects non-positive ones when it meets them.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, length: Cost) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        for id in [a, b] {
            if !self.nodes.contains_key(&id) {
                return Err(GraphError::UnknownNode(id));
            }
        }
        if self.edge_between(a, b).is_some() {
            return Err(GraphError::DuplicateEdge { a, b });
        }

        let index = self.edges.len();
        self.edges.push(Edge { a, b, length });
        for id in [a, b] {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.edges.push(index);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Incident edges of `id` paired with the node on the other side.
    pub fn exits(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Edge)> {
        self.nodes.get(&id).into_iter().flat_map(move |node| {
            node.edges.iter().map(move |&index| {
                let edge = &self.edges[index];
                (edge.other(id), edge)
            })
        })
    }

    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        self.exits(id).map(|(other, _)| other)
    }

    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        self.exits(a)
            .find(|(other, _)| *other == b)
            .map(|(_, edge)| edge)
    }

    pub fn is_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_between(a, b).is_some()
    }

    pub fn gold(&self, id: NodeId) -> Option<u32> {
        self.nodes.get(&id).map(|node| node.gold)
    }

    pub fn total_gold(&self) -> u64 {
        self.nodes.values().map(|node| u64::from(node.gold)).sum()
    }

    /// Remove and return all gold on `id`. Taking from an empty node is an error.
    pub fn take_gold(&mut self, id: NodeId) -> Result<u32, GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        if node.gold == 0 {
            return Err(GraphError::Depleted(id));
        }
        Ok(std::mem::take(&mut node.gold))
    }

    /// Total weight of walking `path` edge by edge, or None if two consecutive
    /// nodes are not adjacent.
    pub fn path_weight(&self, path: &[NodeId]) -> Option<Cost> {
        path.windows(2)
            .map(|pair| self.edge_between(pair[0], pair[1]).map(Edge::length))
            .sum()
    }
}
