use thiserror::Error;

use crate::infra::{Cost, NodeId};

/// Violations of the graph's construction or gold-collection contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("node {0} already exists")]
    DuplicateNode(NodeId),

    #[error("edge {a} - {b} already exists")]
    DuplicateEdge { a: NodeId, b: NodeId },

    #[error("edge from {0} to itself")]
    SelfLoop(NodeId),

    #[error("no gold left on node {0}")]
    Depleted(NodeId),
}

/// Shortest-path failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("no path from {from} to {to}")]
    Unreachable { from: NodeId, to: NodeId },

    #[error("edge {from} - {to} has non-positive weight {length}")]
    InvalidWeight {
        from: NodeId,
        to: NodeId,
        length: Cost,
    },
}

/// Rejections from the harness when an agent breaks a move or pickup precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    #[error("{to} is not adjacent to {from}")]
    NotAdjacent { from: NodeId, to: NodeId },

    #[error("moving {from} -> {to} costs {cost} but only {remaining} time remains")]
    OutOfTime {
        from: NodeId,
        to: NodeId,
        cost: Cost,
        remaining: Cost,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Fatal planning outcomes. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("exit {exit} unreachable from {from}")]
    ExitUnreachable { from: NodeId, exit: NodeId },

    #[error("route to exit needs {needed} but only {remaining} time remains")]
    BudgetExceeded { needed: Cost, remaining: Cost },

    #[error("orb not found after visiting {visited} nodes in {steps} steps")]
    TargetNotFound { visited: usize, steps: usize },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Harness(#[from] HarnessError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}")]
    Parse { key: &'static str, value: String },

    #[error("{key}: {reason}")]
    OutOfRange { key: &'static str, reason: String },
}
