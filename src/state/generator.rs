use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::CaveConfig;
use crate::infra::{ConfigError, Cost, Dijkstra, GraphError, NodeId, PathError, Position};
use crate::state::{EscapeCavern, ExplorationCavern, Graph};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// A generated grid cave: one node per tile, edges between open neighbours.
#[derive(Debug, Clone)]
pub struct Cave {
    pub graph: Graph,
    pub positions: HashMap<NodeId, Position>,
    pub entrance: NodeId,
    pub orb: NodeId,
    pub exit: NodeId,
    pub time_budget: Cost,
    pub seed: u64,
}

impl Cave {
    pub fn exploration(&self) -> Result<ExplorationCavern, GraphError> {
        ExplorationCavern::new(self.graph.clone(), self.positions.clone(), self.entrance, self.orb)
    }

    /// The escape starts wherever exploration ended, normally the orb.
    pub fn escape_from(&self, start: NodeId) -> Result<EscapeCavern, GraphError> {
        EscapeCavern::new(self.graph.clone(), start, self.exit, self.time_budget)
    }
}

fn tile_id(config: &CaveConfig, pos: Position) -> NodeId {
    NodeId((pos.y as u64) * (config.width as u64) + pos.x as u64)
}

fn in_bounds(config: &CaveConfig, pos: &Position) -> bool {
    pos.x >= 0 && pos.x < config.width && pos.y >= 0 && pos.y < config.height
}

/// Generate a connected cave: a randomised depth-first maze over the grid,
/// with extra walls knocked through to create loops.
#[tracing::instrument(
    level = "debug",
    skip(config),
    fields(width = config.width, height = config.height)
)]
pub fn generate(config: &CaveConfig) -> Result<Cave, GenerateError> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);

    let mut graph = Graph::new();
    let mut positions = HashMap::new();
    for y in 0..config.height {
        for x in 0..config.width {
            let pos = Position::new(x, y);
            let gold = if rng.random_bool(config.gold_chance) {
                rng.random_range(1..=config.max_gold)
            } else {
                0
            };
            let id = tile_id(config, pos);
            graph.add_node(id, gold)?;
            positions.insert(id, pos);
        }
    }

    // Maze carving
    let origin = Position::new(
        rng.random_range(0..config.width),
        rng.random_range(0..config.height),
    );
    let mut carved = HashSet::from([origin]);
    let mut stack = vec![origin];
    while let Some(&current) = stack.last() {
        let options: Vec<Position> = current
            .neighbors()
            .into_iter()
            .filter(|next| in_bounds(config, next) && !carved.contains(next))
            .collect();
        if options.is_empty() {
            stack.pop();
            continue;
        }
        let next = options[rng.random_range(0..options.len())];
        let length = rng.random_range(1..=config.max_weight);
        graph.add_edge(tile_id(config, current), tile_id(config, next), length)?;
        carved.insert(next);
        stack.push(next);
    }

    // Loops
    for y in 0..config.height {
        for x in 0..config.width {
            let here = Position::new(x, y);
            for there in [Position::new(x + 1, y), Position::new(x, y + 1)] {
                if !in_bounds(config, &there) {
                    continue;
                }
                let (a, b) = (tile_id(config, here), tile_id(config, there));
                if !graph.is_adjacent(a, b) && rng.random_bool(config.loop_chance) {
                    graph.add_edge(a, b, rng.random_range(1..=config.max_weight))?;
                }
            }
        }
    }

    let ids: Vec<NodeId> = graph.nodes().map(|node| node.id()).collect();
    let entrance = ids[rng.random_range(0..ids.len())];
    let orb = loop {
        let candidate = ids[rng.random_range(0..ids.len())];
        if candidate != entrance {
            break candidate;
        }
    };
    let exit = ids[rng.random_range(0..ids.len())];

    let shortest = Dijkstra::path_cost(&graph, orb, exit)?;
    let time_budget = ((shortest as f64) * config.time_slack).ceil() as Cost;

    tracing::debug!(
        seed,
        nodes = graph.len(),
        edges = graph.edge_count(),
        total_gold = graph.total_gold(),
        %entrance,
        %orb,
        %exit,
        time_budget,
        "Cave generated"
    );

    Ok(Cave {
        graph,
        positions,
        entrance,
        orb,
        exit,
        time_budget,
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> CaveConfig {
        CaveConfig {
            width: 6,
            height: 5,
            seed: Some(seed),
            ..CaveConfig::default()
        }
    }

    #[test]
    fn test_cave_is_connected_with_positive_weights() {
        for seed in 0..20 {
            let cave = generate(&config(seed)).unwrap();
            assert_eq!(cave.graph.len(), 30);
            assert!(cave.graph.edge_count() >= 29, "spanning tree needs n-1 edges");
            assert!(cave.graph.edges().all(|edge| edge.length() >= 1));

            let reach = Dijkstra::distances(&cave.graph, cave.entrance).unwrap();
            assert_eq!(reach.len(), cave.graph.len(), "seed {seed} left tiles unreachable");
            assert_ne!(cave.entrance, cave.orb);
        }
    }

    #[test]
    fn test_budget_covers_shortest_escape() {
        for seed in 0..20 {
            let cave = generate(&config(seed)).unwrap();
            let shortest = Dijkstra::path_cost(&cave.graph, cave.orb, cave.exit).unwrap();
            assert!(cave.time_budget >= shortest);
        }
    }

    #[test]
    fn test_same_seed_same_cave() {
        let first = generate(&config(5)).unwrap();
        let second = generate(&config(5)).unwrap();
        assert_eq!(first.orb, second.orb);
        assert_eq!(first.exit, second.exit);
        assert_eq!(first.time_budget, second.time_budget);
        let edges = |cave: &Cave| -> Vec<(NodeId, NodeId, Cost)> {
            cave.graph
                .edges()
                .map(|edge| {
                    let (a, b) = edge.endpoints();
                    (a, b, edge.length())
                })
                .collect()
        };
        assert_eq!(edges(&first), edges(&second));
    }

    #[test]
    fn test_edges_join_grid_neighbours() {
        let cave = generate(&config(3)).unwrap();
        for edge in cave.graph.edges() {
            let (a, b) = edge.endpoints();
            assert!(cave.positions[&a].is_adjacent(&cave.positions[&b]));
        }
    }
}
