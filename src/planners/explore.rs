use std::collections::HashSet;

use tracing::{debug, warn};

use crate::infra::{GameObserver, NodeId, Phase, PlanError};
use crate::state::ExplorationView;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplorationReport {
    pub steps: usize,
    pub backtracks: usize,
    pub visited: usize,
}

/// One level of the walk: a node and its neighbours, nearest to the orb first.
struct Frame {
    node: NodeId,
    candidates: Vec<NodeId>,
    next: usize,
}

impl Frame {
    fn enter<V: ExplorationView + ?Sized>(view: &V) -> Self {
        let mut neighbors = view.neighbors();
        neighbors.sort_by_key(|n| (n.distance_to_target, n.id));
        Self {
            node: view.current_location(),
            candidates: neighbors.into_iter().map(|n| n.id).collect(),
            next: 0,
        }
    }

    fn next_unvisited(&mut self, visited: &HashSet<NodeId>) -> Option<NodeId> {
        while let Some(&candidate) = self.candidates.get(self.next) {
            self.next += 1;
            if !visited.contains(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Greedy depth-first walk towards the orb with only local knowledge.
///
/// Each node is entered at most once; when a node has no unvisited
/// neighbours left the agent walks back to where it came from. On a finite
/// graph that bounds the walk to two moves per edge of the search tree.
pub struct ExplorePlanner;

impl ExplorePlanner {
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn explore<V>(
        view: &mut V,
        observer: &mut dyn GameObserver,
    ) -> Result<ExplorationReport, PlanError>
    where
        V: ExplorationView + ?Sized,
    {
        let start = view.current_location();
        observer.on_phase_start(Phase::Exploration, start);

        let mut report = ExplorationReport::default();
        let mut visited = HashSet::from([start]);
        let mut stack = vec![Frame::enter(view)];

        while view.distance_to_target() != 0 {
            let Some(frame) = stack.last_mut() else {
                warn!(
                    visited = visited.len(),
                    steps = report.steps,
                    "Search exhausted without finding the orb"
                );
                return Err(PlanError::TargetNotFound {
                    visited: visited.len(),
                    steps: report.steps,
                });
            };
            let here = frame.node;

            match frame.next_unvisited(&visited) {
                Some(next) => {
                    visited.insert(next);
                    view.move_to(next)?;
                    report.steps += 1;
                    observer.on_move(Phase::Exploration, here, next);
                    stack.push(Frame::enter(view));
                }
                None => {
                    stack.pop();
                    if let Some(parent) = stack.last() {
                        let back = parent.node;
                        view.move_to(back)?;
                        report.steps += 1;
                        report.backtracks += 1;
                        observer.on_backtrack(here, back);
                        observer.on_move(Phase::Exploration, here, back);
                    }
                }
            }
        }

        report.visited = visited.len();
        let at = view.current_location();
        debug!(steps = report.steps, backtracks = report.backtracks, "Orb reached at {}", at);
        observer.on_phase_finished(Phase::Exploration, at, report.steps);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::CaveConfig;
    use crate::infra::{HarnessError, Position};
    use crate::state::graph::tests::graph_from;
    use crate::state::{ExplorationCavern, NeighborStatus, generate};

    #[derive(Default)]
    struct Recorder {
        moves: Vec<(NodeId, NodeId)>,
        backtracks: Vec<(NodeId, NodeId)>,
        finished_at: Option<NodeId>,
    }

    impl GameObserver for Recorder {
        fn on_phase_start(&mut self, _phase: Phase, _start: NodeId) {}

        fn on_move(&mut self, _phase: Phase, from: NodeId, to: NodeId) {
            self.moves.push((from, to));
        }

        fn on_backtrack(&mut self, from: NodeId, to: NodeId) {
            self.backtracks.push((from, to));
        }

        fn on_phase_finished(&mut self, _phase: Phase, at: NodeId, _steps: usize) {
            self.finished_at = Some(at);
        }
    }

    fn cavern(
        nodes: &[u64],
        edges: &[(u64, u64)],
        coords: &[(u64, i32, i32)],
        start: u64,
        orb: u64,
    ) -> ExplorationCavern {
        let nodes: Vec<(u64, u32)> = nodes.iter().map(|&id| (id, 0)).collect();
        let edges: Vec<(u64, u64, i64)> = edges.iter().map(|&(a, b)| (a, b, 1)).collect();
        let positions: HashMap<NodeId, Position> = coords
            .iter()
            .map(|&(id, x, y)| (NodeId(id), Position::new(x, y)))
            .collect();
        let graph = graph_from(&nodes, &edges);
        ExplorationCavern::new(graph, positions, NodeId(start), NodeId(orb)).unwrap()
    }

    #[test]
    fn test_walks_straight_to_orb_when_greedy_works() {
        let mut view = cavern(
            &[1, 2, 3, 4],
            &[(1, 2), (2, 3), (1, 4)],
            &[(1, 0, 0), (2, 1, 0), (3, 2, 0), (4, 0, 1)],
            1,
            3,
        );
        let mut recorder = Recorder::default();
        let report = ExplorePlanner::explore(&mut view, &mut recorder).unwrap();

        assert_eq!(view.current_location(), NodeId(3));
        assert_eq!(report.steps, 2);
        assert_eq!(report.backtracks, 0);
        assert_eq!(recorder.finished_at, Some(NodeId(3)));
    }

    #[test]
    fn test_backtracks_out_of_dead_end() {
        // 2 is closer to the orb but a dead end; the orb hangs off 4.
        //   2 - 1 - 4 - 3
        let mut view = cavern(
            &[1, 2, 3, 4],
            &[(1, 2), (1, 4), (4, 3)],
            &[(1, 1, 0), (2, 2, 1), (3, 2, 3), (4, 0, 0)],
            1,
            3,
        );
        let mut recorder = Recorder::default();
        let report = ExplorePlanner::explore(&mut view, &mut recorder).unwrap();

        assert_eq!(view.current_location(), NodeId(3));
        assert_eq!(recorder.backtracks, vec![(NodeId(2), NodeId(1))]);
        assert_eq!(
            recorder.moves,
            vec![
                (NodeId(1), NodeId(2)),
                (NodeId(2), NodeId(1)),
                (NodeId(1), NodeId(4)),
                (NodeId(4), NodeId(3)),
            ]
        );
        assert_eq!(report.steps, 4);
        assert_eq!(report.backtracks, 1);
    }

    #[test]
    fn test_no_move_when_starting_on_orb() {
        let mut view = cavern(&[1, 2], &[(1, 2)], &[(1, 0, 0), (2, 1, 0)], 1, 1);
        let report = ExplorePlanner::explore(&mut view, &mut Recorder::default()).unwrap();
        assert_eq!(report.steps, 0);
        assert_eq!(view.steps(), 0);
    }

    #[test]
    fn test_unreachable_orb_is_reported() {
        let mut view = cavern(
            &[1, 2, 3],
            &[(1, 2)],
            &[(1, 0, 0), (2, 1, 0), (3, 5, 5)],
            1,
            3,
        );
        let result = ExplorePlanner::explore(&mut view, &mut Recorder::default());
        assert_eq!(result, Err(PlanError::TargetNotFound { visited: 2, steps: 2 }));
        assert_eq!(view.current_location(), NodeId(1));
    }

    /// View whose oracle ties every neighbour, so order falls back to ids.
    struct FlatView {
        inner: ExplorationCavern,
    }

    impl ExplorationView for FlatView {
        fn current_location(&self) -> NodeId {
            self.inner.current_location()
        }

        fn neighbors(&self) -> Vec<NeighborStatus> {
            let mut neighbors = self.inner.neighbors();
            neighbors.reverse();
            for n in neighbors.iter_mut() {
                n.distance_to_target = 1;
            }
            neighbors
        }

        fn distance_to_target(&self) -> u32 {
            self.inner.distance_to_target()
        }

        fn move_to(&mut self, id: NodeId) -> Result<(), HarnessError> {
            self.inner.move_to(id)
        }
    }

    #[test]
    fn test_ties_broken_by_id() {
        let inner = cavern(
            &[1, 5, 7, 9],
            &[(1, 9), (1, 5), (1, 7)],
            &[(1, 0, 0), (5, 1, 0), (7, 0, 1), (9, 1, 1)],
            1,
            7,
        );
        let mut view = FlatView { inner };
        let mut recorder = Recorder::default();
        ExplorePlanner::explore(&mut view, &mut recorder).unwrap();
        assert_eq!(
            recorder.moves,
            vec![
                (NodeId(1), NodeId(5)),
                (NodeId(5), NodeId(1)),
                (NodeId(1), NodeId(7)),
            ]
        );
    }

    #[test]
    fn test_always_finishes_on_orb_in_generated_caves() {
        for seed in 0..40 {
            let cave = generate(&CaveConfig {
                width: 9,
                height: 7,
                seed: Some(seed),
                ..CaveConfig::default()
            })
            .unwrap();
            let mut view = cave.exploration().unwrap();
            let report = ExplorePlanner::explore(&mut view, &mut Recorder::default()).unwrap();

            assert_eq!(view.current_location(), cave.orb, "seed {seed}");
            assert_eq!(view.distance_to_target(), 0);
            assert!(
                report.steps <= 2 * cave.graph.len(),
                "seed {seed} took {} steps",
                report.steps
            );
            assert_eq!(report.steps, view.steps());
        }
    }
}
