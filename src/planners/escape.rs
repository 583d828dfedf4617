use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::{ExitPolicy, GoldTieBreak, PlannerConfig};
use crate::infra::{Cost, Dijkstra, GameObserver, NodeId, Path, PathError, Phase, PlanError};
use crate::state::{EscapeView, Graph};

/// Outcome of one harvest-or-flee evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeMode {
    /// Head for `target`; going there and then on to the exit costs `detour_cost`.
    Harvesting { target: NodeId, detour_cost: Cost },
    /// Take the cheapest route to the exit and stop detouring.
    Fleeing { direct_cost: Cost },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscapeReport {
    pub steps: usize,
    pub gold_collected: u64,
    pub time_remaining: Cost,
    /// Number of distinct gold targets committed to.
    pub detours: usize,
}

struct Decision {
    mode: EscapeMode,
    /// Towards the gold target when harvesting, to the exit when fleeing.
    path: Path,
}

/// Harvests gold while a detour still fits in the time budget, then flees.
///
/// The decision is redone after every single move. A harvesting decision
/// guarantees `cost(here -> target -> exit) <= time_remaining - safety_margin`,
/// and stepping along the cheapest path keeps that true, so the direct route
/// to the exit is always affordable on the next evaluation.
pub struct EscapePlanner {
    config: PlannerConfig,
}

impl EscapePlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn escape<V>(
        &self,
        view: &mut V,
        observer: &mut dyn GameObserver,
    ) -> Result<EscapeReport, PlanError>
    where
        V: EscapeView + ?Sized,
    {
        let exit = view.exit_node();
        observer.on_phase_start(Phase::Escape, view.current_node());

        let mut report = EscapeReport::default();
        let mut committed: Option<NodeId> = None;
        collect_here(view, observer, &mut report)?;

        loop {
            // Only the starting position may skip the arrival check.
            let here = view.current_node();
            if here == exit
                && (report.steps > 0 || self.config.exit_policy == ExitPolicy::StopOnArrival)
            {
                break;
            }

            let decision = self.decide(view)?;
            observer.on_mode_selected(&decision.mode, view.time_remaining());

            match (&decision.mode, decision.path.next_hop()) {
                (EscapeMode::Harvesting { target, detour_cost }, Some(next)) => {
                    if committed != Some(*target) {
                        debug!(
                            %target,
                            detour_cost,
                            time_remaining = view.time_remaining(),
                            "Committing to gold detour"
                        );
                        committed = Some(*target);
                        report.detours += 1;
                    }
                    step(view, observer, &mut report, next)?;
                    if view.current_node() == exit {
                        break;
                    }
                }
                _ => {
                    debug!(
                        cost = decision.path.cost(),
                        time_remaining = view.time_remaining(),
                        "Fleeing to exit"
                    );
                    for &next in decision.path.nodes().iter().skip(1) {
                        step(view, observer, &mut report, next)?;
                        if view.current_node() == exit {
                            break;
                        }
                    }
                    break;
                }
            }
        }

        report.time_remaining = view.time_remaining();
        observer.on_phase_finished(Phase::Escape, view.current_node(), report.steps);
        Ok(report)
    }

    /// Evaluate harvest versus flee from the current position.
    fn decide<V>(&self, view: &V) -> Result<Decision, PlanError>
    where
        V: EscapeView + ?Sized,
    {
        let graph = view.graph();
        let here = view.current_node();
        let exit = view.exit_node();
        let time_remaining = view.time_remaining();

        let direct = Dijkstra::find_path(graph, here, exit).map_err(|err| match err {
            PathError::Unreachable { .. } => {
                warn!(%here, %exit, "Exit unreachable");
                PlanError::ExitUnreachable { from: here, exit }
            }
            other => other.into(),
        })?;
        if direct.cost() > time_remaining {
            warn!(needed = direct.cost(), time_remaining, "Not enough time left to reach the exit");
            return Err(PlanError::BudgetExceeded {
                needed: direct.cost(),
                remaining: time_remaining,
            });
        }

        let reach = Dijkstra::distances(graph, here)?;
        let Some(target) = self.best_gold_node(graph, here, &reach) else {
            return Ok(flee(direct));
        };

        let to_gold = Dijkstra::find_path(graph, here, target)?;
        let to_exit = Dijkstra::path_cost(graph, target, exit)?;
        let detour_cost = to_gold.cost() + to_exit;

        if time_remaining - self.config.safety_margin < detour_cost {
            debug!(
                %target,
                detour_cost,
                time_remaining,
                margin = self.config.safety_margin,
                "Detour not affordable"
            );
            return Ok(flee(direct));
        }

        Ok(Decision {
            mode: EscapeMode::Harvesting { target, detour_cost },
            path: to_gold,
        })
    }

    /// Richest reachable node other than `here`, ties settled by the configured rule.
    fn best_gold_node(
        &self,
        graph: &Graph,
        here: NodeId,
        reach: &HashMap<NodeId, Cost>,
    ) -> Option<NodeId> {
        graph
            .nodes()
            .filter(|node| node.id() != here && node.gold() > 0)
            .filter_map(|node| reach.get(&node.id()).map(|&cost| (node, cost)))
            .min_by_key(|&(node, cost)| {
                let tie = match self.config.tie_break {
                    GoldTieBreak::LowestId => 0,
                    GoldTieBreak::Nearest => cost,
                };
                (Reverse(node.gold()), tie, node.id())
            })
            .map(|(node, _)| node.id())
    }
}

fn flee(direct: Path) -> Decision {
    Decision {
        mode: EscapeMode::Fleeing {
            direct_cost: direct.cost(),
        },
        path: direct,
    }
}

fn step<V>(
    view: &mut V,
    observer: &mut dyn GameObserver,
    report: &mut EscapeReport,
    next: NodeId,
) -> Result<(), PlanError>
where
    V: EscapeView + ?Sized,
{
    let from = view.current_node();
    view.move_to(next)?;
    report.steps += 1;
    observer.on_move(Phase::Escape, from, next);
    collect_here(view, observer, report)
}

fn collect_here<V>(
    view: &mut V,
    observer: &mut dyn GameObserver,
    report: &mut EscapeReport,
) -> Result<(), PlanError>
where
    V: EscapeView + ?Sized,
{
    let here = view.current_node();
    if view.graph().gold(here).unwrap_or(0) == 0 {
        return Ok(());
    }
    let amount = view.pick_up_gold()?;
    report.gold_collected += u64::from(amount);
    observer.on_gold_collected(here, amount, report.gold_collected);
    Ok(())
}
