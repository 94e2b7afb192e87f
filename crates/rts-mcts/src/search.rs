//! Select, expand, simulate and backpropagate until the deadline.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rts_command::CommandQueue;
use rts_core::{derive_seed, seeded_rng, Deadline, Engine, EngineView, PlayerId, StableId};
use rts_macro::{legal_actions, Command, MacroAction, MacroContext};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::heuristic::{self, HeuristicWeights};
use crate::node::{NodeId, SearchNode};
use crate::{CycleContext, SearchConfig, SearchTree};

/// Counters describing one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStats {
    /// Simulations that finished and were backpropagated.
    pub iterations: u32,
    pub nodes: usize,
    /// Actions dropped during expansion because they could not be resolved or executed.
    pub skipped_expansions: u32,
    /// Rollouts cut short by an engine error.
    pub aborted_rollouts: u32,
}

/// Tree and decision left behind by [`Mcts::search`].
#[derive(Debug)]
pub struct SearchResult<E> {
    pub tree: SearchTree<E>,
    /// Best root action, with its cached orders dropped. `DoNothing` when nothing was expanded.
    pub action: MacroAction,
    pub stats: CycleStats,
}

/// Monte-Carlo tree search over macro actions for a single player.
#[derive(Debug, Clone, Default)]
pub struct Mcts {
    config: SearchConfig,
    weights: HeuristicWeights,
}

impl Mcts {
    pub fn new(config: SearchConfig, weights: HeuristicWeights) -> Self {
        Self { config, weights }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    /// Search from `root_state` until `deadline` or the iteration cap.
    ///
    /// `queues` are the planning player's pending orders; other players start with empty
    /// queues. `seed` fixes the tree and rollout randomness.
    pub fn search<E: Engine>(
        &self,
        root_state: E,
        player: PlayerId,
        queues: &CommandQueue,
        ctx: &mut CycleContext,
        deadline: Deadline,
        seed: u64,
    ) -> SearchResult<E> {
        self.search_with(root_state, player, queues, ctx, deadline, seed, |_, _| {})
    }

    /// Like [`Mcts::search`], with `resample` redrawing hidden information on every rollout
    /// clone when [`SearchConfig::redeterminize_rollouts`] is set.
    #[allow(clippy::too_many_arguments)]
    pub fn search_with<E, F>(
        &self,
        root_state: E,
        player: PlayerId,
        queues: &CommandQueue,
        ctx: &mut CycleContext,
        deadline: Deadline,
        seed: u64,
        mut resample: F,
    ) -> SearchResult<E>
    where
        E: Engine,
        F: FnMut(&mut E, &mut SmallRng),
    {
        let mut stats = CycleStats::default();
        let mut rng = seeded_rng(derive_seed(seed, player.stable_id(), 0));

        let players = root_state.players().len().max(player.index() + 1);
        let mut root_queues = vec![CommandQueue::new(); players];
        root_queues[player.index()] = queues.clone();

        let score = heuristic::score(&root_state, player, &self.weights);
        ctx.window.observe(score);
        let mut root = SearchNode::new(root_state, root_queues, player, None, players, score);
        let terminal = root.state.is_game_over();
        if !terminal {
            root.unexplored = legal_actions(&root.state, player, queues, &ctx.macros, &mut rng);
        }
        let mut tree = SearchTree::new(root);

        while !terminal && !deadline.expired() {
            if let Some(cap) = self.config.max_iterations {
                if stats.iterations >= cap {
                    break;
                }
            }

            let selected = self.select(&tree, player, ctx);
            let leaf = if tree.get(selected).state.is_game_over() {
                selected
            } else {
                self.expand(&mut tree, selected, player, ctx, deadline, &mut rng, &mut stats)
                    .unwrap_or(selected)
            };

            let stream = u64::from(stats.iterations) + 1;
            let mut rollout_rng = seeded_rng(derive_seed(seed, player.stable_id(), stream));
            let Some(winners) = self.simulate(
                tree.get(leaf),
                player,
                deadline,
                &mut rollout_rng,
                &mut resample,
                &mut stats,
            ) else {
                break;
            };
            tree.backpropagate(leaf, &winners);
            stats.iterations += 1;
        }

        stats.nodes = tree.len();
        let action = match tree.best_child(player).and_then(|id| tree.get(id).action.clone()) {
            Some(mut action) => {
                action.invalidate();
                action
            }
            None => MacroAction::DoNothing,
        };
        SearchResult {
            tree,
            action,
            stats,
        }
    }

    /// Descend by UCB1 until a leaf, or a partially expanded node that rates at least as well as
    /// its best child.
    fn select<E: Engine>(
        &self,
        tree: &SearchTree<E>,
        player: PlayerId,
        ctx: &CycleContext,
    ) -> NodeId {
        let mut current = tree.root();
        loop {
            let node = tree.get(current);
            let Some(best) = tree.select_child(current, player, self.config.exploration) else {
                return current;
            };
            if !node.is_fully_expanded() {
                let own = ctx.window.normalize(node.score);
                let child = ctx.window.normalize(tree.get(best).score);
                if own >= child {
                    return current;
                }
            }
            current = best;
        }
    }

    /// Add children under `id` and return the last one created.
    ///
    /// The root takes every pending action at once; other nodes take one per visit. A leaf
    /// always also gets a `DoNothing` child.
    #[allow(clippy::too_many_arguments)]
    fn expand<E: Engine>(
        &self,
        tree: &mut SearchTree<E>,
        id: NodeId,
        player: PlayerId,
        ctx: &mut CycleContext,
        deadline: Deadline,
        rng: &mut SmallRng,
        stats: &mut CycleStats,
    ) -> Option<NodeId> {
        let was_leaf = tree.get(id).is_leaf();
        let mut batch = if id == tree.root() {
            std::mem::take(&mut tree.get_mut(id).unexplored)
        } else {
            tree.get_mut(id).unexplored.pop().into_iter().collect()
        };
        if was_leaf {
            batch.push(MacroAction::DoNothing);
        }

        let mut last = None;
        let mut pending = batch.into_iter();
        while let Some(action) = pending.next() {
            if deadline.expired() {
                let rest = std::iter::once(action).chain(pending.by_ref());
                let node = tree.get_mut(id);
                node.unexplored.extend(rest.filter(|a| !matches!(a, MacroAction::DoNothing)));
                break;
            }
            match self.step(tree.get(id), action, player, ctx, rng) {
                Some(child) => last = Some(tree.add_child(id, child)),
                None => stats.skipped_expansions += 1,
            }
        }
        last
    }

    /// Commit `action` on a clone of `parent` and simulate one tick.
    fn step<E: Engine>(
        &self,
        parent: &SearchNode<E>,
        action: MacroAction,
        player: PlayerId,
        ctx: &mut CycleContext,
        rng: &mut SmallRng,
    ) -> Option<SearchNode<E>> {
        let mut state = parent.state.clone();
        let mut queues = parent.queues.clone();
        let queue = queues.get_mut(player.index())?;

        let kind = action.kind();
        let command = match Command::commit(action, &state, player, queue, &mut ctx.macros) {
            Ok(command) => command,
            Err(reason) => {
                trace!(%kind, %reason, "expansion skipped");
                return None;
            }
        };
        let report = queue.dispatch(&mut state, player);
        if !report.rejected.is_empty() {
            trace!(%kind, rejected = report.rejected.len(), "expansion rejected by engine");
            return None;
        }
        if let Err(err) = state.advance(self.config.tick_ms) {
            trace!(%kind, %err, "expansion advance failed");
            return None;
        }
        prune_all(&state, &mut queues);

        let score = heuristic::score(&state, player, &self.weights);
        ctx.window.observe(score);
        let players = parent.wins.len();
        let mut node = SearchNode::new(state, queues, player, Some(command.action), players, score);
        if !node.state.is_game_over() {
            let mut actions = legal_actions(
                &node.state,
                player,
                &node.queues[player.index()],
                &ctx.macros,
                rng,
            );
            actions.shuffle(rng);
            node.unexplored = actions;
        }
        Some(node)
    }

    /// Random playout from `node`. `None` when the deadline cut it short.
    fn simulate<E, F>(
        &self,
        node: &SearchNode<E>,
        player: PlayerId,
        deadline: Deadline,
        rng: &mut SmallRng,
        resample: &mut F,
        stats: &mut CycleStats,
    ) -> Option<Vec<bool>>
    where
        E: Engine,
        F: FnMut(&mut E, &mut SmallRng),
    {
        let mut state = node.state.clone();
        let mut queues = node.queues.clone();
        if self.config.redeterminize_rollouts {
            resample(&mut state, rng);
        }

        let actors: Vec<PlayerId> = if self.config.rollout_opponents {
            state.players()
        } else {
            vec![player]
        };
        // Rollout claims must not leak into the cycle's bookkeeping.
        let mut scratch = MacroContext::new();

        for _ in 0..self.config.rollout_depth {
            if state.is_game_over() {
                break;
            }
            if deadline.expired() {
                return None;
            }
            for actor in &actors {
                let Some(queue) = queues.get_mut(actor.index()) else {
                    continue;
                };
                let mut options = legal_actions(&state, *actor, queue, &scratch, rng);
                options.push(MacroAction::DoNothing);
                if let Some(action) = options.choose(rng).cloned() {
                    // Infeasible picks simply leave the actor idle this tick.
                    let _ = Command::commit(action, &state, *actor, queue, &mut scratch);
                }
                queue.dispatch(&mut state, *actor);
            }
            if let Err(err) = state.advance(self.config.tick_ms) {
                trace!(%err, "rollout aborted");
                stats.aborted_rollouts += 1;
                break;
            }
            prune_all(&state, &mut queues);
        }

        Some(outcome(&state, player, node.wins.len()))
    }
}

fn prune_all<E: EngineView>(state: &E, queues: &mut [CommandQueue]) {
    for (i, queue) in queues.iter_mut().enumerate() {
        queue.prune(state, PlayerId(i as u8));
    }
}

/// Winners of a finished or cut-off playout.
///
/// A finished game reports the players with utility 1. Otherwise only `player` can win, by
/// holding a majority of the cities it can see.
pub fn outcome<E: Engine>(state: &E, player: PlayerId, players: usize) -> Vec<bool> {
    let mut winners = vec![false; players];
    if state.is_game_over() {
        for (slot, utility) in winners.iter_mut().zip(state.utility()) {
            *slot = (utility - 1.0).abs() < f64::EPSILON;
        }
    } else if holds_majority(state, player) {
        if let Some(slot) = winners.get_mut(player.index()) {
            *slot = true;
        }
    }
    winners
}

/// More than half of the cities `player` can see are its own. No visible city is not a win.
pub fn holds_majority<E: EngineView + ?Sized>(state: &E, player: PlayerId) -> bool {
    let visible: Vec<_> = state
        .cities()
        .into_iter()
        .filter(|c| state.is_visible(player, c.position))
        .collect();
    if visible.is_empty() {
        return false;
    }
    let owned = visible.iter().filter(|c| c.is_owned_by(player)).count();
    owned as f64 / visible.len() as f64 > 0.5
}
