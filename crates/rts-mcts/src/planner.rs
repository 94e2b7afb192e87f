//! One planning cycle end to end: observe, determinize, search, commit.

use rand::rngs::SmallRng;
use rts_command::CommandQueue;
use rts_core::{derive_seed, seeded_rng, Deadline, Engine, Order, PlayerId, StableId};
use rts_fog::{known_positions, Determinizer, SightingTracker};
use rts_macro::{Command, MacroAction};
use tracing::{debug, trace, warn};

use crate::{CycleContext, CycleStats, Mcts, PlannerConfig};

/// What the planner decided this cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: MacroAction,
    /// Orders appended to the live queue, in dispatch order.
    pub orders: Vec<Order>,
    pub stats: CycleStats,
    /// `true` when the searched action could not be committed and `DoNothing` was used.
    pub fallback: bool,
}

/// Plans for one player across many cycles.
///
/// Holds the sighting history between cycles; everything else is rebuilt each cycle.
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
    mcts: Mcts,
    determinizer: Determinizer,
    tracker: SightingTracker,
    cycle: CycleContext,
    cycles: u64,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        let mcts = Mcts::new(config.search.clone(), config.heuristic);
        let determinizer = Determinizer::new(config.determinizer.clone());
        Self {
            config,
            mcts,
            determinizer,
            tracker: SightingTracker::new(),
            cycle: CycleContext::new(),
            cycles: 0,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn tracker(&self) -> &SightingTracker {
        &self.tracker
    }

    /// Completed planning cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Choose a macro action for `player` and append its orders to `queues`.
    ///
    /// Always returns a decision; when nothing can be committed the queue is held for one tick.
    pub fn plan<E: Engine>(
        &mut self,
        live: &E,
        player: PlayerId,
        queues: &mut CommandQueue,
        deadline: Deadline,
    ) -> Decision {
        self.cycle.reset();
        let seed = derive_seed(self.config.search.seed, player.stable_id(), self.cycles);
        let cycle = self.cycles;
        self.cycles += 1;
        let mut rng = seeded_rng(seed);

        queues.prune(live, player);
        self.tracker.observe(live, player);
        let known = known_positions(live, player);
        let sightings = self.tracker.records();

        let world = self
            .determinizer
            .determinize(live, player, &known, &sightings, &mut rng);
        let mut root = live.clone();
        if let Err(err) = world.apply(&mut root) {
            warn!(%err, "determinization rejected, searching the observed state");
            root = live.clone();
        }

        let determinizer = &self.determinizer;
        let resample = |state: &mut E, rng: &mut SmallRng| {
            let world = determinizer.determinize(live, player, &known, &sightings, rng);
            if let Err(err) = world.apply(state) {
                trace!(%err, "rollout redeterminization incomplete");
            }
        };
        let result = self.mcts.search_with(
            root,
            player,
            queues,
            &mut self.cycle,
            deadline,
            seed,
            resample,
        );
        let stats = result.stats;
        if stats.iterations == 0 || result.tree.get(result.tree.root()).is_leaf() {
            warn!(%player, cycle, "search produced no candidates");
        }

        let decision = match Command::commit(
            result.action,
            live,
            player,
            queues,
            &mut self.cycle.macros,
        ) {
            Ok(command) => Decision {
                action: command.action,
                orders: command.scheduled.into_iter().collect(),
                stats,
                fallback: false,
            },
            Err(reason) => {
                warn!(%player, %reason, "chosen action infeasible on live state, doing nothing");
                queues.apply_directive(MacroAction::DoNothing.directive());
                Decision {
                    action: MacroAction::DoNothing,
                    orders: Vec::new(),
                    stats,
                    fallback: true,
                }
            }
        };

        debug!(
            %player,
            cycle,
            action = %decision.action,
            orders = decision.orders.len(),
            iterations = stats.iterations,
            nodes = stats.nodes,
            skipped = stats.skipped_expansions,
            aborted = stats.aborted_rollouts,
            "planning cycle done"
        );
        decision
    }
}
