//! Planner-vs-planner games on the sandbox engine.
//!
//! Every cycle each player plans under its own wall-clock budget, all command queues are
//! dispatched, and the engine advances one tick.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use rts_command::CommandQueue;
use rts_core::{derive_seed, Deadline, Engine, EngineView, PlayerId, StableId};
use rts_mcts::{ConfigError, Planner, PlannerConfig};
use rts_sandbox::{generate, MapConfig, SandboxEngine};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Configuration for self-play simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfPlayConfig {
    pub map: MapConfig,
    /// Planning cycles before the game is called.
    pub cycles: u32,
    /// Wall-clock budget per player per cycle.
    pub budget_ms: u64,
    /// Map seed; planner seeds are derived from it.
    pub seed: u64,
    pub planner: PlannerConfig,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            cycles: 120,
            budget_ms: 100,
            seed: 42,
            planner: PlannerConfig::default(),
        }
    }
}

impl SelfPlayConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }
}

/// How a game ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameOutcome {
    /// The engine declared a winner.
    Victory { winner: u8 },
    /// Out of cycles; `leader` holds the most cities, if anyone does outright.
    Unfinished { leader: Option<u8> },
    /// The engine refused to advance.
    Aborted { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: u8,
    /// Chosen macro actions by kind.
    pub decisions: BTreeMap<String, u32>,
    /// Cycles where the searched action could not be committed.
    pub fallbacks: u32,
    pub iterations: u64,
    pub orders_dispatched: u32,
    pub orders_rejected: u32,
    pub final_cities: u32,
    pub final_units: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfPlayResult {
    pub seed: u64,
    pub cycles_played: u32,
    pub game_time_ms: u64,
    pub outcome: GameOutcome,
    pub players: Vec<PlayerStats>,
    /// Wall clock.
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub games: u32,
    pub results: Vec<SelfPlayResult>,
    /// Victories per player.
    pub wins: Vec<u32>,
    pub unfinished: u32,
    pub aborted: u32,
}

/// Play one game.
pub fn run_selfplay(config: &SelfPlayConfig) -> SelfPlayResult {
    let start = Instant::now();
    let mut engine = generate(&config.map, config.seed);
    let players = engine.players();
    let tick_ms = config.planner.search.tick_ms;

    let mut planners: Vec<Planner> = players
        .iter()
        .map(|p| {
            let mut planner_config = config.planner.clone();
            planner_config.search.seed = derive_seed(config.seed, p.stable_id(), 0);
            Planner::new(planner_config)
        })
        .collect();
    let mut queues = vec![CommandQueue::new(); players.len()];
    let mut stats: Vec<PlayerStats> = players
        .iter()
        .map(|p| PlayerStats {
            player: p.0,
            ..Default::default()
        })
        .collect();

    info!(seed = config.seed, players = players.len(), "self-play started");

    let mut cycles_played = 0;
    let mut aborted = None;
    while cycles_played < config.cycles && !engine.is_game_over() {
        for (i, player) in players.iter().enumerate() {
            let deadline = Deadline::after_ms(config.budget_ms);
            let decision = planners[i].plan(&engine, *player, &mut queues[i], deadline);
            let entry = &mut stats[i];
            *entry
                .decisions
                .entry(decision.action.kind().as_str().to_owned())
                .or_default() += 1;
            entry.fallbacks += u32::from(decision.fallback);
            entry.iterations += u64::from(decision.stats.iterations);
        }
        cycles_played += 1;

        for (i, player) in players.iter().enumerate() {
            let report = queues[i].dispatch(&mut engine, *player);
            stats[i].orders_dispatched += report.scheduled.len() as u32;
            stats[i].orders_rejected += report.rejected.len() as u32;
        }
        if let Err(err) = engine.advance(tick_ms) {
            warn!(%err, cycle = cycles_played, "engine refused to advance, game aborted");
            aborted = Some(err.to_string());
            break;
        }
        debug!(cycle = cycles_played, now_ms = engine.now_ms(), "cycle finished");
    }

    for (entry, player) in stats.iter_mut().zip(&players) {
        entry.final_cities = engine.cities_owned_by(*player) as u32;
        entry.final_units = engine.units_of(*player).len() as u32;
    }
    let outcome = match aborted {
        Some(reason) => GameOutcome::Aborted { reason },
        None => outcome_of(&engine, &players),
    };
    info!(?outcome, cycles = cycles_played, "self-play finished");

    SelfPlayResult {
        seed: config.seed,
        cycles_played,
        game_time_ms: engine.now_ms(),
        outcome,
        players: stats,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

fn outcome_of(engine: &SandboxEngine, players: &[PlayerId]) -> GameOutcome {
    if engine.is_game_over() {
        let winner = engine
            .utility()
            .iter()
            .position(|u| (*u - 1.0).abs() < f64::EPSILON);
        if let Some(winner) = winner {
            return GameOutcome::Victory {
                winner: winner as u8,
            };
        }
    }

    let mut counts: Vec<(usize, u8)> = players
        .iter()
        .map(|p| (engine.cities_owned_by(*p), p.0))
        .collect();
    counts.sort_by(|a, b| b.0.cmp(&a.0));
    let leader = match counts.as_slice() {
        [(best, p), (second, _), ..] if best > second => Some(*p),
        [(_, p)] => Some(*p),
        _ => None,
    };
    GameOutcome::Unfinished { leader }
}

/// Play `games` games, offsetting the seed by one each time.
pub fn run_batch(config: &SelfPlayConfig, games: u32) -> BatchResult {
    let mut results = Vec::with_capacity(games as usize);
    for i in 0..games {
        let mut game_config = config.clone();
        game_config.seed = config.seed.wrapping_add(u64::from(i));
        results.push(run_selfplay(&game_config));
    }

    let mut wins = vec![0; config.map.players as usize];
    let mut unfinished = 0;
    let mut aborted = 0;
    for result in &results {
        match result.outcome {
            GameOutcome::Victory { winner } => {
                if let Some(slot) = wins.get_mut(winner as usize) {
                    *slot += 1;
                }
            }
            GameOutcome::Unfinished { .. } => unfinished += 1,
            GameOutcome::Aborted { .. } => aborted += 1,
        }
    }

    BatchResult {
        games,
        results,
        wins,
        unfinished,
        aborted,
    }
}
