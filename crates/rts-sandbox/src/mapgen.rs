//! Seeded map generation.

use rand::seq::SliceRandom;
use rand::Rng;
use rts_core::{seeded_rng, EngineView, PlayerId, Position, Tile, UnitKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{SandboxEngine, SandboxRules};

/// Configuration for map generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
    /// At most four; starts sit near the corners.
    pub players: u8,
    /// Fraction of tiles turned into mountains (0.0-1.0)
    pub mountain_ratio: f64,
    /// Fraction of tiles turned into forest (0.0-1.0)
    pub forest_ratio: f64,
    pub neutral_cities: u32,
    /// Units every player starts with, placed on its starting city.
    pub starting_units: Vec<UnitKind>,
    pub rules: SandboxRules,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            players: 2,
            mountain_ratio: 0.08,
            forest_ratio: 0.1,
            neutral_cities: 6,
            starting_units: vec![UnitKind::Infantry, UnitKind::Infantry, UnitKind::Cavalry],
            rules: SandboxRules::default(),
        }
    }
}

/// Suggested starting positions, one inset corner per player.
pub fn start_positions(width: u32, height: u32, players: u8) -> Vec<Position> {
    let (w, h) = (width as i32, height as i32);
    let corners = [
        Position::new(1, 1),
        Position::new(w - 2, h - 2),
        Position::new(w - 2, 1),
        Position::new(1, h - 2),
    ];
    corners
        .into_iter()
        .take(players.min(4) as usize)
        .collect()
}

/// Generate a map with the given configuration and seed.
pub fn generate(config: &MapConfig, seed: u64) -> SandboxEngine {
    let mut rng = seeded_rng(seed);
    let mut engine = SandboxEngine::new(config.width, config.height, config.players)
        .with_rules(config.rules.clone());
    let starts = start_positions(config.width, config.height, config.players);

    // Keep the immediate surroundings of every start open.
    let near_start = |pos: Position| starts.iter().any(|s| s.chebyshev(pos) <= 2);

    let mut open: Vec<Position> = engine
        .positions()
        .into_iter()
        .filter(|p| !near_start(*p))
        .collect();
    open.shuffle(&mut rng);

    let total = (config.width * config.height) as f64;
    let mountains = (total * config.mountain_ratio.clamp(0.0, 1.0)) as usize;
    let forests = (total * config.forest_ratio.clamp(0.0, 1.0)) as usize;

    let mut cursor = open.into_iter();
    for pos in cursor.by_ref().take(mountains) {
        engine.set_tile(pos, Tile::mountain());
    }
    for pos in cursor.by_ref().take(forests) {
        engine.set_tile(pos, Tile::forest());
    }

    let remaining: Vec<Position> = cursor.collect();
    let mut placed = 0;
    for pos in remaining {
        if placed >= config.neutral_cities {
            break;
        }
        // Space neutral cities out a little.
        let crowded = engine
            .cities()
            .iter()
            .any(|c| c.position.chebyshev(pos) < 2);
        if crowded || rng.gen_bool(0.25) {
            continue;
        }
        if engine.add_city(pos, None, false).is_ok() {
            placed += 1;
        }
    }

    for (i, start) in starts.iter().enumerate() {
        let player = PlayerId(i as u8);
        if engine.add_city(*start, Some(player), true).is_err() {
            continue;
        }
        for kind in &config.starting_units {
            let spot = std::iter::once(*start)
                .chain(start.neighbors())
                .find(|p| engine.is_movement_possible(*p, player));
            if let Some(spot) = spot {
                let _ = engine.spawn_unit(player, *kind, spot);
            }
        }
    }

    engine
}
