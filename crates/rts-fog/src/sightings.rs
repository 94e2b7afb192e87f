use std::collections::{BTreeMap, HashSet};

use rts_core::{EngineView, PlayerId, Position, UnitId, UnitKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where and when an enemy unit was last seen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LastSeen {
    pub unit: UnitId,
    pub owner: PlayerId,
    pub kind: UnitKind,
    pub position: Position,
    pub seen_at_ms: u64,
    /// Tiles per second.
    pub speed: f64,
}

impl LastSeen {
    /// Furthest the unit could have travelled by `now_ms`, in tiles.
    pub fn reach(&self, now_ms: u64) -> f64 {
        let elapsed = now_ms.saturating_sub(self.seen_at_ms) as f64;
        elapsed * self.speed / 1000.0
    }
}

/// Keeps the last sighting of every enemy unit for one player.
#[derive(Debug, Clone, Default)]
pub struct SightingTracker {
    records: BTreeMap<UnitId, LastSeen>,
}

impl SightingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh records from the current engine state.
    ///
    /// Visible enemies overwrite their record; units the engine no longer knows are dropped.
    pub fn observe<E: EngineView + ?Sized>(&mut self, engine: &E, player: PlayerId) {
        let now = engine.now_ms();
        for unit in engine.units() {
            if unit.owner == player || !engine.is_visible(player, unit.position) {
                continue;
            }
            self.records.insert(
                unit.id,
                LastSeen {
                    unit: unit.id,
                    owner: unit.owner,
                    kind: unit.kind,
                    position: unit.position,
                    seen_at_ms: now,
                    speed: unit.speed,
                },
            );
        }
        self.records.retain(|id, _| engine.unit(*id).is_some());
    }

    pub fn get(&self, unit: UnitId) -> Option<&LastSeen> {
        self.records.get(&unit)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> Vec<LastSeen> {
        self.records.values().copied().collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Positions `player` currently sees.
pub fn known_positions<E: EngineView + ?Sized>(engine: &E, player: PlayerId) -> HashSet<Position> {
    engine.visible_positions(player).into_iter().collect()
}
