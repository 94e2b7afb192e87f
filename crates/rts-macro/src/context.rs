use std::collections::BTreeSet;

use rts_command::CommandQueue;
use rts_core::{CityInfo, EngineView, PlayerId, Position, UnitId, UnitInfo};

/// Bookkeeping shared by every macro action generated during one planning cycle.
///
/// Reset at the start of each cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroContext {
    targeted_cities: BTreeSet<Position>,
}

impl MacroContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.targeted_cities.clear();
    }

    /// Returns `false` if the city was already targeted.
    pub fn target_city(&mut self, city: Position) -> bool {
        self.targeted_cities.insert(city)
    }

    pub fn is_targeted(&self, city: Position) -> bool {
        self.targeted_cities.contains(&city)
    }

    pub fn targeted_cities(&self) -> impl Iterator<Item = Position> + '_ {
        self.targeted_cities.iter().copied()
    }
}

/// Idle in the engine and nothing queued.
pub fn is_unit_free<E: EngineView + ?Sized>(engine: &E, queues: &CommandQueue, unit: UnitId) -> bool {
    engine.is_unit_idle(unit) && !queues.is_unit_busy(unit)
}

/// Units of `player` that may receive a new macro action.
pub fn free_units<E: EngineView + ?Sized>(
    engine: &E,
    player: PlayerId,
    queues: &CommandQueue,
) -> Vec<UnitInfo> {
    engine
        .units_of(player)
        .into_iter()
        .filter(|u| is_unit_free(engine, queues, u.id))
        .collect()
}

/// Cities of `player` that are neither producing nor have orders queued.
pub fn idle_cities<E: EngineView + ?Sized>(
    engine: &E,
    player: PlayerId,
    queues: &CommandQueue,
) -> Vec<CityInfo> {
    engine
        .cities()
        .into_iter()
        .filter(|c| c.is_owned_by(player))
        .filter(|c| engine.is_city_idle(c.position) && !queues.is_city_busy(c.position))
        .collect()
}
