use thiserror::Error;

use crate::{CityInfo, Order, PlayerId, Position, Tile, UnitId, UnitInfo};

/// Failures reported by the external engine.
///
/// The planner never treats these as fatal: a rejected or ambiguous branch is simply skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("order rejected: {0}")]
    Rejected(String),
    #[error("ambiguous state under partial information: {0}")]
    Ambiguous(String),
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),
    #[error("position {0} is outside the map")]
    OutOfBounds(Position),
}

/// Read-only engine queries.
///
/// The planner never prescribes *how* an engine answers these; it only relies on the answers
/// being consistent for one state snapshot.
pub trait EngineView {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Game clock in milliseconds.
    fn now_ms(&self) -> u64;

    /// All players, in index order.
    fn players(&self) -> Vec<PlayerId>;

    /// All living units.
    fn units(&self) -> Vec<UnitInfo>;

    fn unit(&self, id: UnitId) -> Option<UnitInfo>;

    fn cities(&self) -> Vec<CityInfo>;

    fn tile(&self, pos: Position) -> Option<Tile>;

    /// Units currently standing on `pos`.
    fn occupants(&self, pos: Position) -> Vec<UnitId>;

    fn is_movement_possible(&self, pos: Position, player: PlayerId) -> bool;

    /// Whether `player` has ever seen `pos`.
    fn is_discovered(&self, player: PlayerId, pos: Position) -> bool;

    /// Whether `pos` is inside `player`'s current vision.
    fn is_visible(&self, player: PlayerId, pos: Position) -> bool;

    /// `true` when the unit has no order in progress.
    fn is_unit_idle(&self, unit: UnitId) -> bool;

    /// `true` when the city at `pos` is neither producing nor waiting.
    fn is_city_idle(&self, pos: Position) -> bool;

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width() && (pos.y as u32) < self.height()
    }

    fn units_of(&self, player: PlayerId) -> Vec<UnitInfo> {
        self.units()
            .into_iter()
            .filter(|u| u.owner == player)
            .collect()
    }

    fn city_at(&self, pos: Position) -> Option<CityInfo> {
        self.cities().into_iter().find(|c| c.position == pos)
    }

    fn remaining_capacity(&self, pos: Position) -> u32 {
        let Some(tile) = self.tile(pos) else {
            return 0;
        };
        (tile.capacity as u32).saturating_sub(self.occupants(pos).len() as u32)
    }

    /// `true` when any unit on `pos` belongs to someone other than `player`.
    fn is_enemy_occupied(&self, pos: Position, player: PlayerId) -> bool {
        self.occupants(pos)
            .into_iter()
            .filter_map(|id| self.unit(id))
            .any(|u| u.owner != player)
    }

    /// Every position in row-major order.
    fn positions(&self) -> Vec<Position> {
        let (w, h) = (self.width() as i32, self.height() as i32);
        let mut out = Vec::with_capacity((w * h).max(0) as usize);
        for y in 0..h {
            for x in 0..w {
                out.push(Position::new(x, y));
            }
        }
        out
    }

    fn visible_positions(&self, player: PlayerId) -> Vec<Position> {
        self.positions()
            .into_iter()
            .filter(|p| self.is_visible(player, *p))
            .collect()
    }
}

/// Command surface of a simulatable engine state.
///
/// `Clone` is the snapshot operation: every simulation step in the planner works on its own
/// clone and never shares one.
pub trait Engine: EngineView + Clone {
    /// Move simulated time forward by `dt_ms`.
    fn advance(&mut self, dt_ms: u64) -> Result<(), EngineError>;

    fn is_valid_order(&self, player: PlayerId, order: &Order) -> bool;

    /// Queue `order` to start at `at_ms` on the engine clock.
    fn schedule(&mut self, player: PlayerId, order: Order, at_ms: u64) -> Result<(), EngineError>;

    fn is_game_over(&self) -> bool;

    /// Per-player utility, indexed by [`PlayerId::index`]. `1.0` marks a winner.
    fn utility(&self) -> Vec<f64>;

    /// Replace the tile at `pos`. Used to install a determinized world into a clone.
    fn overwrite_tile(&mut self, pos: Position, tile: Tile);

    /// Move a unit without going through the rules. Used by determinization.
    fn relocate_unit(&mut self, unit: UnitId, pos: Position) -> Result<(), EngineError>;
}
