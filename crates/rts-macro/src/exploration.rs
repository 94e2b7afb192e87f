use rand::seq::SliceRandom;
use rand::Rng;
use rts_command::CommandQueue;
use rts_core::{EngineView, Order, PlayerId, Position, UnitId, UnitInfo};
use rts_nav::{bfs_flood, bfs_path, EnginePassability};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{free_units, Infeasible, MoveAction};

/// Unexplored tiles considered per flood fill.
pub const DEFAULT_FLOOD_LIMIT: usize = 64;

/// Send a random free unit toward a reachable unexplored tile.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExplorationAction {
    pub unit: UnitId,
    /// The unexplored tile picked by the flood fill.
    pub destination: Position,
    movement: MoveAction,
}

impl ExplorationAction {
    /// The route is truncated to its visible prefix: orders for unseen tiles cannot be
    /// validated yet. `destination` keeps the full target so a later cycle can continue.
    pub fn generate<E, R>(
        engine: &E,
        player: PlayerId,
        queues: &CommandQueue,
        rng: &mut R,
    ) -> Result<Self, Infeasible>
    where
        E: EngineView + ?Sized,
        R: Rng + ?Sized,
    {
        let unit = *free_units(engine, player, queues)
            .choose(rng)
            .ok_or(Infeasible::NoIdleUnits)?;
        Self::generate_for(engine, player, &unit, rng)
    }

    /// Same as [`generate`](Self::generate) for a unit chosen by the caller.
    pub fn generate_for<E, R>(
        engine: &E,
        player: PlayerId,
        unit: &UnitInfo,
        rng: &mut R,
    ) -> Result<Self, Infeasible>
    where
        E: EngineView + ?Sized,
        R: Rng + ?Sized,
    {
        let grid = EnginePassability::new(engine, player);
        let frontier = bfs_flood(&grid, unit.position, DEFAULT_FLOOD_LIMIT);
        let destination = *frontier.choose(rng).ok_or(Infeasible::NoUnexploredTiles)?;

        let path = bfs_path(&grid, unit.position, destination)
            .into_path()
            .ok_or(Infeasible::PathNotFound {
                from: unit.position,
                to: destination,
            })?;
        let visible = path.visible_prefix(&grid);
        if visible.is_empty() {
            return Err(Infeasible::PathNotFound {
                from: unit.position,
                to: destination,
            });
        }

        Ok(Self {
            unit: unit.id,
            destination,
            movement: MoveAction::along(unit.id, &visible),
        })
    }

    /// Last tile the current orders reach.
    pub fn waypoint(&self) -> Position {
        self.movement.destination
    }

    pub fn resolve<E: EngineView + ?Sized>(
        &mut self,
        engine: &E,
        player: PlayerId,
        queues: &CommandQueue,
    ) -> Result<&[Order], Infeasible> {
        self.movement.resolve(engine, player, queues)
    }

    /// Re-plan from scratch toward the waypoint with A*.
    pub fn invalidate(&mut self) {
        self.movement.invalidate();
    }
}
