use rand::seq::SliceRandom;
use rand::Rng;
use rts_command::CommandQueue;
use rts_core::{EngineView, Order, PlayerId, Position, UnitId, UnitInfo};
use rts_nav::{AStar, EnginePassability};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{free_units, Infeasible};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AttackOutcome {
    Pending,
    Victory,
    Defeat,
}

/// Walk next to an enemy unit and start fighting it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttackAction {
    pub attacker: UnitId,
    pub target: UnitId,
    staging: Option<Position>,
    orders: Option<Vec<Order>>,
}

impl AttackAction {
    pub fn new(attacker: UnitId, target: UnitId) -> Self {
        Self {
            attacker,
            target,
            staging: None,
            orders: None,
        }
    }

    /// Pick a random free unit and the nearest enemy it can see.
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
        let enemy_in_sight = engine
            .units()
            .iter()
            .any(|u| u.owner != player && engine.is_visible(player, u.position));
        if !enemy_in_sight {
            return Err(Infeasible::NoVisibleEnemies);
        }

        let attacker = *free_units(engine, player, queues)
            .choose(rng)
            .ok_or(Infeasible::NoIdleUnits)?;
        Self::nearest_target(engine, player, &attacker)
    }

    /// Pair `attacker` with the nearest enemy it can see.
    pub fn nearest_target<E>(
        engine: &E,
        player: PlayerId,
        attacker: &UnitInfo,
    ) -> Result<Self, Infeasible>
    where
        E: EngineView + ?Sized,
    {
        let target = engine
            .units()
            .into_iter()
            .filter(|u| u.owner != player && engine.is_visible(player, u.position))
            .min_by(|a, b| {
                let da = a.position.euclidean(attacker.position);
                let db = b.position.euclidean(attacker.position);
                da.total_cmp(&db).then_with(|| a.id.cmp(&b.id))
            })
            .map(|u| u.id)
            .ok_or(Infeasible::NoVisibleEnemies)?;

        Ok(Self::new(attacker.id, target))
    }

    /// Tile next to the target the attacker will step onto, once resolved.
    pub fn staging(&self) -> Option<Position> {
        self.staging
    }

    pub fn invalidate(&mut self) {
        self.staging = None;
        self.orders = None;
    }

    pub fn resolve<E: EngineView + ?Sized>(
        &mut self,
        engine: &E,
        player: PlayerId,
        _queues: &CommandQueue,
    ) -> Result<&[Order], Infeasible> {
        if self.orders.is_none() {
            let orders = self.plan(engine, player)?;
            self.orders = Some(orders);
        }
        Ok(self.orders.as_deref().unwrap_or(&[]))
    }

    fn plan<E: EngineView + ?Sized>(
        &mut self,
        engine: &E,
        player: PlayerId,
    ) -> Result<Vec<Order>, Infeasible> {
        let attacker = engine
            .unit(self.attacker)
            .ok_or(Infeasible::UnitMissing(self.attacker))?;
        let target = engine
            .unit(self.target)
            .ok_or(Infeasible::UnitMissing(self.target))?;
        let strike = Order::AttackStart {
            unit: self.attacker,
            target: self.target,
        };

        if attacker.position.is_adjacent(target.position) {
            self.staging = Some(attacker.position);
            return Ok(vec![strike]);
        }

        let staging = target
            .position
            .neighbors()
            .into_iter()
            .filter(|p| engine.in_bounds(*p) && engine.is_movement_possible(*p, player))
            .min_by(|a, b| {
                a.euclidean(attacker.position)
                    .total_cmp(&b.euclidean(attacker.position))
                    .then_with(|| a.cmp(b))
            })
            .ok_or(Infeasible::NoStagingTile(self.target))?;

        let grid = EnginePassability::new(engine, player);
        let path = AStar::new()
            .find_path(&grid, attacker.position, staging)
            .into_path()
            .ok_or(Infeasible::PathNotFound {
                from: attacker.position,
                to: staging,
            })?;

        self.staging = Some(staging);
        let mut orders: Vec<Order> = path
            .steps()
            .iter()
            .map(|to| Order::MoveStart {
                unit: self.attacker,
                to: *to,
            })
            .collect();
        orders.push(strike);
        Ok(orders)
    }

    /// Victory once the target is gone, defeat once the attacker is.
    pub fn outcome<E: EngineView + ?Sized>(&self, engine: &E) -> AttackOutcome {
        match (engine.unit(self.attacker), engine.unit(self.target)) {
            (None, _) => AttackOutcome::Defeat,
            (Some(_), None) => AttackOutcome::Victory,
            (Some(_), Some(_)) => AttackOutcome::Pending,
        }
    }
}
