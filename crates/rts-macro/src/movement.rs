use rts_command::CommandQueue;
use rts_core::{EngineView, Order, PlayerId, Position, UnitId};
use rts_nav::{AStar, EnginePassability, Path};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Infeasible;

/// Walk one unit to a destination, one movement-start order per tile.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveAction {
    pub unit: UnitId,
    pub destination: Position,
    orders: Option<Vec<Order>>,
    cursor: usize,
}

impl MoveAction {
    pub fn new(unit: UnitId, destination: Position) -> Self {
        Self {
            unit,
            destination,
            orders: None,
            cursor: 0,
        }
    }

    /// A move whose route is already known.
    pub fn along(unit: UnitId, path: &Path) -> Self {
        let destination = path.goal().unwrap_or_default();
        Self {
            unit,
            destination,
            orders: Some(Self::orders_for(unit, path)),
            cursor: 0,
        }
    }

    fn orders_for(unit: UnitId, path: &Path) -> Vec<Order> {
        path.steps()
            .iter()
            .map(|to| Order::MoveStart { unit, to: *to })
            .collect()
    }

    pub fn is_resolved(&self) -> bool {
        self.orders.is_some()
    }

    /// Forget the cached route so the next `resolve` plans again.
    pub fn invalidate(&mut self) {
        self.orders = None;
        self.cursor = 0;
    }

    /// Remaining movement orders, closest tile first. Runs A* on first call.
    ///
    /// A route with no steps left, including one that starts on its destination, is
    /// [`Infeasible::PathExhausted`].
    pub fn resolve<E: EngineView + ?Sized>(
        &mut self,
        engine: &E,
        player: PlayerId,
        _queues: &CommandQueue,
    ) -> Result<&[Order], Infeasible> {
        if self.orders.is_none() {
            let unit = engine
                .unit(self.unit)
                .ok_or(Infeasible::UnitMissing(self.unit))?;
            let grid = EnginePassability::new(engine, player);
            let path = AStar::new()
                .find_path(&grid, unit.position, self.destination)
                .into_path()
                .ok_or(Infeasible::PathNotFound {
                    from: unit.position,
                    to: self.destination,
                })?;
            self.orders = Some(Self::orders_for(self.unit, &path));
            self.cursor = 0;
        }
        let remaining = self
            .orders
            .as_deref()
            .and_then(|orders| orders.get(self.cursor..))
            .unwrap_or(&[]);
        if remaining.is_empty() {
            return Err(Infeasible::PathExhausted);
        }
        Ok(remaining)
    }

    /// Take the next movement order.
    ///
    /// Fails with [`Infeasible::PathExhausted`] once the cached route has been drained.
    pub fn next_order<E: EngineView + ?Sized>(
        &mut self,
        engine: &E,
        player: PlayerId,
        queues: &CommandQueue,
    ) -> Result<Order, Infeasible> {
        let order = self
            .resolve(engine, player, queues)?
            .first()
            .copied()
            .ok_or(Infeasible::PathExhausted)?;
        self.cursor += 1;
        Ok(order)
    }

    pub fn remaining(&self) -> usize {
        self.orders
            .as_ref()
            .map(|o| o.len().saturating_sub(self.cursor))
            .unwrap_or(0)
    }
}
