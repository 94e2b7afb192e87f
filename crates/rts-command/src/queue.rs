use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rts_core::{Actor, Engine, EngineView, Order, PlayerId, Position, UnitId};
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the queue should do on the next dispatch when no new orders were added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QueueDirective {
    /// Dispatch nothing for exactly one tick.
    HoldOneTick,
    /// Keep dispatching what is already queued.
    Proceed,
}

/// Outcome of one [`CommandQueue::dispatch`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    pub scheduled: Vec<Order>,
    /// Orders the engine refused; their actor's remaining queue was dropped with them.
    pub rejected: Vec<Order>,
    pub held: bool,
}

/// Unit-id → FIFO and city-position → FIFO of primitive orders.
///
/// Orders are appended at the back. [`push_front`](Self::push_front) is the only way to jump
/// the line and is used to override an actor's current plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandQueue {
    units: BTreeMap<UnitId, VecDeque<Order>>,
    cities: BTreeMap<Position, VecDeque<Order>>,
    hold_ticks: u32,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, actor: Actor) -> &mut VecDeque<Order> {
        match actor {
            Actor::Unit(id) => self.units.entry(id).or_default(),
            Actor::City(pos) => self.cities.entry(pos).or_default(),
        }
    }

    fn get(&self, actor: Actor) -> Option<&VecDeque<Order>> {
        match actor {
            Actor::Unit(id) => self.units.get(&id),
            Actor::City(pos) => self.cities.get(&pos),
        }
    }

    fn drop_empty(&mut self, actor: Actor) {
        match actor {
            Actor::Unit(id) => {
                if self.units.get(&id).is_some_and(VecDeque::is_empty) {
                    self.units.remove(&id);
                }
            }
            Actor::City(pos) => {
                if self.cities.get(&pos).is_some_and(VecDeque::is_empty) {
                    self.cities.remove(&pos);
                }
            }
        }
    }

    /// Append `order` to its actor's queue.
    pub fn push(&mut self, order: Order) {
        self.slot(order.actor()).push_back(order);
    }

    /// Put `order` ahead of everything its actor already has queued.
    pub fn push_front(&mut self, order: Order) {
        self.slot(order.actor()).push_front(order);
    }

    pub fn extend<I: IntoIterator<Item = Order>>(&mut self, orders: I) {
        for order in orders {
            self.push(order);
        }
    }

    pub fn pop(&mut self, actor: Actor) -> Option<Order> {
        let order = self.slot(actor).pop_front();
        self.drop_empty(actor);
        order
    }

    pub fn peek(&self, actor: Actor) -> Option<&Order> {
        self.get(actor).and_then(VecDeque::front)
    }

    /// Orders queued for `actor`, front first.
    pub fn orders(&self, actor: Actor) -> Vec<Order> {
        self.get(actor)
            .map(|q| q.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn queue_len(&self, actor: Actor) -> usize {
        self.get(actor).map(VecDeque::len).unwrap_or(0)
    }

    /// Drop every order queued for `actor`.
    pub fn clear_actor(&mut self, actor: Actor) -> usize {
        let removed = match actor {
            Actor::Unit(id) => self.units.remove(&id),
            Actor::City(pos) => self.cities.remove(&pos),
        };
        removed.map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_busy(&self, actor: Actor) -> bool {
        self.queue_len(actor) > 0
    }

    pub fn is_unit_busy(&self, unit: UnitId) -> bool {
        self.is_busy(Actor::Unit(unit))
    }

    pub fn is_city_busy(&self, city: Position) -> bool {
        self.is_busy(Actor::City(city))
    }

    /// `true` when no actor has anything queued.
    pub fn is_empty(&self) -> bool {
        self.units.values().all(VecDeque::is_empty) && self.cities.values().all(VecDeque::is_empty)
    }

    /// Total number of queued orders.
    pub fn len(&self) -> usize {
        self.units.values().map(VecDeque::len).sum::<usize>()
            + self.cities.values().map(VecDeque::len).sum::<usize>()
    }

    pub fn busy_units(&self) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn busy_cities(&self) -> Vec<Position> {
        self.cities
            .iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(pos, _)| *pos)
            .collect()
    }

    /// Drop the queues of units not in `alive`. Returns the units that were removed.
    ///
    /// Calling it again with the same set removes nothing.
    pub fn remove_dead_units(&mut self, alive: &BTreeSet<UnitId>) -> Vec<UnitId> {
        let dead: Vec<UnitId> = self
            .units
            .keys()
            .filter(|id| !alive.contains(id))
            .copied()
            .collect();
        for id in &dead {
            self.units.remove(id);
        }
        dead
    }

    /// Drop the queues of cities not in `standing`.
    pub fn remove_destroyed_cities(&mut self, standing: &BTreeSet<Position>) -> Vec<Position> {
        let gone: Vec<Position> = self
            .cities
            .keys()
            .filter(|pos| !standing.contains(pos))
            .copied()
            .collect();
        for pos in &gone {
            self.cities.remove(pos);
        }
        gone
    }

    /// Prune against the engine: units that no longer exist and cities `player` no longer owns.
    pub fn prune<E: EngineView + ?Sized>(&mut self, engine: &E, player: PlayerId) {
        let alive: BTreeSet<UnitId> = engine.units_of(player).iter().map(|u| u.id).collect();
        let owned: BTreeSet<Position> = engine
            .cities()
            .into_iter()
            .filter(|c| c.is_owned_by(player))
            .map(|c| c.position)
            .collect();
        let dead = self.remove_dead_units(&alive);
        let lost = self.remove_destroyed_cities(&owned);
        if !dead.is_empty() || !lost.is_empty() {
            debug!(units = dead.len(), cities = lost.len(), "pruned queues");
        }
    }

    pub fn apply_directive(&mut self, directive: QueueDirective) {
        match directive {
            QueueDirective::HoldOneTick => self.hold_ticks = 1,
            QueueDirective::Proceed => {}
        }
    }

    pub fn is_holding(&self) -> bool {
        self.hold_ticks > 0
    }

    /// Schedule the front order of every idle actor at the engine clock.
    ///
    /// An order the engine refuses takes the rest of its actor's queue with it: the remaining
    /// orders were planned on the assumption that this one would run.
    pub fn dispatch<E: Engine>(&mut self, engine: &mut E, player: PlayerId) -> DispatchReport {
        let mut report = DispatchReport::default();
        if self.hold_ticks > 0 {
            self.hold_ticks -= 1;
            report.held = true;
            return report;
        }

        let now = engine.now_ms();
        let mut actors: Vec<Actor> = self.units.keys().map(|id| Actor::Unit(*id)).collect();
        actors.extend(self.cities.keys().map(|pos| Actor::City(*pos)));

        for actor in actors {
            let idle = match actor {
                Actor::Unit(id) => engine.is_unit_idle(id),
                Actor::City(pos) => engine.is_city_idle(pos),
            };
            if !idle {
                continue;
            }
            let Some(order) = self.pop(actor) else {
                continue;
            };

            let accepted = engine.is_valid_order(player, &order)
                && engine.schedule(player, order, now).is_ok();
            if accepted {
                trace!(%order, at = now, "dispatched");
                report.scheduled.push(order);
            } else {
                let dropped = self.clear_actor(actor);
                debug!(%order, dropped, "order rejected, queue dropped");
                report.rejected.push(order);
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popping_the_last_order_forgets_the_actor() {
        let mut q = CommandQueue::new();
        let unit = UnitId(4);
        q.push(Order::MoveStop { unit });
        assert_eq!(q.busy_units(), vec![unit]);
        q.pop(Actor::Unit(unit));
        assert!(q.busy_units().is_empty());
        assert!(q.units.is_empty());
    }
}
