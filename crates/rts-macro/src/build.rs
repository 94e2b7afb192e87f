use rts_command::CommandQueue;
use rts_core::{EngineView, Order, Position, UnitKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Start producing one unit at a city.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuildAction {
    pub city: Position,
    pub kind: UnitKind,
    orders: Option<Vec<Order>>,
}

impl BuildAction {
    pub fn new(city: Position, kind: UnitKind) -> Self {
        Self {
            city,
            kind,
            orders: None,
        }
    }

    pub fn invalidate(&mut self) {
        self.orders = None;
    }

    /// One production-start order if the city is idle, nothing otherwise.
    pub fn resolve<E: EngineView + ?Sized>(&mut self, engine: &E, queues: &CommandQueue) -> &[Order] {
        let city = self.city;
        let kind = self.kind;
        self.orders.get_or_insert_with(|| {
            if engine.is_city_idle(city) && !queues.is_city_busy(city) {
                vec![Order::ProduceStart { city, kind }]
            } else {
                Vec::new()
            }
        })
    }
}
