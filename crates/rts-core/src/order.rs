use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Position, UnitId, UnitKind};

/// Whoever executes an order: a unit, or the city at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Actor {
    Unit(UnitId),
    City(Position),
}

/// A primitive engine command ("atomic action").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Order {
    /// Step onto an adjacent tile.
    MoveStart { unit: UnitId, to: Position },
    MoveStop { unit: UnitId },
    ProduceStart { city: Position, kind: UnitKind },
    ProduceStop { city: Position },
    AttackStart { unit: UnitId, target: UnitId },
    Wait { actor: Actor, duration_ms: u64 },
}

impl Order {
    pub fn actor(&self) -> Actor {
        match *self {
            Order::MoveStart { unit, .. }
            | Order::MoveStop { unit }
            | Order::AttackStart { unit, .. } => Actor::Unit(unit),
            Order::ProduceStart { city, .. } | Order::ProduceStop { city } => Actor::City(city),
            Order::Wait { actor, .. } => actor,
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Order::MoveStart { .. })
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::MoveStart { unit, to } => write!(f, "move {unit} -> {to}"),
            Order::MoveStop { unit } => write!(f, "stop {unit}"),
            Order::ProduceStart { city, kind } => write!(f, "produce {kind:?} at {city}"),
            Order::ProduceStop { city } => write!(f, "stop production at {city}"),
            Order::AttackStart { unit, target } => write!(f, "attack {unit} -> {target}"),
            Order::Wait { actor, duration_ms } => write!(f, "wait {actor:?} {duration_ms}ms"),
        }
    }
}
