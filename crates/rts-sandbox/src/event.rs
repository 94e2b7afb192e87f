use std::collections::BTreeMap;

use rts_core::{Actor, Order, PlayerId, Position, UnitId, UnitKind};

/// Something the engine must process at a given clock value.
///
/// Activity events carry the token of the activity that scheduled them; an event whose token no
/// longer matches its actor's current activity is stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    OrderStart { player: PlayerId, order: Order },
    MoveComplete { unit: UnitId, to: Position, token: u64 },
    ProductionComplete { city: Position, kind: UnitKind, token: u64 },
    AttackHit { unit: UnitId, target: UnitId, token: u64 },
    WaitComplete { actor: Actor, token: u64 },
}

/// Events ordered by (time, insertion sequence).
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: BTreeMap<(u64, u64), EventKind>,
    seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at_ms: u64, kind: EventKind) {
        self.events.insert((at_ms, self.seq), kind);
        self.seq += 1;
    }

    pub fn peek_time(&self) -> Option<u64> {
        self.events.keys().next().map(|(at, _)| *at)
    }

    pub fn pop_if_ready(&mut self, now_ms: u64) -> Option<EventKind> {
        let (&(at, seq), _) = self.events.iter().next()?;
        if at > now_ms {
            return None;
        }
        self.events.remove(&(at, seq))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// `true` when an order for `actor` is waiting to start.
    pub fn has_pending_order(&self, actor: Actor) -> bool {
        self.events.values().any(|e| match e {
            EventKind::OrderStart { order, .. } => order.actor() == actor,
            _ => false,
        })
    }
}
