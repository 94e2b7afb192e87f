use rts_core::{Actor, Order};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Keep one actor busy for a while.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaitAction {
    order: [Order; 1],
}

impl WaitAction {
    pub fn new(actor: Actor, duration_ms: u64) -> Self {
        Self {
            order: [Order::Wait { actor, duration_ms }],
        }
    }

    pub fn actor(&self) -> Actor {
        self.order[0].actor()
    }

    pub fn duration_ms(&self) -> u64 {
        match self.order[0] {
            Order::Wait { duration_ms, .. } => duration_ms,
            _ => 0,
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.order
    }
}
