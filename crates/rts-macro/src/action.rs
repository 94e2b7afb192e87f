use core::fmt;
use std::cmp::Ordering;
use std::collections::{BTreeSet, VecDeque};

use rts_command::{CommandQueue, QueueDirective};
use rts_core::{Actor, EngineView, Order, PlayerId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    AttackAction, BuildAction, ExpansionAction, ExplorationAction, Infeasible, MacroContext,
    MoveAction, WaitAction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MacroKind {
    Move,
    Build,
    Attack,
    Expansion,
    Exploration,
    Wait,
    DoNothing,
    ScheduleNothing,
}

impl MacroKind {
    pub const ALL: [MacroKind; 8] = [
        MacroKind::Move,
        MacroKind::Build,
        MacroKind::Attack,
        MacroKind::Expansion,
        MacroKind::Exploration,
        MacroKind::Wait,
        MacroKind::DoNothing,
        MacroKind::ScheduleNothing,
    ];

    /// Tie-break rank between otherwise equal choices. Higher is preferred.
    pub fn priority(self) -> u8 {
        match self {
            MacroKind::Attack => 7,
            MacroKind::Expansion => 6,
            MacroKind::Exploration => 5,
            MacroKind::Build => 4,
            MacroKind::Move => 3,
            MacroKind::Wait => 2,
            MacroKind::ScheduleNothing => 1,
            MacroKind::DoNothing => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MacroKind::Move => "move",
            MacroKind::Build => "build",
            MacroKind::Attack => "attack",
            MacroKind::Expansion => "expansion",
            MacroKind::Exploration => "exploration",
            MacroKind::Wait => "wait",
            MacroKind::DoNothing => "do_nothing",
            MacroKind::ScheduleNothing => "schedule_nothing",
        }
    }
}

impl fmt::Display for MacroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player intent. Closed set; every operation is a `match`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "intent", rename_all = "snake_case"))]
pub enum MacroAction {
    Move(MoveAction),
    Build(BuildAction),
    Attack(AttackAction),
    Expansion(ExpansionAction),
    Exploration(ExplorationAction),
    Wait(WaitAction),
    /// Dispatch nothing for one tick.
    DoNothing,
    /// Add nothing and let queued orders proceed.
    ScheduleNothing,
}

impl MacroAction {
    pub fn kind(&self) -> MacroKind {
        match self {
            MacroAction::Move(_) => MacroKind::Move,
            MacroAction::Build(_) => MacroKind::Build,
            MacroAction::Attack(_) => MacroKind::Attack,
            MacroAction::Expansion(_) => MacroKind::Expansion,
            MacroAction::Exploration(_) => MacroKind::Exploration,
            MacroAction::Wait(_) => MacroKind::Wait,
            MacroAction::DoNothing => MacroKind::DoNothing,
            MacroAction::ScheduleNothing => MacroKind::ScheduleNothing,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, MacroAction::DoNothing | MacroAction::ScheduleNothing)
    }

    /// Game-specific ordering used to break ties between equally rated choices.
    pub fn compare(&self, other: &MacroAction) -> Ordering {
        self.kind().priority().cmp(&other.kind().priority())
    }

    /// Primitive orders this action is responsible for, computed on first call and cached.
    pub fn resolve<E: EngineView + ?Sized>(
        &mut self,
        engine: &E,
        player: PlayerId,
        queues: &CommandQueue,
    ) -> Result<&[Order], Infeasible> {
        match self {
            MacroAction::Move(a) => a.resolve(engine, player, queues),
            MacroAction::Build(a) => Ok(a.resolve(engine, queues)),
            MacroAction::Attack(a) => a.resolve(engine, player, queues),
            MacroAction::Expansion(a) => a.resolve(engine, player, queues),
            MacroAction::Exploration(a) => a.resolve(engine, player, queues),
            MacroAction::Wait(a) => Ok(a.orders()),
            MacroAction::DoNothing | MacroAction::ScheduleNothing => Ok(&[]),
        }
    }

    /// Drop cached orders so the action resolves again against a different state.
    pub fn invalidate(&mut self) {
        match self {
            MacroAction::Move(a) => a.invalidate(),
            MacroAction::Build(a) => a.invalidate(),
            MacroAction::Attack(a) => a.invalidate(),
            MacroAction::Expansion(a) => a.invalidate(),
            MacroAction::Exploration(a) => a.invalidate(),
            MacroAction::Wait(_) | MacroAction::DoNothing | MacroAction::ScheduleNothing => {}
        }
    }

    pub fn directive(&self) -> QueueDirective {
        match self {
            MacroAction::DoNothing => QueueDirective::HoldOneTick,
            _ => QueueDirective::Proceed,
        }
    }
}

impl fmt::Display for MacroAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroAction::Move(a) => write!(f, "move {} -> {}", a.unit, a.destination),
            MacroAction::Build(a) => write!(f, "build {:?} at {}", a.kind, a.city),
            MacroAction::Attack(a) => write!(f, "attack {} -> {}", a.attacker, a.target),
            MacroAction::Expansion(a) => write!(f, "expand to {}", a.target),
            MacroAction::Exploration(a) => write!(f, "explore {} -> {}", a.unit, a.destination),
            MacroAction::Wait(a) => write!(f, "wait {:?} {}ms", a.actor(), a.duration_ms()),
            MacroAction::DoNothing => f.write_str("do nothing"),
            MacroAction::ScheduleNothing => f.write_str("schedule nothing"),
        }
    }
}

/// A committed macro action and the orders it put into the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub action: MacroAction,
    pub scheduled: VecDeque<Order>,
}

impl Command {
    /// Resolve `action`, append its orders to `queues` and record it in the cycle context.
    ///
    /// Nothing is queued when resolution fails.
    pub fn commit<E: EngineView + ?Sized>(
        mut action: MacroAction,
        engine: &E,
        player: PlayerId,
        queues: &mut CommandQueue,
        ctx: &mut MacroContext,
    ) -> Result<Self, Infeasible> {
        let orders: Vec<Order> = action.resolve(engine, player, queues)?.to_vec();
        queues.extend(orders.iter().copied());
        queues.apply_directive(action.directive());
        if let MacroAction::Expansion(expansion) = &action {
            ctx.target_city(expansion.target);
        }
        Ok(Self {
            action,
            scheduled: orders.into(),
        })
    }

    /// Actors this command keeps busy.
    pub fn actors(&self) -> BTreeSet<Actor> {
        self.scheduled.iter().map(Order::actor).collect()
    }

    /// `true` once none of its actors has anything left in `queues`.
    pub fn is_drained(&self, queues: &CommandQueue) -> bool {
        self.actors().into_iter().all(|a| !queues.is_busy(a))
    }
}
