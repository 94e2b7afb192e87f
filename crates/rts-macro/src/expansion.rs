use std::collections::BTreeMap;

use rand::Rng;
use rts_command::CommandQueue;
use rts_core::{EngineView, Order, PlayerId, Position, UnitInfo, UnitKind};
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{is_unit_free, BuildAction, Infeasible, MacroContext, MoveAction};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExpansionStep {
    /// Send a free unit to the target city.
    March(MoveAction),
    /// No unit to spare: produce one at a held city instead.
    Reinforce(BuildAction),
}

/// Take an empty city in sight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExpansionAction {
    pub target: Position,
    pub step: ExpansionStep,
}

impl ExpansionAction {
    /// Choose the (free unit, empty city) pair with the smallest Euclidean distance.
    ///
    /// Idle units standing on an owned city keep one of them there as its holder, preferring
    /// infantry. When no unit is free, a held idle city builds infantry instead.
    pub fn generate<E, R>(
        engine: &E,
        player: PlayerId,
        queues: &CommandQueue,
        ctx: &MacroContext,
        rng: &mut R,
    ) -> Result<Self, Infeasible>
    where
        E: EngineView + ?Sized,
        R: Rng + ?Sized,
    {
        let targets: Vec<Position> = engine
            .cities()
            .into_iter()
            .filter(|c| !c.is_owned_by(player))
            .filter(|c| engine.is_visible(player, c.position))
            .filter(|c| engine.occupants(c.position).is_empty())
            .filter(|c| !ctx.is_targeted(c.position))
            .map(|c| c.position)
            .collect();
        if targets.is_empty() {
            return Err(Infeasible::NoEmptyCities);
        }

        let mut off_city: Vec<UnitInfo> = Vec::new();
        let mut on_city: BTreeMap<Position, Vec<UnitInfo>> = BTreeMap::new();
        for unit in engine.units_of(player) {
            if !is_unit_free(engine, queues, unit.id) {
                continue;
            }
            let holds_city = engine
                .city_at(unit.position)
                .is_some_and(|c| c.is_owned_by(player));
            if holds_city {
                on_city.entry(unit.position).or_default().push(unit);
            } else {
                off_city.push(unit);
            }
        }

        let mut free = off_city;
        let mut held: Vec<Position> = Vec::new();
        for (city, mut units) in on_city {
            let keep = match units.iter().position(|u| u.kind == UnitKind::Infantry) {
                Some(i) => i,
                None => rng.gen_range(0..units.len()),
            };
            units.swap_remove(keep);
            held.push(city);
            free.extend(units);
        }

        let best = free
            .iter()
            .flat_map(|u| targets.iter().map(move |c| (u, *c)))
            .min_by(|(ua, ca), (ub, cb)| {
                ua.position
                    .euclidean(*ca)
                    .total_cmp(&ub.position.euclidean(*cb))
                    .then_with(|| ua.id.cmp(&ub.id))
                    .then_with(|| ca.cmp(cb))
            });
        if let Some((unit, city)) = best {
            trace!(unit = unit.id.0, %city, "expansion march");
            return Ok(Self {
                target: city,
                step: ExpansionStep::March(MoveAction::new(unit.id, city)),
            });
        }

        let nearest_target = |from: Position| {
            targets.iter().copied().min_by(|a, b| {
                a.euclidean(from)
                    .total_cmp(&b.euclidean(from))
                    .then_with(|| a.cmp(b))
            })
        };
        let site = held
            .into_iter()
            .filter(|pos| engine.is_city_idle(*pos) && !queues.is_city_busy(*pos))
            .find_map(|pos| nearest_target(pos).map(|t| (pos, t)));
        match site {
            Some((city, target)) => {
                trace!(%city, %target, "expansion reinforce");
                Ok(Self {
                    target,
                    step: ExpansionStep::Reinforce(BuildAction::new(city, UnitKind::Infantry)),
                })
            }
            None => Err(Infeasible::NoFreeUnits),
        }
    }

    pub fn invalidate(&mut self) {
        match &mut self.step {
            ExpansionStep::March(m) => m.invalidate(),
            ExpansionStep::Reinforce(b) => b.invalidate(),
        }
    }

    pub fn resolve<E: EngineView + ?Sized>(
        &mut self,
        engine: &E,
        player: PlayerId,
        queues: &CommandQueue,
    ) -> Result<&[Order], Infeasible> {
        match &mut self.step {
            ExpansionStep::March(m) => m.resolve(engine, player, queues),
            ExpansionStep::Reinforce(b) => Ok(b.resolve(engine, queues)),
        }
    }
}
