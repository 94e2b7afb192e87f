use rand::seq::SliceRandom;
use rand::Rng;
use rts_command::CommandQueue;
use rts_core::{Actor, EngineView, PlayerId, Position, UnitInfo, UnitKind, DEFAULT_TICK_MS};
use tracing::trace;

use crate::{
    free_units, idle_cities, AttackAction, BuildAction, ExpansionAction, ExplorationAction,
    Infeasible, MacroAction, MacroContext, MacroKind, MoveAction, WaitAction,
};

/// Intent kinds offered as separate choices, most aggressive first.
const CANDIDATE_KINDS: [MacroKind; 6] = [
    MacroKind::Attack,
    MacroKind::Expansion,
    MacroKind::Exploration,
    MacroKind::Build,
    MacroKind::Move,
    MacroKind::Wait,
];

/// Upper bound on candidates offered per intent kind.
pub const MAX_CANDIDATES_PER_KIND: usize = 4;

/// Decide *who* and *where* for one intent kind.
///
/// Unit and city intents yield one candidate per free unit or idle city, in random order and
/// at most [`MAX_CANDIDATES_PER_KIND`]. Expansion yields its single best pairing. Fails with
/// the first reason when no candidate can be built.
pub fn generate_executable<E, R>(
    kind: MacroKind,
    engine: &E,
    player: PlayerId,
    queues: &CommandQueue,
    ctx: &MacroContext,
    rng: &mut R,
) -> Result<Vec<MacroAction>, Infeasible>
where
    E: EngineView + ?Sized,
    R: Rng + ?Sized,
{
    match kind {
        MacroKind::Attack => {
            let enemy_in_sight = engine
                .units()
                .iter()
                .any(|u| u.owner != player && engine.is_visible(player, u.position));
            if !enemy_in_sight {
                return Err(Infeasible::NoVisibleEnemies);
            }
            per_unit(engine, player, queues, rng, |unit, _| {
                AttackAction::nearest_target(engine, player, unit).map(MacroAction::Attack)
            })
        }
        MacroKind::Expansion => Ok(vec![MacroAction::Expansion(ExpansionAction::generate(
            engine, player, queues, ctx, rng,
        )?)]),
        MacroKind::Exploration => per_unit(engine, player, queues, rng, |unit, rng| {
            ExplorationAction::generate_for(engine, player, unit, rng)
                .map(MacroAction::Exploration)
        }),
        MacroKind::Build => {
            let mut cities = idle_cities(engine, player, queues);
            if cities.is_empty() {
                return Err(Infeasible::NoIdleCities);
            }
            cities.shuffle(rng);
            cities.truncate(MAX_CANDIDATES_PER_KIND);
            Ok(cities
                .into_iter()
                .map(|city| {
                    let unit_kind = *UnitKind::ALL.choose(rng).unwrap_or(&UnitKind::Infantry);
                    MacroAction::Build(BuildAction::new(city.position, unit_kind))
                })
                .collect())
        }
        MacroKind::Move => {
            let visible = engine.visible_positions(player);
            per_unit(engine, player, queues, rng, |unit, rng| {
                let destinations: Vec<Position> = visible
                    .iter()
                    .copied()
                    .filter(|p| *p != unit.position && engine.is_movement_possible(*p, player))
                    .collect();
                let destination = *destinations.choose(rng).ok_or(Infeasible::NoDestination)?;
                Ok(MacroAction::Move(MoveAction::new(unit.id, destination)))
            })
        }
        MacroKind::Wait => per_unit(engine, player, queues, rng, |unit, _| {
            Ok(MacroAction::Wait(WaitAction::new(
                Actor::Unit(unit.id),
                DEFAULT_TICK_MS,
            )))
        }),
        MacroKind::DoNothing => Ok(vec![MacroAction::DoNothing]),
        MacroKind::ScheduleNothing => Ok(vec![MacroAction::ScheduleNothing]),
    }
}

/// Build one candidate per free unit, shuffled and capped.
fn per_unit<E, R, F>(
    engine: &E,
    player: PlayerId,
    queues: &CommandQueue,
    rng: &mut R,
    mut build: F,
) -> Result<Vec<MacroAction>, Infeasible>
where
    E: EngineView + ?Sized,
    R: Rng + ?Sized,
    F: FnMut(&UnitInfo, &mut R) -> Result<MacroAction, Infeasible>,
{
    let mut units = free_units(engine, player, queues);
    if units.is_empty() {
        return Err(Infeasible::NoIdleUnits);
    }
    units.shuffle(rng);

    let mut out = Vec::new();
    let mut first_failure = None;
    for unit in &units {
        if out.len() == MAX_CANDIDATES_PER_KIND {
            break;
        }
        match build(unit, rng) {
            Ok(action) => out.push(action),
            Err(reason) => {
                first_failure.get_or_insert(reason);
            }
        }
    }
    match first_failure {
        Some(reason) if out.is_empty() => Err(reason),
        _ => Ok(out),
    }
}

/// Candidates for every intent kind that is currently possible for `player`.
///
/// `DoNothing` is never included; search adds it on its own. `ScheduleNothing` is offered
/// only while something is queued.
pub fn legal_actions<E, R>(
    engine: &E,
    player: PlayerId,
    queues: &CommandQueue,
    ctx: &MacroContext,
    rng: &mut R,
) -> Vec<MacroAction>
where
    E: EngineView + ?Sized,
    R: Rng + ?Sized,
{
    let mut out = Vec::new();
    for kind in CANDIDATE_KINDS {
        match generate_executable(kind, engine, player, queues, ctx, rng) {
            Ok(actions) => out.extend(actions),
            Err(reason) => trace!(%kind, %reason, "not available"),
        }
    }
    if !queues.is_empty() {
        out.push(MacroAction::ScheduleNothing);
    }
    out
}
