use std::collections::{BTreeMap, BTreeSet};

use rts_core::{
    Actor, CityInfo, Engine, EngineError, EngineView, Order, PlayerId, Position, Tile, UnitId,
    UnitInfo, UnitKind,
};
use tracing::trace;

use crate::{EventKind, EventQueue, SandboxRules};

#[derive(Debug, Clone, Copy)]
struct Unit {
    info: UnitInfo,
    attack: i32,
    activity: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
struct City {
    info: CityInfo,
    activity: Option<u64>,
}

/// In-memory grid RTS with a discrete event clock.
///
/// Orders are scheduled as events and validated again when they start, so a stale order is
/// dropped rather than applied to a world it no longer fits.
#[derive(Debug, Clone)]
pub struct SandboxEngine {
    width: u32,
    height: u32,
    players: u8,
    now_ms: u64,
    rules: SandboxRules,
    tiles: Vec<Tile>,
    cities: BTreeMap<Position, City>,
    units: BTreeMap<UnitId, Unit>,
    discovered: Vec<Vec<bool>>,
    visible: Vec<Vec<bool>>,
    events: EventQueue,
    next_unit: u32,
    next_token: u64,
}

impl SandboxEngine {
    /// An all-plain map with no cities and no units.
    pub fn new(width: u32, height: u32, players: u8) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            players,
            now_ms: 0,
            rules: SandboxRules::default(),
            tiles: vec![Tile::plain(); len],
            cities: BTreeMap::new(),
            units: BTreeMap::new(),
            discovered: vec![vec![false; len]; players as usize],
            visible: vec![vec![false; len]; players as usize],
            events: EventQueue::new(),
            next_unit: 0,
            next_token: 0,
        }
    }

    pub fn with_rules(mut self, rules: SandboxRules) -> Self {
        self.rules = rules;
        self.refresh_vision();
        self
    }

    pub fn rules(&self) -> &SandboxRules {
        &self.rules
    }

    fn idx(&self, pos: Position) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn set_tile(&mut self, pos: Position, tile: Tile) {
        self.overwrite_tile(pos, tile);
    }

    /// Place a city tile and register it.
    pub fn add_city(
        &mut self,
        pos: Position,
        owner: Option<PlayerId>,
        is_start: bool,
    ) -> Result<(), EngineError> {
        let i = self.idx(pos).ok_or(EngineError::OutOfBounds(pos))?;
        self.tiles[i] = Tile::city();
        self.cities.insert(
            pos,
            City {
                info: CityInfo {
                    position: pos,
                    owner,
                    producing: None,
                    is_start,
                },
                activity: None,
            },
        );
        self.refresh_vision();
        Ok(())
    }

    pub fn spawn_unit(
        &mut self,
        owner: PlayerId,
        kind: UnitKind,
        pos: Position,
    ) -> Result<UnitId, EngineError> {
        if !self.in_bounds(pos) {
            return Err(EngineError::OutOfBounds(pos));
        }
        let id = self.insert_unit(owner, kind, pos);
        self.refresh_vision();
        Ok(id)
    }

    fn insert_unit(&mut self, owner: PlayerId, kind: UnitKind, pos: Position) -> UnitId {
        let stats = *self.rules.stats(kind);
        let id = UnitId(self.next_unit);
        self.next_unit += 1;
        self.units.insert(
            id,
            Unit {
                info: UnitInfo {
                    id,
                    owner,
                    kind,
                    position: pos,
                    hp: stats.hp,
                    speed: stats.speed,
                },
                attack: stats.attack,
                activity: None,
            },
        );
        id
    }

    pub fn remove_unit(&mut self, id: UnitId) -> Option<UnitInfo> {
        let removed = self.units.remove(&id).map(|u| u.info);
        self.refresh_vision();
        removed
    }

    /// Mark the whole map as discovered for every player.
    pub fn reveal_all(&mut self) {
        for seen in &mut self.discovered {
            seen.iter_mut().for_each(|d| *d = true);
        }
    }

    pub fn cities_owned_by(&self, player: PlayerId) -> usize {
        self.cities
            .values()
            .filter(|c| c.info.owner == Some(player))
            .count()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn refresh_vision(&mut self) {
        let radius = self.rules.vision_radius as i32;
        let mut eyes: Vec<(usize, Position)> = self
            .units
            .values()
            .map(|u| (u.info.owner.index(), u.info.position))
            .collect();
        eyes.extend(
            self.cities
                .values()
                .filter_map(|c| c.info.owner.map(|o| (o.index(), c.info.position))),
        );

        for seen in &mut self.visible {
            seen.iter_mut().for_each(|v| *v = false);
        }
        for (player, center) in eyes {
            if player >= self.visible.len() {
                continue;
            }
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let Some(i) = self.idx(center.offset(dx, dy)) else {
                        continue;
                    };
                    self.visible[player][i] = true;
                    self.discovered[player][i] = true;
                }
            }
        }
    }

    fn token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    fn mixed_occupancy(&self) -> Option<Position> {
        let mut owners: BTreeMap<Position, BTreeSet<PlayerId>> = BTreeMap::new();
        for u in self.units.values() {
            owners.entry(u.info.position).or_default().insert(u.info.owner);
        }
        owners
            .into_iter()
            .find(|(_, o)| o.len() > 1)
            .map(|(pos, _)| pos)
    }

    fn start_order(&mut self, player: PlayerId, order: Order) {
        if !self.is_valid_order(player, &order) {
            trace!(%order, player = player.0, "order dropped at start");
            return;
        }
        let now = self.now_ms;
        match order {
            Order::MoveStart { unit, to } => {
                let token = self.token();
                let Some(u) = self.units.get_mut(&unit) else {
                    return;
                };
                u.activity = Some(token);
                let step = self.rules.stats(u.info.kind).step_ms();
                self.events.schedule(
                    now.saturating_add(step),
                    EventKind::MoveComplete { unit, to, token },
                );
            }
            Order::MoveStop { unit } => {
                if let Some(u) = self.units.get_mut(&unit) {
                    u.activity = None;
                }
            }
            Order::ProduceStart { city, kind } => {
                let token = self.token();
                let duration = self.rules.stats(kind).production_ms;
                let Some(c) = self.cities.get_mut(&city) else {
                    return;
                };
                c.activity = Some(token);
                c.info.producing = Some(kind);
                self.events.schedule(
                    now + duration,
                    EventKind::ProductionComplete { city, kind, token },
                );
            }
            Order::ProduceStop { city } => {
                if let Some(c) = self.cities.get_mut(&city) {
                    c.activity = None;
                    c.info.producing = None;
                }
            }
            Order::AttackStart { unit, target } => {
                let token = self.token();
                let Some(u) = self.units.get_mut(&unit) else {
                    return;
                };
                u.activity = Some(token);
                self.events.schedule(
                    now + self.rules.attack_interval_ms,
                    EventKind::AttackHit {
                        unit,
                        target,
                        token,
                    },
                );
            }
            Order::Wait { actor, duration_ms } => {
                let token = self.token();
                match actor {
                    Actor::Unit(id) => match self.units.get_mut(&id) {
                        Some(u) => u.activity = Some(token),
                        None => return,
                    },
                    Actor::City(pos) => match self.cities.get_mut(&pos) {
                        Some(c) => c.activity = Some(token),
                        None => return,
                    },
                }
                self.events
                    .schedule(now + duration_ms, EventKind::WaitComplete { actor, token });
            }
        }
    }

    fn process(&mut self, event: EventKind) {
        match event {
            EventKind::OrderStart { player, order } => self.start_order(player, order),
            EventKind::MoveComplete { unit, to, token } => {
                let Some(u) = self.units.get(&unit).copied() else {
                    return;
                };
                if u.activity != Some(token) {
                    return;
                }
                let owner = u.info.owner;
                let legal = self.is_movement_possible(to, owner);
                if let Some(u) = self.units.get_mut(&unit) {
                    u.activity = None;
                    if legal {
                        u.info.position = to;
                    }
                }
                if legal {
                    self.capture(to, owner);
                }
            }
            EventKind::ProductionComplete { city, kind, token } => {
                let Some(c) = self.cities.get(&city).copied() else {
                    return;
                };
                if c.activity != Some(token) {
                    return;
                }
                if let Some(c) = self.cities.get_mut(&city) {
                    c.activity = None;
                    c.info.producing = None;
                }
                if let Some(owner) = c.info.owner {
                    if self.remaining_capacity(city) > 0 {
                        let id = self.insert_unit(owner, kind, city);
                        trace!(unit = id.0, %city, "unit produced");
                    }
                }
            }
            EventKind::AttackHit {
                unit,
                target,
                token,
            } => {
                let Some(attacker) = self.units.get(&unit).copied() else {
                    return;
                };
                if attacker.activity != Some(token) {
                    return;
                }
                let hit = self
                    .units
                    .get(&target)
                    .is_some_and(|t| t.info.position.is_adjacent(attacker.info.position));
                if !hit {
                    if let Some(u) = self.units.get_mut(&unit) {
                        u.activity = None;
                    }
                    return;
                }

                let mut killed = false;
                if let Some(t) = self.units.get_mut(&target) {
                    t.info.hp -= attacker.attack;
                    killed = t.info.hp <= 0;
                }
                if killed {
                    self.units.remove(&target);
                    trace!(unit = unit.0, target = target.0, "unit destroyed");
                    if let Some(u) = self.units.get_mut(&unit) {
                        u.activity = None;
                    }
                } else {
                    self.events.schedule(
                        self.now_ms + self.rules.attack_interval_ms,
                        EventKind::AttackHit {
                            unit,
                            target,
                            token,
                        },
                    );
                }
            }
            EventKind::WaitComplete { actor, token } => match actor {
                Actor::Unit(id) => {
                    if let Some(u) = self.units.get_mut(&id) {
                        if u.activity == Some(token) {
                            u.activity = None;
                        }
                    }
                }
                Actor::City(pos) => {
                    if let Some(c) = self.cities.get_mut(&pos) {
                        if c.activity == Some(token) {
                            c.activity = None;
                        }
                    }
                }
            },
        }
    }

    fn capture(&mut self, pos: Position, player: PlayerId) {
        if self.is_enemy_occupied(pos, player) {
            return;
        }
        let Some(city) = self.cities.get_mut(&pos) else {
            return;
        };
        if city.info.owner == Some(player) {
            return;
        }
        city.info.owner = Some(player);
        city.info.producing = None;
        city.activity = None;
        trace!(%pos, player = player.0, "city captured");
    }

    fn alive_players(&self) -> Vec<PlayerId> {
        self.players()
            .into_iter()
            .filter(|p| {
                self.units.values().any(|u| u.info.owner == *p) || self.cities_owned_by(*p) > 0
            })
            .collect()
    }

    fn winner(&self) -> Option<PlayerId> {
        let alive = self.alive_players();
        if alive.len() == 1 {
            return alive.first().copied();
        }
        let limit = self.rules.time_limit_ms?;
        if self.now_ms < limit {
            return None;
        }
        let mut counts: Vec<(usize, PlayerId)> = alive
            .into_iter()
            .map(|p| (self.cities_owned_by(p), p))
            .collect();
        counts.sort_by(|a, b| b.0.cmp(&a.0));
        match counts.as_slice() {
            [(best, p), (second, _), ..] if best > second => Some(*p),
            [(_, p)] => Some(*p),
            _ => None,
        }
    }
}

impl EngineView for SandboxEngine {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn players(&self) -> Vec<PlayerId> {
        (0..self.players).map(PlayerId).collect()
    }

    fn units(&self) -> Vec<UnitInfo> {
        self.units.values().map(|u| u.info).collect()
    }

    fn unit(&self, id: UnitId) -> Option<UnitInfo> {
        self.units.get(&id).map(|u| u.info)
    }

    fn cities(&self) -> Vec<CityInfo> {
        self.cities.values().map(|c| c.info).collect()
    }

    fn city_at(&self, pos: Position) -> Option<CityInfo> {
        self.cities.get(&pos).map(|c| c.info)
    }

    fn tile(&self, pos: Position) -> Option<Tile> {
        self.idx(pos).map(|i| self.tiles[i])
    }

    fn occupants(&self, pos: Position) -> Vec<UnitId> {
        self.units
            .values()
            .filter(|u| u.info.position == pos)
            .map(|u| u.info.id)
            .collect()
    }

    fn is_movement_possible(&self, pos: Position, player: PlayerId) -> bool {
        let Some(tile) = self.tile(pos) else {
            return false;
        };
        tile.is_passable() && self.remaining_capacity(pos) > 0 && !self.is_enemy_occupied(pos, player)
    }

    fn is_discovered(&self, player: PlayerId, pos: Position) -> bool {
        match (self.discovered.get(player.index()), self.idx(pos)) {
            (Some(seen), Some(i)) => seen[i],
            _ => false,
        }
    }

    fn is_visible(&self, player: PlayerId, pos: Position) -> bool {
        match (self.visible.get(player.index()), self.idx(pos)) {
            (Some(seen), Some(i)) => seen[i],
            _ => false,
        }
    }

    fn is_unit_idle(&self, unit: UnitId) -> bool {
        self.units
            .get(&unit)
            .is_some_and(|u| u.activity.is_none())
            && !self.events.has_pending_order(Actor::Unit(unit))
    }

    fn is_city_idle(&self, pos: Position) -> bool {
        self.cities
            .get(&pos)
            .is_some_and(|c| c.activity.is_none() && c.info.producing.is_none())
            && !self.events.has_pending_order(Actor::City(pos))
    }
}

impl Engine for SandboxEngine {
    fn advance(&mut self, dt_ms: u64) -> Result<(), EngineError> {
        if let Some(pos) = self.mixed_occupancy() {
            return Err(EngineError::Ambiguous(format!(
                "units of several players share {pos}"
            )));
        }

        let end = self.now_ms.saturating_add(dt_ms);
        while let Some(at) = self.events.peek_time() {
            if at > end {
                break;
            }
            self.now_ms = self.now_ms.max(at);
            while let Some(event) = self.events.pop_if_ready(self.now_ms) {
                self.process(event);
            }
            self.refresh_vision();
        }
        self.now_ms = end;
        self.refresh_vision();
        Ok(())
    }

    fn is_valid_order(&self, player: PlayerId, order: &Order) -> bool {
        let owns_unit = |id: UnitId| self.unit(id).is_some_and(|u| u.owner == player);
        let owns_city = |pos: Position| self.city_at(pos).is_some_and(|c| c.owner == Some(player));

        match *order {
            Order::MoveStart { unit, to } => {
                let Some(u) = self.unit(unit) else {
                    return false;
                };
                u.owner == player
                    && self.units.get(&unit).is_some_and(|u| u.activity.is_none())
                    && u.position.is_adjacent(to)
                    && self.is_movement_possible(to, player)
            }
            Order::MoveStop { unit } => owns_unit(unit),
            Order::ProduceStart { city, .. } => {
                owns_city(city)
                    && self
                        .cities
                        .get(&city)
                        .is_some_and(|c| c.activity.is_none() && c.info.producing.is_none())
            }
            Order::ProduceStop { city } => owns_city(city),
            Order::AttackStart { unit, target } => {
                let (Some(u), Some(t)) = (self.unit(unit), self.unit(target)) else {
                    return false;
                };
                u.owner == player && t.owner != player && u.position.is_adjacent(t.position)
            }
            Order::Wait { actor, .. } => match actor {
                Actor::Unit(id) => owns_unit(id),
                Actor::City(pos) => owns_city(pos),
            },
        }
    }

    fn schedule(&mut self, player: PlayerId, order: Order, at_ms: u64) -> Result<(), EngineError> {
        if at_ms < self.now_ms {
            return Err(EngineError::Rejected(format!(
                "{order} scheduled in the past ({at_ms} < {})",
                self.now_ms
            )));
        }
        let owned = match order.actor() {
            Actor::Unit(id) => self
                .unit(id)
                .ok_or(EngineError::UnknownUnit(id))?
                .owner
                == player,
            Actor::City(pos) => self.city_at(pos).is_some_and(|c| c.owner == Some(player)),
        };
        if !owned {
            return Err(EngineError::Rejected(format!(
                "{order} is not commanded by {player}"
            )));
        }
        self.events
            .schedule(at_ms, EventKind::OrderStart { player, order });
        Ok(())
    }

    fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }

    fn utility(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.players as usize];
        if let Some(w) = self.winner() {
            if let Some(slot) = out.get_mut(w.index()) {
                *slot = 1.0;
            }
        }
        out
    }

    fn overwrite_tile(&mut self, pos: Position, tile: Tile) {
        let Some(i) = self.idx(pos) else {
            return;
        };
        self.tiles[i] = tile;
        if tile.is_city() {
            self.cities.entry(pos).or_insert(City {
                info: CityInfo {
                    position: pos,
                    owner: None,
                    producing: None,
                    is_start: false,
                },
                activity: None,
            });
        } else if self.cities.get(&pos).is_some_and(|c| !c.info.is_start) {
            self.cities.remove(&pos);
        }
    }

    fn relocate_unit(&mut self, unit: UnitId, pos: Position) -> Result<(), EngineError> {
        if !self.in_bounds(pos) {
            return Err(EngineError::OutOfBounds(pos));
        }
        let u = self
            .units
            .get_mut(&unit)
            .ok_or(EngineError::UnknownUnit(unit))?;
        u.info.position = pos;
        u.activity = None;
        self.refresh_vision();
        Ok(())
    }
}
