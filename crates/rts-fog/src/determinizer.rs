use std::collections::{BTreeMap, BTreeSet, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use rts_core::{Engine, EngineError, EngineView, PlayerId, Position, Tile, TileKind, UnitId};
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ControlPoint, DecayCurve, LastSeen};

/// Sampling parameters for unknown tiles and hidden enemies.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeterminizerConfig {
    /// City probability close to a starting city.
    pub near: ControlPoint,
    /// City probability far from any starting city.
    pub far: ControlPoint,
    /// Asymptotic floor of the city probability.
    pub floor: f64,
    /// Tile kind used for unknown cells that are not sampled as cities.
    pub default_terrain: TileKind,
    /// Attempts to find a free tile for a hidden enemy before leaving it unplaced.
    pub max_placement_retries: u32,
}

impl Default for DeterminizerConfig {
    fn default() -> Self {
        Self {
            near: ControlPoint::new(2.0, 0.15),
            far: ControlPoint::new(12.0, 0.01),
            floor: 0.0,
            default_terrain: TileKind::Plain,
            max_placement_retries: 8,
        }
    }
}

/// What one player currently knows: the positions in sight and its enemy sightings.
#[derive(Debug, Clone, Default)]
pub struct FogObservation {
    pub known: HashSet<Position>,
    pub last_seen: Vec<LastSeen>,
}

/// A hidden enemy moved to a sampled position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub unit: UnitId,
    pub position: Position,
}

/// One concrete world consistent with the observations.
#[derive(Debug, Clone, PartialEq)]
pub struct DeterminizedMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    sampled: Vec<bool>,
    pub placements: Vec<Placement>,
    pub unplaced: Vec<UnitId>,
}

impl DeterminizedMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn idx(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x as u32 >= self.width || pos.y as u32 >= self.height {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn tile(&self, pos: Position) -> Option<Tile> {
        self.idx(pos).map(|i| self.tiles[i])
    }

    /// `true` when the tile was sampled rather than copied from ground truth.
    pub fn is_sampled(&self, pos: Position) -> bool {
        self.idx(pos).map(|i| self.sampled[i]).unwrap_or(false)
    }

    pub fn sampled_count(&self) -> usize {
        self.sampled.iter().filter(|s| **s).count()
    }

    pub fn placement_of(&self, unit: UnitId) -> Option<Position> {
        self.placements
            .iter()
            .find(|p| p.unit == unit)
            .map(|p| p.position)
    }

    /// Install this world into an engine clone. Known tiles are never written.
    pub fn apply<E: Engine>(&self, engine: &mut E) -> Result<(), EngineError> {
        for (i, tile) in self.tiles.iter().enumerate() {
            if !self.sampled[i] {
                continue;
            }
            let pos = Position::new(
                (i % self.width as usize) as i32,
                (i / self.width as usize) as i32,
            );
            engine.overwrite_tile(pos, *tile);
        }
        for placement in &self.placements {
            engine.relocate_unit(placement.unit, placement.position)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Determinizer {
    config: DeterminizerConfig,
    curve: DecayCurve,
}

impl Default for Determinizer {
    fn default() -> Self {
        Self::new(DeterminizerConfig::default())
    }
}

impl Determinizer {
    pub fn new(config: DeterminizerConfig) -> Self {
        let curve = DecayCurve::from_control_points(config.near, config.far, config.floor);
        Self { config, curve }
    }

    pub fn config(&self) -> &DeterminizerConfig {
        &self.config
    }

    pub fn city_probability(&self, distance: f64) -> f64 {
        self.curve.probability(distance)
    }

    /// Sample one concrete world for `player`.
    pub fn determinize<E, R>(
        &self,
        engine: &E,
        player: PlayerId,
        known: &HashSet<Position>,
        last_seen: &[LastSeen],
        rng: &mut R,
    ) -> DeterminizedMap
    where
        E: EngineView + ?Sized,
        R: Rng + ?Sized,
    {
        let width = engine.width();
        let height = engine.height();
        let starts: Vec<Position> = engine
            .cities()
            .into_iter()
            .filter(|c| c.is_start)
            .map(|c| c.position)
            .collect();
        let start_set: HashSet<Position> = starts.iter().copied().collect();
        let default_tile = Tile::of_kind(self.config.default_terrain);

        let len = width as usize * height as usize;
        let mut tiles = Vec::with_capacity(len);
        let mut sampled = Vec::with_capacity(len);

        for pos in engine.positions() {
            if start_set.contains(&pos) || known.contains(&pos) {
                tiles.push(engine.tile(pos).unwrap_or(default_tile));
                sampled.push(false);
                continue;
            }

            let distance = starts
                .iter()
                .map(|s| s.euclidean(pos))
                .fold(f64::INFINITY, f64::min);
            let p_city = if distance.is_finite() {
                self.curve.probability(distance)
            } else {
                0.0
            };
            let tile = if rng.gen_bool(p_city) {
                Tile::city()
            } else {
                default_tile
            };
            tiles.push(tile);
            sampled.push(true);
        }

        let mut map = DeterminizedMap {
            width,
            height,
            tiles,
            sampled,
            placements: Vec::new(),
            unplaced: Vec::new(),
        };
        self.place_enemies(engine, player, known, last_seen, &mut map, rng);
        map
    }

    fn place_enemies<E, R>(
        &self,
        engine: &E,
        player: PlayerId,
        known: &HashSet<Position>,
        last_seen: &[LastSeen],
        map: &mut DeterminizedMap,
        rng: &mut R,
    ) where
        E: EngineView + ?Sized,
        R: Rng + ?Sized,
    {
        let now = engine.now_ms();
        // Tiles claimed by an earlier placement this pass.
        let mut taken: BTreeSet<Position> = BTreeSet::new();
        let mut occupancy = Occupancy::from_engine(engine);

        for seen in last_seen {
            if seen.owner == player {
                continue;
            }
            // Already in sight: ground truth stands.
            if let Some(unit) = engine.unit(seen.unit) {
                if known.contains(&unit.position) {
                    continue;
                }
            }

            let reach = seen.reach(now);
            let candidates: Vec<Position> = engine
                .positions()
                .into_iter()
                .filter(|p| map.is_sampled(*p))
                .filter(|p| map.tile(*p).map(|t| t.is_passable()).unwrap_or(false))
                .filter(|p| p.euclidean(seen.position) <= reach)
                .filter(|p| !occupancy.is_foreign(*p, seen.unit, seen.owner))
                .collect();

            if candidates.is_empty() {
                trace!(unit = seen.unit.0, "no free tile in reach of hidden enemy");
                map.unplaced.push(seen.unit);
                continue;
            }

            // Cities are the likeliest rally point; allies may share one.
            let city = candidates
                .iter()
                .filter(|p| map.tile(**p).map(|t| t.is_city()).unwrap_or(false))
                .min_by(|a, b| {
                    a.euclidean(seen.position)
                        .total_cmp(&b.euclidean(seen.position))
                        .then_with(|| a.cmp(b))
                })
                .copied();
            if let Some(city) = city {
                taken.insert(city);
                occupancy.place(seen.unit, seen.owner, city);
                map.placements.push(Placement {
                    unit: seen.unit,
                    position: city,
                });
                continue;
            }

            let mut placed = None;
            for _ in 0..self.config.max_placement_retries.max(1) {
                let Some(pos) = candidates.choose(rng).copied() else {
                    break;
                };
                if !taken.contains(&pos) {
                    placed = Some(pos);
                    break;
                }
            }

            match placed {
                Some(pos) => {
                    taken.insert(pos);
                    occupancy.place(seen.unit, seen.owner, pos);
                    map.placements.push(Placement {
                        unit: seen.unit,
                        position: pos,
                    });
                }
                None => {
                    trace!(unit = seen.unit.0, "hidden enemy left unplaced");
                    map.unplaced.push(seen.unit);
                }
            }
        }
    }
}

/// Who stands where while placements are drawn. Starts from the engine's units, which keep
/// their true position unless placed, so a placement never mixes two players on one tile.
#[derive(Debug, Default)]
struct Occupancy {
    tiles: BTreeMap<Position, Vec<(UnitId, PlayerId)>>,
}

impl Occupancy {
    fn from_engine<E: EngineView + ?Sized>(engine: &E) -> Self {
        let mut occupancy = Self::default();
        for unit in engine.units() {
            occupancy
                .tiles
                .entry(unit.position)
                .or_default()
                .push((unit.id, unit.owner));
        }
        occupancy
    }

    /// `true` when a unit of another player (other than `unit` itself) stands on `pos`.
    fn is_foreign(&self, pos: Position, unit: UnitId, owner: PlayerId) -> bool {
        self.tiles
            .get(&pos)
            .is_some_and(|units| units.iter().any(|(id, o)| *id != unit && *o != owner))
    }

    fn place(&mut self, unit: UnitId, owner: PlayerId, pos: Position) {
        for units in self.tiles.values_mut() {
            units.retain(|(id, _)| *id != unit);
        }
        self.tiles.entry(pos).or_default().push((unit, owner));
    }
}
