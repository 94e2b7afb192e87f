use std::collections::HashSet;

use proptest::prelude::*;
use rts_core::{seeded_rng, Engine, EngineView, PlayerId, Position, Tile, UnitKind};
use rts_fog::{
    known_positions, ControlPoint, Determinizer, DeterminizerConfig, LastSeen, SightingTracker,
};
use rts_sandbox::SandboxEngine;

const ME: PlayerId = PlayerId(0);
const FOE: PlayerId = PlayerId(1);

fn world() -> SandboxEngine {
    let mut engine = SandboxEngine::new(12, 12, 2);
    engine.add_city(Position::new(1, 1), Some(ME), true).unwrap();
    engine.add_city(Position::new(10, 10), Some(FOE), true).unwrap();
    engine.set_tile(Position::new(2, 2), Tile::forest());
    engine.set_tile(Position::new(7, 3), Tile::mountain());
    engine
        .spawn_unit(ME, UnitKind::Infantry, Position::new(1, 1))
        .unwrap();
    engine
}

#[test]
fn known_tiles_are_copied_verbatim() {
    let engine = world();
    let known = known_positions(&engine, ME);
    assert!(known.contains(&Position::new(2, 2)));

    let det = Determinizer::default();
    let mut rng = seeded_rng(3);
    let map = det.determinize(&engine, ME, &known, &[], &mut rng);

    for pos in &known {
        assert_eq!(map.tile(*pos), engine.tile(*pos));
        assert!(!map.is_sampled(*pos));
    }
    // Starting cities are public even when out of sight.
    assert_eq!(map.tile(Position::new(10, 10)), Some(Tile::city()));
    assert!(!map.is_sampled(Position::new(10, 10)));
}

#[test]
fn every_unknown_tile_gets_a_value() {
    let engine = world();
    let known = known_positions(&engine, ME);
    let map = Determinizer::default().determinize(&engine, ME, &known, &[], &mut seeded_rng(9));

    for pos in engine.positions() {
        assert!(map.tile(pos).is_some(), "unset tile at {pos}");
    }
    assert_eq!(
        map.sampled_count(),
        engine.positions().len() - known.len() - 1
    );
}

#[test]
fn certain_city_curve_fills_the_fog_with_cities() {
    let engine = world();
    let known = known_positions(&engine, ME);
    let config = DeterminizerConfig {
        near: ControlPoint::new(1.0, 1.0),
        far: ControlPoint::new(2.0, 1.0),
        ..DeterminizerConfig::default()
    };
    let map = Determinizer::new(config).determinize(&engine, ME, &known, &[], &mut seeded_rng(1));
    assert!(engine
        .positions()
        .into_iter()
        .filter(|p| map.is_sampled(*p))
        .all(|p| map.tile(p) == Some(Tile::city())));
}

#[test]
fn hidden_enemy_prefers_a_reachable_city() {
    let mut engine = world();
    let foe = engine
        .spawn_unit(FOE, UnitKind::Infantry, Position::new(9, 9))
        .unwrap();
    engine.advance(4000).unwrap();

    let sighting = LastSeen {
        unit: foe,
        owner: FOE,
        kind: UnitKind::Infantry,
        position: Position::new(8, 5),
        seen_at_ms: 0,
        speed: 1.0,
    };
    let known = known_positions(&engine, ME);
    let config = DeterminizerConfig {
        near: ControlPoint::new(1.0, 0.0),
        far: ControlPoint::new(2.0, 0.0),
        ..DeterminizerConfig::default()
    };
    let det = Determinizer::new(config);

    // No sampled cities: placed somewhere within four tiles.
    let map = det.determinize(&engine, ME, &known, &[sighting], &mut seeded_rng(5));
    let placed = map.placement_of(foe).expect("placed");
    assert!(placed.euclidean(sighting.position) <= 4.0);
    assert!(map.is_sampled(placed));

    // With every sampled tile a city, the nearest one in reach wins regardless of the seed.
    let all_cities = Determinizer::new(DeterminizerConfig {
        near: ControlPoint::new(1.0, 1.0),
        far: ControlPoint::new(2.0, 1.0),
        ..DeterminizerConfig::default()
    });
    for seed in 0..4 {
        let map = all_cities.determinize(&engine, ME, &known, &[sighting], &mut seeded_rng(seed));
        assert_eq!(map.placement_of(foe), Some(Position::new(8, 5)));
    }
}

#[test]
fn enemy_without_reach_stays_unplaced() {
    let mut engine = world();
    let foe = engine
        .spawn_unit(FOE, UnitKind::Infantry, Position::new(9, 9))
        .unwrap();
    let sighting = LastSeen {
        unit: foe,
        owner: FOE,
        kind: UnitKind::Infantry,
        position: Position::new(1, 2),
        seen_at_ms: engine.now_ms(),
        speed: 1.0,
    };
    let known = known_positions(&engine, ME);
    let map = Determinizer::default().determinize(
        &engine,
        ME,
        &known,
        &[sighting],
        &mut seeded_rng(2),
    );
    assert_eq!(map.unplaced, vec![foe]);
    assert!(map.placements.is_empty());
}

#[test]
fn second_enemy_is_unplaced_when_its_only_tile_is_taken() {
    let mut engine = world();
    let a = engine
        .spawn_unit(FOE, UnitKind::Infantry, Position::new(9, 9))
        .unwrap();
    let b = engine
        .spawn_unit(FOE, UnitKind::Infantry, Position::new(9, 9))
        .unwrap();
    let spot = Position::new(8, 5);
    // Seen just now: zero reach leaves a single candidate tile.
    let sighting = |unit| LastSeen {
        unit,
        owner: FOE,
        kind: UnitKind::Infantry,
        position: spot,
        seen_at_ms: engine.now_ms(),
        speed: 1.0,
    };
    let known = known_positions(&engine, ME);
    let no_cities = Determinizer::new(DeterminizerConfig {
        near: ControlPoint::new(1.0, 0.0),
        far: ControlPoint::new(2.0, 0.0),
        ..DeterminizerConfig::default()
    });

    for seed in 0..4 {
        let map = no_cities.determinize(
            &engine,
            ME,
            &known,
            &[sighting(a), sighting(b)],
            &mut seeded_rng(seed),
        );
        assert_eq!(map.placement_of(a), Some(spot));
        assert_eq!(map.placement_of(b), None);
        assert_eq!(map.unplaced, vec![b]);
    }
}

#[test]
fn enemies_of_different_players_never_share_a_tile() {
    let third = PlayerId(2);
    let mut engine = SandboxEngine::new(12, 12, 3);
    engine.add_city(Position::new(1, 1), Some(ME), true).unwrap();
    engine.add_city(Position::new(10, 10), Some(FOE), true).unwrap();
    engine.add_city(Position::new(10, 1), Some(third), true).unwrap();
    engine
        .spawn_unit(ME, UnitKind::Infantry, Position::new(1, 1))
        .unwrap();
    let foe = engine
        .spawn_unit(FOE, UnitKind::Infantry, Position::new(9, 9))
        .unwrap();
    let other = engine
        .spawn_unit(third, UnitKind::Infantry, Position::new(9, 8))
        .unwrap();
    engine.advance(2000).unwrap();

    let rally = Position::new(8, 6);
    let sighting = |unit, owner| LastSeen {
        unit,
        owner,
        kind: UnitKind::Infantry,
        position: rally,
        seen_at_ms: 0,
        speed: 1.0,
    };
    let known = known_positions(&engine, ME);
    let all_cities = Determinizer::new(DeterminizerConfig {
        near: ControlPoint::new(1.0, 1.0),
        far: ControlPoint::new(2.0, 1.0),
        ..DeterminizerConfig::default()
    });

    for seed in 0..4 {
        let map = all_cities.determinize(
            &engine,
            ME,
            &known,
            &[sighting(foe, FOE), sighting(other, third)],
            &mut seeded_rng(seed),
        );
        assert_eq!(map.placement_of(foe), Some(rally));
        let elsewhere = map.placement_of(other).expect("second player placed");
        assert_ne!(elsewhere, rally);
        assert!(elsewhere.euclidean(rally) <= 2.0);

        let mut clone = engine.clone();
        map.apply(&mut clone).unwrap();
        clone.advance(1000).unwrap();
    }
}

#[test]
fn apply_only_touches_sampled_tiles() {
    let mut engine = world();
    let foe = engine
        .spawn_unit(FOE, UnitKind::Cavalry, Position::new(9, 9))
        .unwrap();
    engine.advance(3000).unwrap();
    let sighting = LastSeen {
        unit: foe,
        owner: FOE,
        kind: UnitKind::Cavalry,
        position: Position::new(9, 9),
        seen_at_ms: 0,
        speed: 2.0,
    };
    let known = known_positions(&engine, ME);
    let map = Determinizer::default().determinize(
        &engine,
        ME,
        &known,
        &[sighting],
        &mut seeded_rng(8),
    );

    let mut clone = engine.clone();
    map.apply(&mut clone).unwrap();
    for pos in &known {
        assert_eq!(clone.tile(*pos), engine.tile(*pos));
    }
    if let Some(pos) = map.placement_of(foe) {
        assert_eq!(clone.unit(foe).unwrap().position, pos);
    }
}

#[test]
fn tracker_forgets_dead_units_and_keeps_stale_sightings() {
    let mut engine = world();
    let near = engine
        .spawn_unit(FOE, UnitKind::Infantry, Position::new(2, 3))
        .unwrap();
    let far = engine
        .spawn_unit(FOE, UnitKind::Infantry, Position::new(9, 9))
        .unwrap();

    let mut tracker = SightingTracker::new();
    tracker.observe(&engine, ME);
    assert!(tracker.get(near).is_some());
    assert!(tracker.get(far).is_none());

    engine.relocate_unit(near, Position::new(8, 8)).unwrap();
    engine.advance(1000).unwrap();
    tracker.observe(&engine, ME);
    let record = tracker.get(near).unwrap();
    assert_eq!(record.position, Position::new(2, 3));
    assert_eq!(record.seen_at_ms, 0);

    engine.remove_unit(near);
    tracker.observe(&engine, ME);
    assert!(tracker.is_empty());
}

proptest! {
    #[test]
    fn known_tiles_survive_any_seed(seed in any::<u64>(), cx in 0i32..12, cy in 0i32..12) {
        let mut engine = world();
        engine.set_tile(Position::new(cx, cy), Tile::forest());
        let known: HashSet<Position> = known_positions(&engine, ME);
        let map = Determinizer::default().determinize(&engine, ME, &known, &[], &mut seeded_rng(seed));
        for pos in engine.positions() {
            prop_assert!(map.tile(pos).is_some());
            if known.contains(&pos) {
                prop_assert_eq!(map.tile(pos), engine.tile(pos));
            }
        }
    }
}
