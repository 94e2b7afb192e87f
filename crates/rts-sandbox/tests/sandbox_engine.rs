use rts_core::{Actor, Engine, EngineError, EngineView, Order, PlayerId, Position, Tile, UnitKind};
use rts_sandbox::{generate, MapConfig, SandboxEngine};

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);

fn open_field() -> SandboxEngine {
    SandboxEngine::new(8, 8, 2)
}

#[test]
fn move_completes_after_one_step() {
    let mut engine = open_field();
    let unit = engine
        .spawn_unit(P0, UnitKind::Infantry, Position::new(0, 0))
        .unwrap();
    let order = Order::MoveStart {
        unit,
        to: Position::new(1, 1),
    };
    assert!(engine.is_valid_order(P0, &order));
    engine.schedule(P0, order, 0).unwrap();
    assert!(!engine.is_unit_idle(unit));

    engine.advance(500).unwrap();
    assert_eq!(engine.unit(unit).unwrap().position, Position::new(0, 0));

    engine.advance(500).unwrap();
    assert_eq!(engine.unit(unit).unwrap().position, Position::new(1, 1));
    assert!(engine.is_unit_idle(unit));
    assert_eq!(engine.now_ms(), 1000);
}

#[test]
fn rejects_orders_for_foreign_or_distant_targets() {
    let mut engine = open_field();
    let unit = engine
        .spawn_unit(P0, UnitKind::Infantry, Position::new(0, 0))
        .unwrap();

    let far = Order::MoveStart {
        unit,
        to: Position::new(3, 3),
    };
    assert!(!engine.is_valid_order(P0, &far));
    assert!(!engine.is_valid_order(
        P1,
        &Order::MoveStart {
            unit,
            to: Position::new(1, 0)
        }
    ));
    assert!(matches!(
        engine.schedule(P1, far, 0),
        Err(EngineError::Rejected(_))
    ));

    engine.set_tile(Position::new(1, 0), Tile::mountain());
    assert!(!engine.is_valid_order(
        P0,
        &Order::MoveStart {
            unit,
            to: Position::new(1, 0)
        }
    ));
}

#[test]
fn scheduling_in_the_past_is_rejected() {
    let mut engine = open_field();
    let unit = engine
        .spawn_unit(P0, UnitKind::Infantry, Position::new(0, 0))
        .unwrap();
    engine.advance(2000).unwrap();
    let result = engine.schedule(P0, Order::MoveStop { unit }, 1000);
    assert!(matches!(result, Err(EngineError::Rejected(_))));
}

#[test]
fn walking_onto_a_city_captures_it() {
    let mut engine = open_field();
    engine.add_city(Position::new(2, 2), None, false).unwrap();
    let unit = engine
        .spawn_unit(P0, UnitKind::Cavalry, Position::new(1, 1))
        .unwrap();
    engine
        .schedule(
            P0,
            Order::MoveStart {
                unit,
                to: Position::new(2, 2),
            },
            0,
        )
        .unwrap();
    engine.advance(1000).unwrap();

    let city = engine.city_at(Position::new(2, 2)).unwrap();
    assert_eq!(city.owner, Some(P0));
    assert_eq!(engine.cities_owned_by(P0), 1);
}

#[test]
fn production_spawns_a_unit_on_the_city() {
    let mut engine = open_field();
    let city = Position::new(3, 3);
    engine.add_city(city, Some(P0), true).unwrap();
    engine
        .schedule(
            P0,
            Order::ProduceStart {
                city,
                kind: UnitKind::Infantry,
            },
            0,
        )
        .unwrap();

    engine.advance(1000).unwrap();
    assert!(!engine.is_city_idle(city));
    assert_eq!(
        engine.city_at(city).unwrap().producing,
        Some(UnitKind::Infantry)
    );

    engine.advance(2000).unwrap();
    assert!(engine.is_city_idle(city));
    let units = engine.units_of(P0);
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].position, city);
}

#[test]
fn attacks_repeat_until_the_target_dies() {
    let mut engine = open_field();
    let attacker = engine
        .spawn_unit(P0, UnitKind::Artillery, Position::new(2, 2))
        .unwrap();
    let target = engine
        .spawn_unit(P1, UnitKind::Artillery, Position::new(3, 2))
        .unwrap();
    engine
        .schedule(P0, Order::AttackStart { unit: attacker, target }, 0)
        .unwrap();

    engine.advance(1000).unwrap();
    assert_eq!(engine.unit(target).unwrap().hp, 1);

    engine.advance(1000).unwrap();
    assert!(engine.unit(target).is_none());
    assert!(engine.is_unit_idle(attacker));
    assert!(engine.is_game_over());
    assert_eq!(engine.utility(), vec![1.0, 0.0]);
}

#[test]
fn wait_holds_the_actor() {
    let mut engine = open_field();
    let unit = engine
        .spawn_unit(P0, UnitKind::Infantry, Position::new(0, 0))
        .unwrap();
    engine
        .schedule(
            P0,
            Order::Wait {
                actor: Actor::Unit(unit),
                duration_ms: 1500,
            },
            0,
        )
        .unwrap();
    engine.advance(1000).unwrap();
    assert!(!engine.is_unit_idle(unit));
    engine.advance(1000).unwrap();
    assert!(engine.is_unit_idle(unit));
}

#[test]
fn vision_discovers_tiles_around_units() {
    let mut engine = SandboxEngine::new(10, 10, 2);
    engine
        .spawn_unit(P0, UnitKind::Infantry, Position::new(0, 0))
        .unwrap();
    assert!(engine.is_visible(P0, Position::new(2, 2)));
    assert!(!engine.is_visible(P0, Position::new(3, 0)));
    assert!(!engine.is_visible(P1, Position::new(0, 0)));
    assert!(engine.is_discovered(P0, Position::new(1, 2)));
}

#[test]
fn overwrite_tile_registers_and_clears_neutral_cities() {
    let mut engine = open_field();
    engine.overwrite_tile(Position::new(4, 4), Tile::city());
    assert!(engine.city_at(Position::new(4, 4)).is_some());
    engine.overwrite_tile(Position::new(4, 4), Tile::plain());
    assert!(engine.city_at(Position::new(4, 4)).is_none());

    engine.add_city(Position::new(1, 1), Some(P0), true).unwrap();
    engine.overwrite_tile(Position::new(1, 1), Tile::plain());
    assert!(engine.city_at(Position::new(1, 1)).is_some());
}

#[test]
fn shared_tiles_make_advance_ambiguous() {
    let mut engine = open_field();
    engine
        .spawn_unit(P0, UnitKind::Infantry, Position::new(1, 1))
        .unwrap();
    let enemy = engine
        .spawn_unit(P1, UnitKind::Infantry, Position::new(5, 5))
        .unwrap();
    engine.relocate_unit(enemy, Position::new(1, 1)).unwrap();
    assert!(matches!(
        engine.advance(1000),
        Err(EngineError::Ambiguous(_))
    ));
    assert!(matches!(
        engine.relocate_unit(enemy, Position::new(-1, 0)),
        Err(EngineError::OutOfBounds(_))
    ));
}

#[test]
fn time_limit_awards_the_city_leader() {
    let mut config = MapConfig::default();
    config.rules.time_limit_ms = Some(3000);
    let mut engine = SandboxEngine::new(8, 8, 2).with_rules(config.rules);
    engine.add_city(Position::new(1, 1), Some(P0), true).unwrap();
    engine.add_city(Position::new(2, 1), Some(P0), false).unwrap();
    engine.add_city(Position::new(6, 6), Some(P1), true).unwrap();

    assert!(!engine.is_game_over());
    engine.advance(3000).unwrap();
    assert!(engine.is_game_over());
    assert_eq!(engine.utility(), vec![1.0, 0.0]);
}

#[test]
fn generation_is_deterministic_per_seed() {
    let config = MapConfig::default();
    let a = generate(&config, 7);
    let b = generate(&config, 7);

    let tiles = |e: &SandboxEngine| -> Vec<Tile> {
        e.positions().into_iter().filter_map(|p| e.tile(p)).collect()
    };
    assert_eq!(tiles(&a), tiles(&b));
    assert_eq!(a.cities(), b.cities());
    assert_eq!(a.units(), b.units());
}

#[test]
fn generated_players_start_on_their_city() {
    let config = MapConfig::default();
    let engine = generate(&config, 11);
    for player in engine.players() {
        let starts: Vec<_> = engine
            .cities()
            .into_iter()
            .filter(|c| c.is_start && c.owner == Some(player))
            .collect();
        assert_eq!(starts.len(), 1);
        assert_eq!(engine.units_of(player).len(), config.starting_units.len());
    }
    assert!(!engine.is_game_over());
}
