#![cfg(feature = "serde")]

use rts_core::{Actor, Order, Position, Tile, TileKind, UnitId, UnitKind};

#[test]
fn orders_roundtrip_via_serde() {
    let orders = vec![
        Order::MoveStart {
            unit: UnitId(3),
            to: Position::new(1, 2),
        },
        Order::ProduceStart {
            city: Position::new(4, 4),
            kind: UnitKind::Cavalry,
        },
        Order::AttackStart {
            unit: UnitId(3),
            target: UnitId(9),
        },
        Order::Wait {
            actor: Actor::City(Position::new(4, 4)),
            duration_ms: 1000,
        },
    ];

    let json = serde_json::to_string(&orders).expect("serialize orders");
    let back: Vec<Order> = serde_json::from_str(&json).expect("deserialize orders");
    assert_eq!(orders, back);
}

#[test]
fn tile_kind_uses_snake_case_names() {
    let json = serde_json::to_string(&Tile::of_kind(TileKind::Mountain)).expect("serialize tile");
    assert!(json.contains("\"mountain\""));
}
