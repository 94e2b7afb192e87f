#![cfg(feature = "serde")]

use rts_core::{Actor, Position, UnitId, UnitKind};
use rts_macro::{
    AttackAction, BuildAction, ExpansionAction, ExpansionStep, MacroAction, MoveAction, WaitAction,
};

#[test]
fn macro_actions_roundtrip_through_json() {
    let actions = vec![
        MacroAction::Move(MoveAction::new(UnitId(1), Position::new(3, 4))),
        MacroAction::Build(BuildAction::new(Position::new(1, 1), UnitKind::Cavalry)),
        MacroAction::Attack(AttackAction::new(UnitId(1), UnitId(9))),
        MacroAction::Expansion(ExpansionAction {
            target: Position::new(6, 6),
            step: ExpansionStep::Reinforce(BuildAction::new(
                Position::new(1, 1),
                UnitKind::Infantry,
            )),
        }),
        MacroAction::Expansion(ExpansionAction {
            target: Position::new(6, 6),
            step: ExpansionStep::March(MoveAction::new(UnitId(4), Position::new(6, 6))),
        }),
        MacroAction::Wait(WaitAction::new(Actor::Unit(UnitId(2)), 1000)),
        MacroAction::DoNothing,
        MacroAction::ScheduleNothing,
    ];
    for action in actions {
        let json = serde_json::to_string(&action).unwrap();
        let back: MacroAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}

#[test]
fn intent_tag_is_snake_case() {
    let json = serde_json::to_value(MacroAction::ScheduleNothing).unwrap();
    assert_eq!(json["intent"], "schedule_nothing");
}

#[test]
fn build_keeps_its_unit_kind_next_to_the_intent_tag() {
    let action = MacroAction::Build(BuildAction::new(Position::new(2, 3), UnitKind::Cavalry));
    let json = serde_json::to_value(&action).unwrap();
    assert_eq!(json["intent"], "build");
    assert_eq!(json["kind"], "cavalry");

    let back: MacroAction = serde_json::from_value(json).unwrap();
    assert_eq!(back, action);
}
