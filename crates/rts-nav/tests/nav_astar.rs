use std::collections::HashSet;

use proptest::prelude::*;
use rts_core::Position;
use rts_nav::{AStar, AStarConfig, NavGrid, Passability, PathResult};

#[test]
fn five_by_five_diagonal_is_four_steps() {
    let grid = NavGrid::new(5, 5);
    let start = Position::new(0, 0);
    let goal = Position::new(4, 4);

    let path = AStar::new()
        .find_path(&grid, start, goal)
        .into_path()
        .expect("path should exist");

    assert_eq!(start.chebyshev(goal), 4);
    assert_eq!(path.len(), 4);
    assert_eq!(
        path.positions,
        vec![
            Position::new(0, 0),
            Position::new(1, 1),
            Position::new(2, 2),
            Position::new(3, 3),
            Position::new(4, 4),
        ]
    );
}

#[test]
fn astar_routes_around_a_wall_with_a_gap() {
    let mut grid = NavGrid::new(5, 5);
    for y in 0..5 {
        if y == 2 {
            continue;
        }
        grid.set_blocked(Position::new(2, y), true);
    }

    let path = AStar::new()
        .find_path(&grid, Position::new(0, 0), Position::new(4, 4))
        .into_path()
        .expect("path should exist");

    assert!(path.positions.contains(&Position::new(2, 2)));
    assert!(path.positions.iter().all(|p| !grid.is_mountain(*p)));
    for pair in path.positions.windows(2) {
        assert!(pair[0].is_adjacent(pair[1]));
    }
}

#[test]
fn astar_reports_not_found_when_walled_off() {
    let mut grid = NavGrid::new(5, 5);
    for y in 0..5 {
        grid.set_blocked(Position::new(2, y), true);
    }
    let result = AStar::new().find_path(&grid, Position::new(0, 0), Position::new(4, 4));
    assert_eq!(result, PathResult::NotFound);
}

/// 400x400 with a wall down the middle open only at the bottom row.
fn long_detour() -> NavGrid {
    let mut grid = NavGrid::new(400, 400);
    for y in 0..399 {
        grid.set_blocked(Position::new(200, y), true);
    }
    grid
}

#[test]
fn astar_default_searches_large_maps_to_the_end() {
    let grid = long_detour();
    let (result, stats) =
        AStar::new().find_path_with_stats(&grid, Position::new(0, 0), Position::new(399, 0));

    assert!(stats.expansion_order.len() > 65_536);
    let path = result.into_path().expect("path through the gap");
    assert_eq!(path.len(), 798);
    assert!(path.positions.contains(&Position::new(200, 399)));
}

#[test]
fn astar_gives_up_at_an_explicit_expansion_cap() {
    let grid = long_detour();
    let capped = AStar::new().with_config(AStarConfig {
        max_expansions: Some(1_000),
    });
    let (result, stats) =
        capped.find_path_with_stats(&grid, Position::new(0, 0), Position::new(399, 0));

    assert_eq!(result, PathResult::NotFound);
    assert_eq!(stats.expansion_order.len(), 1_000);
}

#[test]
fn astar_never_reexpands_a_closed_position() {
    let mut grid = NavGrid::new(12, 12);
    for y in 0..11 {
        grid.set_blocked(Position::new(6, y), true);
    }
    for x in 2..10 {
        grid.set_blocked(Position::new(x, 3), true);
    }

    let (result, stats) =
        AStar::new().find_path_with_stats(&grid, Position::new(1, 1), Position::new(10, 1));
    assert!(result.is_found());

    let unique: HashSet<Position> = stats.expansion_order.iter().copied().collect();
    assert_eq!(unique.len(), stats.expansion_order.len());
    for pair in stats.closed_sizes.windows(2) {
        assert!(pair[1] > pair[0], "closed set must only grow");
    }
}

#[test]
fn astar_is_deterministic_for_same_input() {
    let mut grid = NavGrid::new(10, 10);
    for y in 0..10 {
        grid.set_blocked(Position::new(5, y), true);
    }
    grid.set_blocked(Position::new(5, 5), false);

    let a = AStar::new().find_path(&grid, Position::new(1, 1), Position::new(8, 8));
    let b = AStar::new().find_path(&grid, Position::new(1, 1), Position::new(8, 8));
    assert_eq!(a, b);
}

proptest! {
    #[test]
    fn open_grid_path_length_equals_chebyshev(
        w in 1u32..16,
        h in 1u32..16,
        sx in 0i32..16, sy in 0i32..16,
        gx in 0i32..16, gy in 0i32..16,
    ) {
        let start = Position::new(sx % w as i32, sy % h as i32);
        let goal = Position::new(gx % w as i32, gy % h as i32);
        let grid = NavGrid::new(w, h);

        let path = AStar::new().find_path(&grid, start, goal).into_path();
        prop_assert!(path.is_some());
        let path = path.unwrap();
        prop_assert_eq!(path.len() as u32, start.chebyshev(goal));
        prop_assert_eq!(path.start(), Some(start));
        prop_assert_eq!(path.goal(), Some(goal));
    }
}
