use std::collections::{HashSet, VecDeque};

use rts_core::Position;

use crate::{Passability, Path, PathNode, PathResult};

/// Tiles a breadth-first search may step onto.
///
/// Undiscovered tiles are provisionally traversable as far as the engine's legality check
/// goes, but known-bad tiles (mountains, full tiles, enemy tiles) are always skipped.
fn is_traversable<P: Passability + ?Sized>(grid: &P, pos: Position) -> bool {
    if !grid.in_bounds(pos) || grid.is_mountain(pos) {
        return false;
    }
    if grid.remaining_capacity(pos) == 0 || grid.is_enemy_occupied(pos) {
        return false;
    }
    !grid.is_explored(pos) || grid.is_movement_possible(pos)
}

/// First path found from `start` to `goal`, shortest in hop count.
pub fn bfs_path<P: Passability + ?Sized>(grid: &P, start: Position, goal: Position) -> PathResult {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return PathResult::NotFound;
    }
    if start == goal {
        return PathResult::Found(Path::new(vec![start]));
    }

    let mut nodes = vec![PathNode::new(start, 0, 0, None)];
    let mut discovered: HashSet<Position> = HashSet::from([start]);
    let mut queue = VecDeque::from([0usize]);

    while let Some(idx) = queue.pop_front() {
        let node = nodes[idx];
        for next in node.pos.neighbors() {
            if discovered.contains(&next) || !is_traversable(grid, next) {
                continue;
            }
            discovered.insert(next);
            let next_idx = nodes.len();
            nodes.push(PathNode::new(next, node.g + 1, 0, Some(idx)));
            if next == goal {
                return PathResult::Found(Path::from_chain(&nodes, next_idx));
            }
            queue.push_back(next_idx);
        }
    }

    PathResult::NotFound
}

/// Flood-fill from `start` and return up to `limit` reachable unexplored tiles, nearest first.
pub fn bfs_flood<P: Passability + ?Sized>(grid: &P, start: Position, limit: usize) -> Vec<Position> {
    let mut out = Vec::new();
    if !grid.in_bounds(start) || limit == 0 {
        return out;
    }

    let mut discovered: HashSet<Position> = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(pos) = queue.pop_front() {
        for next in pos.neighbors() {
            if discovered.contains(&next) || !is_traversable(grid, next) {
                continue;
            }
            discovered.insert(next);
            if !grid.is_explored(next) {
                out.push(next);
                if out.len() >= limit {
                    return out;
                }
            }
            queue.push_back(next);
        }
    }

    out
}
