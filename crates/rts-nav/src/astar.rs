use std::collections::{BTreeSet, HashMap, HashSet};

use rts_core::Position;

use crate::{Passability, Path, PathNode, PathResult};

/// Ordering key of an open-set entry: f first, then h, then insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenKey {
    f: u32,
    h: u32,
    tie: u64,
    idx: usize,
}

/// Search limits. The default is unbounded: the closed set can never outgrow the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AStarConfig {
    /// Closed-set insertions before giving up with `NotFound`. `None` searches the whole grid.
    pub max_expansions: Option<usize>,
}

/// Per-search counters, mostly for tests and benches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions in the order they were closed.
    pub expansion_order: Vec<Position>,
    /// Closed-set size after each expansion.
    pub closed_sizes: Vec<usize>,
    /// Number of decrease-key operations (remove + reinsert).
    pub reopened: usize,
}

/// A* over an 8-connected grid with unit step cost and a Chebyshev heuristic.
///
/// Unexplored tiles are passable by default since their true cost is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStar {
    config: AStarConfig,
}

impl AStar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: AStarConfig) -> Self {
        self.config = config;
        self
    }

    fn heuristic(a: Position, b: Position) -> u32 {
        a.chebyshev(b)
    }

    fn is_passable<P: Passability + ?Sized>(grid: &P, pos: Position) -> bool {
        if !grid.in_bounds(pos) {
            return false;
        }
        !grid.is_explored(pos) || grid.is_movement_possible(pos)
    }

    pub fn find_path<P: Passability + ?Sized>(
        &self,
        grid: &P,
        start: Position,
        goal: Position,
    ) -> PathResult {
        self.find_path_with_stats(grid, start, goal).0
    }

    pub fn find_path_with_stats<P: Passability + ?Sized>(
        &self,
        grid: &P,
        start: Position,
        goal: Position,
    ) -> (PathResult, SearchStats) {
        let mut stats = SearchStats::default();
        if !grid.in_bounds(start) || !grid.in_bounds(goal) {
            return (PathResult::NotFound, stats);
        }
        if start == goal {
            return (PathResult::Found(Path::new(vec![start])), stats);
        }

        let mut nodes: Vec<PathNode> = Vec::new();
        let mut open = BTreeSet::<OpenKey>::new();
        let mut open_index: HashMap<Position, OpenKey> = HashMap::new();
        let mut closed: HashSet<Position> = HashSet::new();
        let mut tie: u64 = 0;

        let h0 = Self::heuristic(start, goal);
        nodes.push(PathNode::new(start, 0, h0, None));
        let key = OpenKey {
            f: h0,
            h: h0,
            tie,
            idx: 0,
        };
        open.insert(key);
        open_index.insert(start, key);
        tie += 1;

        while let Some(key) = open.pop_first() {
            let node = nodes[key.idx];
            open_index.remove(&node.pos);
            debug_assert_eq!(open.len(), open_index.len());

            closed.insert(node.pos);
            stats.expansion_order.push(node.pos);
            stats.closed_sizes.push(closed.len());

            if node.pos == goal {
                return (PathResult::Found(Path::from_chain(&nodes, key.idx)), stats);
            }
            if self
                .config
                .max_expansions
                .is_some_and(|max| closed.len() >= max)
            {
                break;
            }

            for next in node.pos.neighbors() {
                if closed.contains(&next) || !Self::is_passable(grid, next) {
                    continue;
                }

                let tentative_g = node.g.saturating_add(1);
                match open_index.get(&next).copied() {
                    Some(existing) => {
                        if tentative_g >= nodes[existing.idx].g {
                            continue;
                        }
                        // Decrease-key: drop the stale entry and reinsert with the cheaper route.
                        open.remove(&existing);
                        let h = nodes[existing.idx].h;
                        nodes[existing.idx] = PathNode::new(next, tentative_g, h, Some(key.idx));
                        let updated = OpenKey {
                            f: nodes[existing.idx].f,
                            h,
                            tie,
                            idx: existing.idx,
                        };
                        open.insert(updated);
                        open_index.insert(next, updated);
                        stats.reopened += 1;
                    }
                    None => {
                        let h = Self::heuristic(next, goal);
                        let idx = nodes.len();
                        nodes.push(PathNode::new(next, tentative_g, h, Some(key.idx)));
                        let entry = OpenKey {
                            f: nodes[idx].f,
                            h,
                            tie,
                            idx,
                        };
                        open.insert(entry);
                        open_index.insert(next, entry);
                    }
                }
                tie += 1;
            }
        }

        (PathResult::NotFound, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NavGrid;

    #[test]
    fn open_keys_order_by_f_then_h() {
        let a = OpenKey {
            f: 4,
            h: 1,
            tie: 9,
            idx: 0,
        };
        let b = OpenKey {
            f: 4,
            h: 2,
            tie: 0,
            idx: 1,
        };
        let c = OpenKey {
            f: 3,
            h: 3,
            tie: 5,
            idx: 2,
        };
        let set: BTreeSet<_> = [a, b, c].into_iter().collect();
        let order: Vec<usize> = set.iter().map(|k| k.idx).collect();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn unexplored_tiles_are_passable() {
        let mut grid = NavGrid::new(3, 1);
        grid.set_blocked(Position::new(1, 0), true);
        grid.set_explored(Position::new(1, 0), false);
        let result = AStar::new().find_path(&grid, Position::new(0, 0), Position::new(2, 0));
        assert_eq!(result.path().map(Path::len), Some(2));
    }
}
