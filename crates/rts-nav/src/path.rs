use rts_core::Position;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Passability;

/// Search node: position plus costs and a back-reference into the search's node slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathNode {
    pub pos: Position,
    /// Cost from the start.
    pub g: u32,
    /// Heuristic estimate to the goal.
    pub h: u32,
    pub f: u32,
    pub parent: Option<usize>,
}

impl PathNode {
    pub fn new(pos: Position, g: u32, h: u32, parent: Option<usize>) -> Self {
        Self {
            pos,
            g,
            h,
            f: g.saturating_add(h),
            parent,
        }
    }
}

/// A path from start to goal, start first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    pub positions: Vec<Position>,
}

impl Path {
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    /// Walk the parent chain from `goal_idx` back to the start and return it start-first.
    pub fn from_chain(nodes: &[PathNode], goal_idx: usize) -> Self {
        let mut positions = Vec::new();
        let mut current = Some(goal_idx);
        while let Some(idx) = current {
            positions.push(nodes[idx].pos);
            current = nodes[idx].parent;
        }
        positions.reverse();
        Self { positions }
    }

    pub fn start(&self) -> Option<Position> {
        self.positions.first().copied()
    }

    pub fn goal(&self) -> Option<Position> {
        self.positions.last().copied()
    }

    /// Number of moves (tiles entered).
    pub fn len(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tiles to enter, closest first. The start tile is excluded.
    pub fn steps(&self) -> &[Position] {
        self.positions.get(1..).unwrap_or(&[])
    }

    /// Truncate the path at the first tile outside current vision.
    ///
    /// Orders for unseen tiles cannot be validated yet. The start tile is always kept.
    pub fn visible_prefix<P: Passability + ?Sized>(&self, grid: &P) -> Path {
        let mut positions = Vec::with_capacity(self.positions.len());
        for (i, pos) in self.positions.iter().enumerate() {
            if i > 0 && !grid.is_visible(*pos) {
                break;
            }
            positions.push(*pos);
        }
        Path { positions }
    }
}

/// Outcome of a path search. `NotFound` is an expected result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResult {
    Found(Path),
    NotFound,
}

impl PathResult {
    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            PathResult::Found(path) => Some(path),
            PathResult::NotFound => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            PathResult::Found(path) => Some(path),
            PathResult::NotFound => None,
        }
    }
}
