use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Offsets of the 8 neighbours, in a fixed order for determinism: N, NE, E, SE, S, SW, W, NW.
    pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
        (0, -1),
        (1, -1),
        (1, 0),
        (1, 1),
        (0, 1),
        (-1, 1),
        (-1, 0),
        (-1, -1),
    ];

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// `max(|dx|, |dy|)`: the number of 8-directional steps between two cells.
    #[inline]
    pub fn chebyshev(self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    #[inline]
    pub fn euclidean(self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn neighbors(self) -> [Position; 8] {
        Self::NEIGHBOR_OFFSETS.map(|(dx, dy)| self.offset(dx, dy))
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        self != other && self.chebyshev(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_takes_the_larger_axis() {
        let a = Position::new(0, 0);
        assert_eq!(a.chebyshev(Position::new(4, 4)), 4);
        assert_eq!(a.chebyshev(Position::new(-3, 1)), 3);
        assert_eq!(a.chebyshev(a), 0);
    }

    #[test]
    fn neighbors_are_all_adjacent_and_distinct() {
        let p = Position::new(5, 5);
        let n = p.neighbors();
        for (i, a) in n.iter().enumerate() {
            assert!(p.is_adjacent(*a));
            for b in &n[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
