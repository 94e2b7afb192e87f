#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TileKind {
    #[default]
    Plain,
    Forest,
    Mountain,
    City,
}

/// One board cell as the engine reports it.
///
/// `capacity` is the maximum number of units that may stand on the tile at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tile {
    pub kind: TileKind,
    pub capacity: u8,
}

impl Tile {
    pub const PLAIN_CAPACITY: u8 = 2;
    pub const CITY_CAPACITY: u8 = 4;

    pub const fn new(kind: TileKind, capacity: u8) -> Self {
        Self { kind, capacity }
    }

    pub const fn plain() -> Self {
        Self::new(TileKind::Plain, Self::PLAIN_CAPACITY)
    }

    pub const fn forest() -> Self {
        Self::new(TileKind::Forest, Self::PLAIN_CAPACITY)
    }

    pub const fn mountain() -> Self {
        Self::new(TileKind::Mountain, 0)
    }

    pub const fn city() -> Self {
        Self::new(TileKind::City, Self::CITY_CAPACITY)
    }

    /// Default tile for a given kind.
    pub const fn of_kind(kind: TileKind) -> Self {
        match kind {
            TileKind::Plain => Self::plain(),
            TileKind::Forest => Self::forest(),
            TileKind::Mountain => Self::mountain(),
            TileKind::City => Self::city(),
        }
    }

    pub fn is_mountain(&self) -> bool {
        self.kind == TileKind::Mountain
    }

    pub fn is_city(&self) -> bool {
        self.kind == TileKind::City
    }

    pub fn is_passable(&self) -> bool {
        !self.is_mountain() && self.capacity > 0
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::plain()
    }
}
