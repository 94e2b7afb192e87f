#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{PlayerId, Position, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnitKind {
    #[default]
    Infantry,
    Cavalry,
    Artillery,
}

impl UnitKind {
    pub const ALL: [UnitKind; 3] = [UnitKind::Infantry, UnitKind::Cavalry, UnitKind::Artillery];
}

/// Read-only view of a live unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitInfo {
    pub id: UnitId,
    pub owner: PlayerId,
    pub kind: UnitKind,
    pub position: Position,
    pub hp: i32,
    /// Movement speed in tiles per second.
    pub speed: f64,
}

/// Read-only view of a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CityInfo {
    pub position: Position,
    pub owner: Option<PlayerId>,
    pub producing: Option<UnitKind>,
    /// Starting cities are public knowledge: every player knows where they are.
    pub is_start: bool,
}

impl CityInfo {
    pub fn is_idle(&self) -> bool {
        self.producing.is_none()
    }

    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }
}
