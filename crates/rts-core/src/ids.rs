use core::fmt::{self, Debug};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier with a stable numeric form.
///
/// Deterministic search requires:
/// - stable ordering (`Ord`)
/// - a stable numeric ID (`stable_id`) for seeding and logs
pub trait StableId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

/// Player index. Players are numbered densely from zero, so the index doubles as the slot in
/// per-player vectors (utility, win counters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl StableId for PlayerId {
    fn stable_id(self) -> u64 {
        self.0 as u64
    }
}

/// Engine-assigned unit identifier. Never reused within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}

impl StableId for UnitId {
    fn stable_id(self) -> u64 {
        self.0 as u64
    }
}

impl StableId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}
