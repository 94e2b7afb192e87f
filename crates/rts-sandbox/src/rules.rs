use rts_core::UnitKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitStats {
    pub hp: i32,
    /// Damage dealt per hit.
    pub attack: i32,
    /// Tiles per second.
    pub speed: f64,
    pub production_ms: u64,
}

impl UnitStats {
    /// Time needed to step onto an adjacent tile.
    pub fn step_ms(&self) -> u64 {
        if self.speed <= 0.0 {
            return u64::MAX;
        }
        (1000.0 / self.speed).round() as u64
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SandboxRules {
    /// Chebyshev radius around units and owned cities.
    pub vision_radius: u32,
    pub attack_interval_ms: u64,
    /// When set, the game ends at this clock value and the player with the most cities wins.
    pub time_limit_ms: Option<u64>,
    pub infantry: UnitStats,
    pub cavalry: UnitStats,
    pub artillery: UnitStats,
}

impl Default for SandboxRules {
    fn default() -> Self {
        Self {
            vision_radius: 2,
            attack_interval_ms: 1000,
            time_limit_ms: None,
            infantry: UnitStats {
                hp: 10,
                attack: 3,
                speed: 1.0,
                production_ms: 3000,
            },
            cavalry: UnitStats {
                hp: 8,
                attack: 3,
                speed: 2.0,
                production_ms: 4000,
            },
            artillery: UnitStats {
                hp: 6,
                attack: 5,
                speed: 0.5,
                production_ms: 5000,
            },
        }
    }
}

impl SandboxRules {
    pub fn stats(&self, kind: UnitKind) -> &UnitStats {
        match kind {
            UnitKind::Infantry => &self.infantry,
            UnitKind::Cavalry => &self.cavalry,
            UnitKind::Artillery => &self.artillery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_time_follows_speed() {
        let rules = SandboxRules::default();
        assert_eq!(rules.stats(UnitKind::Infantry).step_ms(), 1000);
        assert_eq!(rules.stats(UnitKind::Cavalry).step_ms(), 500);
        assert_eq!(rules.stats(UnitKind::Artillery).step_ms(), 2000);
    }
}
