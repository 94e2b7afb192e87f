//! State evaluation for search guidance.

use rts_core::{EngineView, PlayerId};
use serde::{Deserialize, Serialize};

/// Weights of the three terms of [`score`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Multiplier on the share of cities the player owns.
    pub city_ratio: f64,
    /// Multiplier on the player's living unit count.
    pub unit: f64,
    /// Multiplier on the share of the map the player has discovered.
    pub discovery: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            city_ratio: 10.0,
            unit: 1.0,
            discovery: 100.0,
        }
    }
}

/// Raw, unbounded score of `state` from `player`'s point of view.
pub fn score<E: EngineView + ?Sized>(
    state: &E,
    player: PlayerId,
    weights: &HeuristicWeights,
) -> f64 {
    let cities = state.cities();
    let city_ratio = if cities.is_empty() {
        0.0
    } else {
        let owned = cities.iter().filter(|c| c.is_owned_by(player)).count();
        owned as f64 / cities.len() as f64
    };

    let units = state.units_of(player).len() as f64;

    let positions = state.positions();
    let discovery = if positions.is_empty() {
        0.0
    } else {
        let discovered = positions
            .iter()
            .filter(|p| state.is_discovered(player, **p))
            .count();
        discovered as f64 / positions.len() as f64
    };

    city_ratio * weights.city_ratio + units * weights.unit + discovery * weights.discovery
}

/// Running min/max of raw scores seen during one planning cycle.
///
/// Normalized values are only comparable within one window; call [`ScoreWindow::reset`] when a
/// new cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreWindow {
    bounds: Option<(f64, f64)>,
    samples: u64,
}

impl ScoreWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn min(&self) -> Option<f64> {
        self.bounds.map(|(min, _)| min)
    }

    pub fn max(&self) -> Option<f64> {
        self.bounds.map(|(_, max)| max)
    }

    /// Widen the window with `raw` and return it normalized against the new bounds.
    pub fn observe(&mut self, raw: f64) -> f64 {
        self.samples += 1;
        self.bounds = Some(match self.bounds {
            None => (raw, raw),
            Some((min, max)) => (min.min(raw), max.max(raw)),
        });
        self.normalize(raw)
    }

    /// `(raw - min) / (max - min)` clamped to `[0, 1]`; 0.5 while the range is empty.
    pub fn normalize(&self, raw: f64) -> f64 {
        match self.bounds {
            Some((min, max)) if max > min => ((raw - min) / (max - min)).clamp(0.0, 1.0),
            _ => 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_is_half() {
        let mut window = ScoreWindow::new();
        assert_eq!(window.observe(42.0), 0.5);
        assert_eq!(window.observe(42.0), 0.5);
        assert_eq!(window.observe(44.0), 1.0);
        assert_eq!(window.normalize(43.0), 0.5);
    }
}
