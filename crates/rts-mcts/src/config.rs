//! Search and planner configuration.

use std::path::Path;

use rts_core::DEFAULT_TICK_MS;
use rts_fog::DeterminizerConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::HeuristicWeights;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Parameters of one tree search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Simulated time each expansion and rollout step advances the state by.
    pub tick_ms: u64,

    /// Maximum rollout length, in ticks.
    pub rollout_depth: u32,

    /// UCB1 exploration constant.
    pub exploration: f64,

    /// Global seed; per-cycle streams are derived from it.
    pub seed: u64,

    /// Stop after this many completed simulations even if time remains.
    pub max_iterations: Option<u32>,

    /// Draw a fresh determinization for every rollout instead of one per cycle.
    pub redeterminize_rollouts: bool,

    /// Let the other players act at random during rollouts.
    pub rollout_opponents: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            rollout_depth: 20,
            exploration: std::f64::consts::SQRT_2,
            seed: 0,
            max_iterations: None,
            redeterminize_rollouts: false,
            rollout_opponents: true,
        }
    }
}

impl SearchConfig {
    /// Small, deterministic settings for tests.
    pub fn for_testing() -> Self {
        Self {
            rollout_depth: 4,
            max_iterations: Some(32),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = Some(n);
        self
    }

    pub fn with_redeterminize_rollouts(mut self, on: bool) -> Self {
        self.redeterminize_rollouts = on;
        self
    }

    pub fn with_rollout_opponents(mut self, on: bool) -> Self {
        self.rollout_opponents = on;
        self
    }
}

/// Everything a [`crate::Planner`] needs, loadable from one YAML file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub search: SearchConfig,
    pub determinizer: DeterminizerConfig,
    pub heuristic: HeuristicWeights,
}

impl PlannerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    /// Like [`PlannerConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.tick_ms, 1000);
        assert_eq!(config.rollout_depth, 20);
        assert!((config.exploration - 2f64.sqrt()).abs() < 1e-12);
        assert!(config.max_iterations.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::default()
            .with_seed(7)
            .with_rollout_depth(5)
            .with_max_iterations(10);
        assert_eq!(config.seed, 7);
        assert_eq!(config.rollout_depth, 5);
        assert_eq!(config.max_iterations, Some(10));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: PlannerConfig = serde_yaml::from_str("search:\n  rollout_depth: 3\n").unwrap();
        assert_eq!(config.search.rollout_depth, 3);
        assert_eq!(config.search.tick_ms, 1000);
        assert_eq!(config.heuristic, HeuristicWeights::default());
    }
}
