//! Deadline-bounded Monte-Carlo tree search over macro actions.
//!
//! A planning cycle determinizes the observed state, grows a search tree of macro actions on
//! cloned engine states until the wall-clock deadline, and commits the best root action to the
//! live command queue. [`Planner`] wraps the whole cycle; [`Mcts`] is the search on its own.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod heuristic;
pub mod node;
pub mod planner;
pub mod search;
pub mod tree;

pub use config::{ConfigError, PlannerConfig, SearchConfig};
pub use context::CycleContext;
pub use heuristic::{score, HeuristicWeights, ScoreWindow};
pub use node::{NodeId, SearchNode};
pub use planner::{Decision, Planner};
pub use search::{holds_majority, outcome, CycleStats, Mcts, SearchResult};
pub use tree::SearchTree;
