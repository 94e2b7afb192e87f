//! Grid path planning over a partially explored map.
//!
//! Two searches share one [`Passability`] view of the board:
//! - [`AStar`]: optimal 8-directional paths with a Chebyshev heuristic.
//! - [`bfs_path`] / [`bfs_flood`]: "any reachable path" searches that treat undiscovered
//!   tiles as provisionally traversable.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod astar;
pub mod bfs;
pub mod grid;
pub mod path;

pub use astar::{AStar, AStarConfig, SearchStats};
pub use bfs::{bfs_flood, bfs_path};
pub use grid::{EnginePassability, NavGrid, Passability};
pub use path::{Path, PathNode, PathResult};
