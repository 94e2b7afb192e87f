//! Shared data model and engine interface for the fog-of-war RTS planner.
//!
//! Every other `rts-*` crate talks to the game engine exclusively through the [`EngineView`]
//! and [`Engine`] traits defined here. The engine itself (movement, combat, production) is an
//! external collaborator.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod clock;
pub mod engine;
pub mod ids;
pub mod order;
pub mod position;
pub mod rng;
pub mod tile;
pub mod unit;

pub use clock::{Deadline, DEFAULT_TICK_MS};
pub use engine::{Engine, EngineError, EngineView};
pub use ids::{PlayerId, StableId, UnitId};
pub use order::{Actor, Order};
pub use position::Position;
pub use rng::{derive_seed, mix64, seeded_rng};
pub use tile::{Tile, TileKind};
pub use unit::{CityInfo, UnitInfo, UnitKind};
