//! Fog-of-war determinization.
//!
//! Turns a partially observed state into one concrete world: unknown tiles are sampled, and
//! enemies last seen somewhere are placed where they could plausibly be now.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod curve;
pub mod determinizer;
pub mod sightings;

pub use curve::{ControlPoint, DecayCurve};
pub use determinizer::{
    DeterminizedMap, Determinizer, DeterminizerConfig, FogObservation, Placement,
};
pub use sightings::{known_positions, LastSeen, SightingTracker};
