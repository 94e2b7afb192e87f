//! A small discrete-event RTS used by tests, benches and self-play.
//!
//! The rules here are deliberately simple. The planner only ever talks to this crate through
//! [`rts_core::Engine`], so any real engine can take its place.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod engine;
pub mod event;
pub mod mapgen;
pub mod rules;

pub use engine::SandboxEngine;
pub use event::{EventKind, EventQueue};
pub use mapgen::{generate, start_positions, MapConfig};
pub use rules::{SandboxRules, UnitStats};
