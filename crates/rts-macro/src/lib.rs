//! Macro actions.
//!
//! A [`MacroAction`] is a player intent (explore, expand, attack, build, move, wait). Each variant
//! decides *who* and *where* in its `generate` step and turns that into primitive
//! [`rts_core::Order`]s in its `resolve` step. Resolution is lazy and cached.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod attack;
pub mod build;
pub mod context;
pub mod error;
pub mod expansion;
pub mod exploration;
pub mod legal;
pub mod movement;
pub mod wait;

pub use action::{Command, MacroAction, MacroKind};
pub use attack::{AttackAction, AttackOutcome};
pub use build::BuildAction;
pub use context::{free_units, idle_cities, is_unit_free, MacroContext};
pub use error::Infeasible;
pub use expansion::{ExpansionAction, ExpansionStep};
pub use exploration::{ExplorationAction, DEFAULT_FLOOD_LIMIT};
pub use legal::{generate_executable, legal_actions, MAX_CANDIDATES_PER_KIND};
pub use movement::MoveAction;
pub use wait::WaitAction;
