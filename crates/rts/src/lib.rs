//! Umbrella crate that re-exports the `rts-*` planning crates.
//!
//! This crate is intended as a convenient entrypoint for users and as a home for docs.rs guides.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use rts_core as core;

#[cfg(feature = "nav")]
#[cfg_attr(docsrs, doc(cfg(feature = "nav")))]
pub use rts_nav as nav;

#[cfg(feature = "fog")]
#[cfg_attr(docsrs, doc(cfg(feature = "fog")))]
pub use rts_fog as fog;

#[cfg(feature = "command")]
#[cfg_attr(docsrs, doc(cfg(feature = "command")))]
pub use rts_command as command;

#[cfg(feature = "macro")]
#[cfg_attr(docsrs, doc(cfg(feature = "macro")))]
pub use rts_macro as macros;

#[cfg(feature = "mcts")]
#[cfg_attr(docsrs, doc(cfg(feature = "mcts")))]
pub use rts_mcts as mcts;

#[cfg(feature = "sandbox")]
#[cfg_attr(docsrs, doc(cfg(feature = "sandbox")))]
pub use rts_sandbox as sandbox;

#[cfg(doc)]
pub mod guides {
    #![allow(clippy::all)]

    #[doc = include_str!("../../../docs/guides/planning-cycle.md")]
    pub mod planning_cycle {}
}
