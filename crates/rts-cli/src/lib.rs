//! Headless self-play: one [`rts_mcts::Planner`] per player on a generated sandbox map.

#![forbid(unsafe_code)]

pub mod selfplay;

pub use selfplay::{
    run_batch, run_selfplay, BatchResult, GameOutcome, PlayerStats, SelfPlayConfig,
    SelfPlayResult,
};
