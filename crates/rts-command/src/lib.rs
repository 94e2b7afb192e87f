//! Command queues: the hand-off point between planning and dispatch.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod queue;

pub use queue::{CommandQueue, DispatchReport, QueueDirective};
