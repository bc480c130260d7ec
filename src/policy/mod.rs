//! Chinese Wall policy engine.
//!
//! The engine keeps each subject's access history for the current epoch and
//! decides `read` and `write` requests against the firms and conflict classes
//! of the objects involved.

mod decision;
mod engine;

pub use decision::{AccessDecision, DecisionReason};
pub use engine::ChineseWallEngine;
