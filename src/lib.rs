//! # Chinese Wall
//!
//! An in-process access-control engine implementing the Brewer-Nash
//! "Chinese Wall" policy.
//!
//! ## Overview
//!
//! Objects belong to firms, and firms belong to conflict-of-interest classes.
//! The engine remembers which objects each subject accessed during the current
//! epoch and refuses any access that would give a subject data of two
//! competing firms in the same class. Subjects may always:
//!
//! - access anything as their first access of an epoch,
//! - re-access objects they already hold,
//! - access more objects of a firm they already hold data from.
//!
//! ## Quick Start
//!
//! ```rust
//! use chinese_wall::prelude::*;
//!
//! let mut engine = WallBuilder::new(2, 3, 2)
//!     .portfolio("A", [0, 2])
//!     .portfolio("B", [1])
//!     .conflict("A", "X")
//!     .conflict("B", "X")
//!     .build()
//!     .unwrap();
//!
//! assert!(engine.read(0, 0).unwrap());
//! assert!(!engine.read(0, 1).unwrap());
//! assert!(engine.read(0, 2).unwrap());
//!
//! engine.start();
//! assert!(engine.read(0, 1).unwrap());
//! ```
//!
//! ## Architecture
//!
//! - **Core**: Labels, the access matrix and error handling
//! - **Policy**: The `ChineseWallEngine` and its decisions
//! - **Config**: Builder, TOML configuration and interactive setup
//! - **Dispatcher**: Textual command protocol on top of the engine
//! - **Audit**: Structured logging of decisions and label changes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod audit;
pub mod config;
pub mod core;
pub mod dispatcher;
pub mod policy;

// Re-export commonly used types at the crate root
pub use crate::core::{
    AccessKind, ConflictClass, EpochId, Firm, IndexKind, SecurityLabel, WallError, WallResult,
};

pub use crate::config::{SetupSession, WallBuilder, WallConfig};
pub use crate::dispatcher::{Command, Dispatcher, Reply};
pub use crate::policy::{AccessDecision, ChineseWallEngine, DecisionReason};

/// Prelude module for convenient imports.
///
/// ```rust
/// use chinese_wall::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{SetupSession, WallBuilder, WallConfig};
    pub use crate::core::{AccessKind, ConflictClass, Firm, SecurityLabel, WallError, WallResult};
    pub use crate::dispatcher::{Command, Dispatcher, Reply};
    pub use crate::policy::{AccessDecision, ChineseWallEngine, DecisionReason};
}
