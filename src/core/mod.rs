//! Core types for the chinese-wall library.
//!
//! - [`types`] - Labels (`Firm`, `ConflictClass`, `SecurityLabel`), `AccessKind` and `EpochId`
//! - [`matrix`] - The subject-by-object access history
//! - [`error`] - Structured error types

pub mod error;
pub mod matrix;
pub mod types;

pub use error::{IndexKind, WallError, WallResult};
pub use matrix::{AccessMatrix, MAX_CELLS};
pub use types::{AccessKind, ConflictClass, EpochId, Firm, SecurityLabel};
