//! Error types for the chinese-wall library.
//!
//! Policy refusals are not errors: a refused `read` or `write` is a normal
//! outcome reported through [`AccessDecision`](crate::policy::AccessDecision).
//! The variants here cover precondition violations and unusable input.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which kind of index was out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// A subject index.
    Subject,
    /// An object index.
    Object,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subject => write!(f, "subject"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// The main error type for engine, configuration and dispatcher operations.
#[derive(Debug, Error)]
pub enum WallError {
    /// A subject or object index lies outside the declared bounds.
    #[error("invalid {kind} index {index}: expected a value below {bound}")]
    InvalidIndex {
        /// Whether the index names a subject or an object.
        kind: IndexKind,
        /// The offending index.
        index: usize,
        /// Number of subjects or objects declared for the engine.
        bound: usize,
    },

    /// Malformed input at the command or setup boundary.
    #[error("invalid syntax: {message}")]
    InvalidCommandSyntax {
        /// Description of what is wrong with the input.
        message: String,
    },

    /// The configuration source cannot produce an engine at all.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WallError {
    /// Returns `true` if the error was caused by the caller's input and the
    /// session can continue after reporting it.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidIndex { .. } | Self::InvalidCommandSyntax { .. }
        )
    }

    /// Creates an `InvalidIndex` error for a subject.
    pub fn invalid_subject(index: usize, bound: usize) -> Self {
        Self::InvalidIndex {
            kind: IndexKind::Subject,
            index,
            bound,
        }
    }

    /// Creates an `InvalidIndex` error for an object.
    pub fn invalid_object(index: usize, bound: usize) -> Self {
        Self::InvalidIndex {
            kind: IndexKind::Object,
            index,
            bound,
        }
    }

    /// Creates an `InvalidCommandSyntax` error.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::InvalidCommandSyntax {
            message: message.into(),
        }
    }

    /// Creates a `Configuration` error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// A specialized `Result` type for chinese-wall operations.
pub type WallResult<T> = Result<T, WallError>;
