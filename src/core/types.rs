//! Core types used throughout the chinese-wall library.
//!
//! This module defines the labels attached to objects (owning firm and
//! conflict-of-interest class) and the kinds of access a subject can request.

use crate::core::error::{WallError, WallResult};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Checks that a label is non-empty and contains no whitespace.
fn validate_label(what: &str, value: &str) -> WallResult<()> {
    if value.is_empty() {
        return Err(WallError::syntax(format!("{what} label must not be empty")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(WallError::syntax(format!(
            "{what} label '{value}' must not contain whitespace"
        )));
    }
    Ok(())
}

/// A firm owning a portfolio of objects.
///
/// Firms exist implicitly: a firm is known to the engine as soon as an
/// object is assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Firm(String);

impl Firm {
    /// Creates a firm label without validation.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parses a firm label from user input.
    ///
    /// Labels must be non-empty and contain no whitespace, so that they can
    /// be written as a single command token.
    pub fn parse(input: &str) -> WallResult<Self> {
        validate_label("firm", input)?;
        Ok(Self(input.to_string()))
    }

    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Firm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A conflict-of-interest class grouping competing firms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictClass(String);

impl ConflictClass {
    /// Creates a conflict class label without validation.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parses a conflict class label from user input.
    pub fn parse(input: &str) -> WallResult<Self> {
        validate_label("conflict class", input)?;
        Ok(Self(input.to_string()))
    }

    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConflictClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The security label of an object: its conflict class and owning firm.
///
/// Either component may be unset. The conflict class is the effective class
/// of the owning firm at the time the label was read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityLabel {
    /// Conflict-of-interest class, if the owning firm has one.
    pub conflict: Option<ConflictClass>,

    /// Owning firm, if the object has been assigned.
    pub firm: Option<Firm>,
}

impl SecurityLabel {
    /// Returns `true` if neither component is set.
    pub fn is_unset(&self) -> bool {
        self.conflict.is_none() && self.firm.is_none()
    }
}

impl fmt::Display for SecurityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conflict = self.conflict.as_ref().map_or("-", ConflictClass::as_str);
        let firm = self.firm.as_ref().map_or("-", Firm::as_str);
        write!(f, "({conflict}, {firm})")
    }
}

/// The kind of access a subject requests.
///
/// Reads and writes go through the same conflict-of-interest check; the kind
/// is carried for reporting and audit only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    /// Read access.
    Read,
    /// Write access.
    Write,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Random identifier of one epoch, used to correlate audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochId(Uuid);

impl EpochId {
    /// Generates a fresh epoch identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EpochId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EpochId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
