//! Engine configuration.
//!
//! An engine can be configured three ways, all ending in [`WallBuilder`]:
//!
//! - programmatically through [`WallBuilder`],
//! - from a TOML document through [`WallConfig`],
//! - interactively through [`SetupSession`].

mod builder;
mod setup;

pub use builder::WallBuilder;
pub use setup::SetupSession;

use crate::core::{WallError, WallResult};
use crate::policy::ChineseWallEngine;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A firm's portfolio and optional conflict class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Firm label.
    pub firm: String,

    /// Objects owned by the firm.
    #[serde(default)]
    pub objects: Vec<usize>,

    /// Conflict-of-interest class of the firm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict: Option<String>,
}

/// Serializable engine configuration.
///
/// ```toml
/// subjects = 2
/// objects = 3
/// firms = 2
///
/// [[portfolio]]
/// firm = "A"
/// objects = [0, 2]
/// conflict = "X"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallConfig {
    /// Number of subjects.
    pub subjects: usize,

    /// Number of objects.
    pub objects: usize,

    /// Number of firms.
    pub firms: usize,

    /// Firm portfolios.
    #[serde(default, rename = "portfolio")]
    pub portfolios: Vec<PortfolioConfig>,
}

impl WallConfig {
    /// Parses a configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> WallResult<Self> {
        toml::from_str(contents)
            .map_err(|e| WallError::configuration(format!("invalid configuration: {e}")))
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: &Path) -> WallResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            WallError::configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "Loading configuration");
        Self::from_toml_str(&contents)
    }

    /// Serializes the configuration to TOML.
    pub fn to_toml_string(&self) -> WallResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| WallError::configuration(format!("failed to serialize: {e}")))
    }

    /// Converts the configuration into a builder.
    pub fn into_builder(self) -> WallBuilder {
        let mut builder = WallBuilder::new(self.subjects, self.objects, self.firms);
        let mut conflicts = Vec::new();
        for portfolio in self.portfolios {
            if let Some(class) = portfolio.conflict {
                conflicts.push((portfolio.firm.clone(), class));
            }
            builder = builder.portfolio(portfolio.firm, portfolio.objects);
        }
        for (firm, class) in conflicts {
            builder = builder.conflict(firm, class);
        }
        builder
    }

    /// Validates the configuration and builds the engine.
    pub fn build(self) -> WallResult<ChineseWallEngine> {
        self.into_builder().build()
    }
}
