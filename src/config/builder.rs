//! Validating builder for `ChineseWallEngine`.

use crate::core::{AccessMatrix, ConflictClass, Firm, WallError, WallResult};
use crate::policy::ChineseWallEngine;

use std::collections::BTreeSet;

/// Builder for creating an initialised `ChineseWallEngine`.
///
/// Nothing is checked until [`build`](Self::build); a build either yields a
/// fully labelled engine or an `InvalidCommandSyntax` error, never a
/// partially configured engine.
#[derive(Debug, Clone)]
pub struct WallBuilder {
    subjects: usize,
    objects: usize,
    firms: usize,
    portfolios: Vec<(String, Vec<usize>)>,
    conflicts: Vec<(String, String)>,
}

impl WallBuilder {
    /// Creates a builder for the given subject, object and firm counts.
    pub fn new(subjects: usize, objects: usize, firms: usize) -> Self {
        Self {
            subjects,
            objects,
            firms,
            portfolios: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    /// Declares a firm and the objects it owns.
    ///
    /// Declaring the same firm twice extends its portfolio. An object listed
    /// under two firms ends up owned by the later one.
    pub fn portfolio(
        mut self,
        firm: impl Into<String>,
        objects: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.portfolios
            .push((firm.into(), objects.into_iter().collect()));
        self
    }

    /// Assigns a conflict class to a declared firm.
    pub fn conflict(mut self, firm: impl Into<String>, class: impl Into<String>) -> Self {
        self.conflicts.push((firm.into(), class.into()));
        self
    }

    /// Validates the configuration and builds the engine.
    pub fn build(self) -> WallResult<ChineseWallEngine> {
        for (what, count) in [
            ("subjects", self.subjects),
            ("objects", self.objects),
            ("firms", self.firms),
        ] {
            if count == 0 {
                return Err(WallError::syntax(format!(
                    "number of {what} must be at least 1"
                )));
            }
        }
        AccessMatrix::checked_size(self.subjects, self.objects)?;

        let mut assignments = Vec::new();
        let mut declared = BTreeSet::new();
        for (name, objects) in &self.portfolios {
            let firm = Firm::parse(name)?;
            for &object in objects {
                if object >= self.objects {
                    return Err(WallError::syntax(format!(
                        "portfolio of firm '{firm}' lists object {object}, but only {} objects exist",
                        self.objects
                    )));
                }
                assignments.push((object, firm.clone()));
            }
            declared.insert(firm);
        }

        if declared.len() > self.firms {
            return Err(WallError::syntax(format!(
                "{} firms declared, but the number of firms is {}",
                declared.len(),
                self.firms
            )));
        }

        let mut conflicts = Vec::with_capacity(self.conflicts.len());
        for (name, class) in &self.conflicts {
            let firm = Firm::parse(name)?;
            if !declared.contains(&firm) {
                return Err(WallError::syntax(format!(
                    "conflict class assigned to undeclared firm '{firm}'"
                )));
            }
            conflicts.push((firm, ConflictClass::parse(class)?));
        }

        let mut engine = ChineseWallEngine::new(self.subjects, self.objects, self.firms);
        for (object, firm) in assignments {
            if let Some(previous) = engine.firm(object)? {
                if previous != &firm {
                    tracing::warn!(
                        object,
                        previous_firm = %previous,
                        firm = %firm,
                        "Object listed in two portfolios; keeping the later firm"
                    );
                }
            }
            engine.add_object(object, firm)?;
        }
        for (firm, class) in conflicts {
            engine.set_conflict(firm, class);
        }

        tracing::debug!(
            subjects = self.subjects,
            objects = self.objects,
            firms = self.firms,
            unassigned = engine.unassigned_object_count(),
            "Chinese wall engine configured"
        );
        Ok(engine)
    }
}
