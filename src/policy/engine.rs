//! Chinese Wall policy engine implementation.

use crate::audit;
use crate::core::{
    AccessKind, AccessMatrix, ConflictClass, EpochId, Firm, SecurityLabel, WallResult,
};
use crate::policy::decision::{AccessDecision, DecisionReason};

use std::collections::{BTreeMap, BTreeSet};

/// Brewer-Nash access-control engine.
///
/// Tracks which subjects accessed which objects during the current epoch and
/// refuses any access that would give a subject data from two competing firms
/// in the same conflict-of-interest class.
///
/// Conflict classes are attached to firms. An object's effective class is
/// looked up through its current firm, so objects assigned to a firm after
/// [`set_conflict`](Self::set_conflict) inherit the firm's class.
///
/// # Examples
///
/// ```rust
/// use chinese_wall::{ChineseWallEngine, ConflictClass, Firm};
///
/// let mut engine = ChineseWallEngine::new(1, 2, 2);
/// engine.add_object(0, Firm::new("A")).unwrap();
/// engine.add_object(1, Firm::new("B")).unwrap();
/// engine.set_conflict(Firm::new("A"), ConflictClass::new("banks"));
/// engine.set_conflict(Firm::new("B"), ConflictClass::new("banks"));
///
/// assert!(engine.read(0, 0).unwrap());
/// assert!(!engine.read(0, 1).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ChineseWallEngine {
    /// Access history of the current epoch.
    matrix: AccessMatrix,

    /// Owning firm per object.
    owners: Vec<Option<Firm>>,

    /// Conflict class per firm.
    conflicts: BTreeMap<Firm, ConflictClass>,

    /// Number of firms declared at construction.
    firm_count: usize,

    /// Epoch number, starting at 1.
    epoch: u64,

    /// Identifier of the current epoch.
    epoch_id: EpochId,
}

impl ChineseWallEngine {
    /// Creates an engine for `subjects` subjects, `objects` objects and
    /// `firms` firms, with no labels and an empty history.
    ///
    /// The dimensions are not validated here; [`WallBuilder`](crate::WallBuilder)
    /// rejects matrices larger than [`MAX_CELLS`](crate::core::MAX_CELLS).
    pub fn new(subjects: usize, objects: usize, firms: usize) -> Self {
        Self {
            matrix: AccessMatrix::new(subjects, objects),
            owners: vec![None; objects],
            conflicts: BTreeMap::new(),
            firm_count: firms,
            epoch: 1,
            epoch_id: EpochId::new(),
        }
    }

    /// Begins a new epoch, clearing every subject's history.
    pub fn start(&mut self) {
        let cleared: usize = (0..self.matrix.subjects())
            .map(|subject| self.matrix.held_objects(subject).count())
            .sum();
        let previous = self.epoch_id;

        self.matrix.clear();
        self.epoch += 1;
        self.epoch_id = EpochId::new();

        audit::emit_epoch_started(previous, self.epoch_id, self.epoch, cleared);
    }

    /// Assigns `object` to `firm`, replacing any previous owner.
    pub fn add_object(&mut self, object: usize, firm: Firm) -> WallResult<()> {
        let object = self.matrix.check_object(object)?;
        audit::emit_object_assigned(self.epoch_id, object, &firm, self.owners[object].as_ref());
        self.owners[object] = Some(firm);
        Ok(())
    }

    /// Sets the conflict class of `firm`, replacing any previous class.
    pub fn set_conflict(&mut self, firm: Firm, conflict: ConflictClass) {
        let previous = self.conflicts.get(&firm).cloned();
        audit::emit_conflict_assigned(self.epoch_id, &firm, &conflict, previous.as_ref());
        self.conflicts.insert(firm, conflict);
    }

    /// Attempts a read. Returns `true` if access was granted.
    pub fn read(&mut self, subject: usize, object: usize) -> WallResult<bool> {
        Ok(self.access(subject, object, AccessKind::Read)?.is_granted())
    }

    /// Attempts a write. Returns `true` if access was granted.
    ///
    /// Writes are decided exactly like reads.
    pub fn write(&mut self, subject: usize, object: usize) -> WallResult<bool> {
        Ok(self.access(subject, object, AccessKind::Write)?.is_granted())
    }

    /// Evaluates an access request and records it on grant.
    pub fn access(
        &mut self,
        subject: usize,
        object: usize,
        kind: AccessKind,
    ) -> WallResult<AccessDecision> {
        let subject = self.matrix.check_subject(subject)?;
        let object = self.matrix.check_object(object)?;

        let reason = self.evaluate(subject, object);
        if reason.records_access() {
            self.matrix.grant(subject, object);
        }

        let decision = AccessDecision {
            subject,
            object,
            kind,
            reason,
            epoch: self.epoch,
        };
        audit::emit_access_decision(&decision, self.epoch_id);
        Ok(decision)
    }

    /// Decides an access request for already validated indices.
    fn evaluate(&self, subject: usize, object: usize) -> DecisionReason {
        if self.matrix.get(subject, object) {
            return DecisionReason::AlreadyHeld;
        }
        if self.matrix.is_row_empty(subject) {
            return DecisionReason::FirstAccess;
        }

        let Some(class) = self.effective_conflict(object) else {
            return DecisionReason::NoConflict;
        };
        let firm = self.owners[object].as_ref();

        let mut blocker = None;
        for held in self.matrix.held_objects(subject).filter(|&held| held != object) {
            if self.effective_conflict(held) != Some(class) {
                continue;
            }
            if self.owners[held].as_ref() == firm {
                return DecisionReason::SameFirm;
            }
            blocker.get_or_insert(held);
        }

        match blocker {
            None => DecisionReason::NoConflict,
            Some(held) => {
                tracing::debug!(
                    subject,
                    object,
                    conflicting_object = held,
                    conflict_class = %class,
                    "Access blocked by competing firm"
                );
                DecisionReason::Refused {
                    conflicting_object: held,
                    conflicting_firm: self.owners[held].clone(),
                    conflict_class: class.clone(),
                }
            }
        }
    }

    /// Conflict class of the object's current firm. Index must be valid.
    fn effective_conflict(&self, object: usize) -> Option<&ConflictClass> {
        self.owners[object]
            .as_ref()
            .and_then(|firm| self.conflicts.get(firm))
    }

    /// Returns the firm owning `object`.
    pub fn firm(&self, object: usize) -> WallResult<Option<&Firm>> {
        let object = self.matrix.check_object(object)?;
        Ok(self.owners[object].as_ref())
    }

    /// Returns the effective conflict class of `object`.
    pub fn conflict(&self, object: usize) -> WallResult<Option<&ConflictClass>> {
        let object = self.matrix.check_object(object)?;
        Ok(self.effective_conflict(object))
    }

    /// Returns the full security label of `object`.
    pub fn label(&self, object: usize) -> WallResult<SecurityLabel> {
        let object = self.matrix.check_object(object)?;
        Ok(SecurityLabel {
            conflict: self.effective_conflict(object).cloned(),
            firm: self.owners[object].clone(),
        })
    }

    /// Returns the conflict class assigned to `firm`.
    pub fn firm_conflict(&self, firm: &Firm) -> Option<&ConflictClass> {
        self.conflicts.get(firm)
    }

    /// Returns `true` if `subject` holds `object` this epoch.
    pub fn has_access(&self, subject: usize, object: usize) -> WallResult<bool> {
        let subject = self.matrix.check_subject(subject)?;
        let object = self.matrix.check_object(object)?;
        Ok(self.matrix.get(subject, object))
    }

    /// Objects held by `subject` this epoch, in index order.
    pub fn accessed_objects(&self, subject: usize) -> WallResult<Vec<usize>> {
        let subject = self.matrix.check_subject(subject)?;
        Ok(self.matrix.held_objects(subject).collect())
    }

    /// Number of objects held by `subject` this epoch.
    pub fn accessed_object_count(&self, subject: usize) -> WallResult<usize> {
        let subject = self.matrix.check_subject(subject)?;
        Ok(self.matrix.held_objects(subject).count())
    }

    /// Subjects holding `object` this epoch, in index order.
    pub fn accessing_subjects(&self, object: usize) -> WallResult<Vec<usize>> {
        let object = self.matrix.check_object(object)?;
        Ok(self.matrix.holders(object).collect())
    }

    /// Number of subjects holding `object` this epoch.
    pub fn accessing_subject_count(&self, object: usize) -> WallResult<usize> {
        let object = self.matrix.check_object(object)?;
        Ok(self.matrix.holders(object).count())
    }

    /// Objects currently owned by `firm` (its portfolio), in index order.
    pub fn firm_objects(&self, firm: &Firm) -> Vec<usize> {
        self.owners
            .iter()
            .enumerate()
            .filter_map(|(object, owner)| (owner.as_ref() == Some(firm)).then_some(object))
            .collect()
    }

    /// Number of objects currently owned by `firm`.
    pub fn firm_object_count(&self, firm: &Firm) -> usize {
        self.owners
            .iter()
            .filter(|owner| owner.as_ref() == Some(firm))
            .count()
    }

    /// Objects without a firm, in index order.
    pub fn unassigned_objects(&self) -> Vec<usize> {
        self.owners
            .iter()
            .enumerate()
            .filter_map(|(object, owner)| owner.is_none().then_some(object))
            .collect()
    }

    /// Number of objects without a firm.
    pub fn unassigned_object_count(&self) -> usize {
        self.owners.iter().filter(|owner| owner.is_none()).count()
    }

    /// Distinct firms owning at least one object, sorted.
    pub fn firms(&self) -> Vec<&Firm> {
        self.owners
            .iter()
            .flatten()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct conflict classes of firms owning at least one object, sorted.
    pub fn conflict_classes(&self) -> Vec<&ConflictClass> {
        self.owners
            .iter()
            .flatten()
            .filter_map(|firm| self.conflicts.get(firm))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of subjects.
    pub fn subject_count(&self) -> usize {
        self.matrix.subjects()
    }

    /// Number of objects.
    pub fn object_count(&self) -> usize {
        self.matrix.objects()
    }

    /// Number of firms declared at construction.
    pub fn firm_count(&self) -> usize {
        self.firm_count
    }

    /// Current epoch number. The construction epoch is 1.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Identifier of the current epoch.
    pub fn epoch_id(&self) -> EpochId {
        self.epoch_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WallError;

    fn firm(name: &str) -> Firm {
        Firm::new(name)
    }

    fn class(name: &str) -> ConflictClass {
        ConflictClass::new(name)
    }

    /// Two subjects; o0 -> A, o1 -> B, o2 -> A; A and B share class X.
    fn scenario_engine() -> ChineseWallEngine {
        let mut engine = ChineseWallEngine::new(2, 3, 2);
        engine.add_object(0, firm("A")).unwrap();
        engine.add_object(1, firm("B")).unwrap();
        engine.add_object(2, firm("A")).unwrap();
        engine.set_conflict(firm("A"), class("X"));
        engine.set_conflict(firm("B"), class("X"));
        engine
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut engine = scenario_engine();

        assert!(engine.read(0, 0).unwrap());
        assert!(!engine.read(0, 1).unwrap());
        assert!(engine.read(0, 2).unwrap());

        engine.start();
        assert!(engine.read(0, 1).unwrap());

        assert_eq!(engine.firm_object_count(&firm("A")), 2);
        assert_eq!(engine.unassigned_object_count(), 0);
    }

    #[test]
    fn test_repeated_access_is_granted() {
        let mut engine = scenario_engine();
        assert!(engine.read(1, 1).unwrap());

        let decision = engine.access(1, 1, AccessKind::Read).unwrap();
        assert_eq!(decision.reason, DecisionReason::AlreadyHeld);
        assert_eq!(engine.accessed_object_count(1).unwrap(), 1);
    }

    #[test]
    fn test_first_access_is_free_for_every_object() {
        for object in 0..3 {
            let mut engine = scenario_engine();
            let decision = engine.access(0, object, AccessKind::Read).unwrap();
            assert_eq!(decision.reason, DecisionReason::FirstAccess);
            assert!(engine.has_access(0, object).unwrap());
        }
    }

    #[test]
    fn test_conflict_is_refused_without_mutation() {
        let mut engine = scenario_engine();
        engine.read(0, 0).unwrap();

        let decision = engine.access(0, 1, AccessKind::Read).unwrap();
        assert_eq!(
            decision.reason,
            DecisionReason::Refused {
                conflicting_object: 0,
                conflicting_firm: Some(firm("A")),
                conflict_class: class("X"),
            }
        );
        assert!(!engine.has_access(0, 1).unwrap());
        assert_eq!(engine.accessing_subject_count(1).unwrap(), 0);
    }

    #[test]
    fn test_same_firm_carve_out_after_refusal() {
        let mut engine = scenario_engine();
        engine.read(0, 0).unwrap();
        assert!(!engine.read(0, 1).unwrap());

        let decision = engine.access(0, 2, AccessKind::Read).unwrap();
        assert_eq!(decision.reason, DecisionReason::SameFirm);
    }

    #[test]
    fn test_history_is_per_subject() {
        let mut engine = scenario_engine();
        engine.read(0, 0).unwrap();

        // Subject 1 has its own, still empty, history.
        assert!(engine.read(1, 1).unwrap());
        assert!(!engine.read(1, 0).unwrap());
        assert_eq!(engine.accessing_subjects(0).unwrap(), vec![0]);
    }

    #[test]
    fn test_write_matches_read() {
        let mut engine = scenario_engine();
        assert!(engine.write(0, 1).unwrap());
        assert!(!engine.write(0, 0).unwrap());
        assert!(!engine.read(0, 2).unwrap());
    }

    #[test]
    fn test_different_classes_do_not_conflict() {
        let mut engine = ChineseWallEngine::new(1, 3, 3);
        engine.add_object(0, firm("A")).unwrap();
        engine.add_object(1, firm("C")).unwrap();
        engine.set_conflict(firm("A"), class("banks"));
        engine.set_conflict(firm("C"), class("oil"));

        engine.read(0, 0).unwrap();
        let decision = engine.access(0, 1, AccessKind::Read).unwrap();
        assert_eq!(decision.reason, DecisionReason::NoConflict);

        // Unlabelled objects never conflict.
        assert!(engine.read(0, 2).unwrap());
    }

    #[test]
    fn test_late_objects_inherit_firm_conflict() {
        let mut engine = ChineseWallEngine::new(1, 3, 2);
        engine.add_object(0, firm("A")).unwrap();
        engine.set_conflict(firm("A"), class("X"));
        engine.set_conflict(firm("B"), class("X"));
        engine.add_object(1, firm("B")).unwrap();

        assert_eq!(engine.conflict(1).unwrap(), Some(&class("X")));

        engine.read(0, 0).unwrap();
        assert!(!engine.read(0, 1).unwrap());
    }

    #[test]
    fn test_reassignment_overwrites_firm() {
        let mut engine = scenario_engine();
        engine.add_object(2, firm("B")).unwrap();

        assert_eq!(engine.firm(2).unwrap(), Some(&firm("B")));
        assert_eq!(engine.firm_objects(&firm("A")), vec![0]);
        assert_eq!(engine.firm_objects(&firm("B")), vec![1, 2]);

        // Re-adding to the same firm is a no-op for the portfolio.
        engine.add_object(2, firm("B")).unwrap();
        assert_eq!(engine.firm_objects(&firm("B")), vec![1, 2]);
        assert_eq!(engine.unassigned_object_count(), 0);

        assert!(engine.add_object(3, firm("A")).is_err());
        assert_eq!(engine.firm_objects(&firm("A")), vec![0]);
    }

    #[test]
    fn test_start_resets_every_subject() {
        let mut engine = scenario_engine();
        let first_epoch = engine.epoch_id();
        engine.read(0, 0).unwrap();
        engine.read(1, 1).unwrap();

        engine.start();
        assert_eq!(engine.epoch(), 2);
        assert_ne!(engine.epoch_id(), first_epoch);
        assert_eq!(engine.accessed_object_count(0).unwrap(), 0);
        assert_eq!(engine.accessed_object_count(1).unwrap(), 0);

        engine.start();
        assert_eq!(engine.epoch(), 3);
        assert!(engine.read(1, 0).unwrap());
    }

    #[test]
    fn test_invalid_indices_are_rejected() {
        let mut engine = scenario_engine();

        assert!(matches!(
            engine.read(2, 0),
            Err(WallError::InvalidIndex { index: 2, bound: 2, .. })
        ));
        assert!(matches!(
            engine.write(0, 3),
            Err(WallError::InvalidIndex { index: 3, bound: 3, .. })
        ));
        assert!(engine.add_object(9, firm("A")).is_err());
        assert!(engine.firm(3).is_err());
        assert!(engine.accessing_subjects(3).is_err());
        assert!(engine.accessed_objects(5).is_err());

        // A rejected request leaves the history untouched.
        assert_eq!(engine.accessed_object_count(0).unwrap(), 0);
    }

    #[test]
    fn test_label_queries() {
        let mut engine = ChineseWallEngine::new(1, 4, 3);
        engine.add_object(0, firm("B")).unwrap();
        engine.add_object(1, firm("A")).unwrap();
        engine.add_object(2, firm("A")).unwrap();
        engine.set_conflict(firm("A"), class("X"));
        engine.set_conflict(firm("Z"), class("W"));

        assert_eq!(engine.firms(), vec![&firm("A"), &firm("B")]);
        assert_eq!(engine.conflict_classes(), vec![&class("X")]);
        assert_eq!(engine.unassigned_objects(), vec![3]);
        assert_eq!(engine.unassigned_object_count(), 1);
        assert_eq!(engine.firm_conflict(&firm("Z")), Some(&class("W")));
        assert_eq!(engine.conflict(0).unwrap(), None);

        let label = engine.label(1).unwrap();
        assert_eq!(label.firm, Some(firm("A")));
        assert_eq!(label.conflict, Some(class("X")));
        assert!(engine.label(3).unwrap().is_unset());

        assert_eq!(engine.subject_count(), 1);
        assert_eq!(engine.object_count(), 4);
        assert_eq!(engine.firm_count(), 3);
    }
}
