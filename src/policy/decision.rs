//! Access decisions produced by the engine.

use crate::core::{AccessKind, ConflictClass, Firm};

use serde::{Deserialize, Serialize};

/// Why an access request was granted or refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionReason {
    /// The subject already holds the object this epoch.
    AlreadyHeld,

    /// The subject holds nothing yet this epoch; the first access is free.
    FirstAccess,

    /// Nothing the subject holds shares the object's conflict class.
    NoConflict,

    /// A held object shares the conflict class but belongs to the same firm.
    SameFirm,

    /// A held object of a competing firm shares the conflict class.
    Refused {
        /// A held object that caused the refusal.
        conflicting_object: usize,
        /// Firm owning the conflicting object, if any.
        conflicting_firm: Option<Firm>,
        /// The shared conflict class.
        conflict_class: ConflictClass,
    },
}

impl DecisionReason {
    /// Returns `true` for every reason except `Refused`.
    pub fn is_granted(&self) -> bool {
        !matches!(self, Self::Refused { .. })
    }

    /// Returns `true` if granting requires recording the access.
    pub fn records_access(&self) -> bool {
        matches!(self, Self::FirstAccess | Self::NoConflict | Self::SameFirm)
    }

    /// Short machine-friendly name of the reason.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AlreadyHeld => "already_held",
            Self::FirstAccess => "first_access",
            Self::NoConflict => "no_conflict",
            Self::SameFirm => "same_firm",
            Self::Refused { .. } => "refused",
        }
    }
}

/// The outcome of one `read` or `write` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Requesting subject.
    pub subject: usize,

    /// Requested object.
    pub object: usize,

    /// Requested kind of access.
    pub kind: AccessKind,

    /// Why the request was granted or refused.
    pub reason: DecisionReason,

    /// Epoch number the decision was made in.
    pub epoch: u64,
}

impl AccessDecision {
    /// Returns `true` if access was granted.
    pub fn is_granted(&self) -> bool {
        self.reason.is_granted()
    }

    /// Returns `true` if access was refused.
    pub fn is_refused(&self) -> bool {
        !self.is_granted()
    }

    /// The reply word used by the command protocol.
    pub fn verdict(&self) -> &'static str {
        if self.is_granted() {
            "accepted"
        } else {
            "refused"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(reason: DecisionReason) -> AccessDecision {
        AccessDecision {
            subject: 0,
            object: 1,
            kind: AccessKind::Read,
            reason,
            epoch: 1,
        }
    }

    #[test]
    fn test_decision_verdicts() {
        assert_eq!(decision(DecisionReason::FirstAccess).verdict(), "accepted");
        assert_eq!(decision(DecisionReason::SameFirm).verdict(), "accepted");

        let refused = decision(DecisionReason::Refused {
            conflicting_object: 0,
            conflicting_firm: Some(Firm::new("A")),
            conflict_class: ConflictClass::new("X"),
        });
        assert!(refused.is_refused());
        assert_eq!(refused.verdict(), "refused");
    }

    #[test]
    fn test_only_new_grants_record_access() {
        assert!(!DecisionReason::AlreadyHeld.records_access());
        assert!(DecisionReason::FirstAccess.records_access());
        assert!(DecisionReason::NoConflict.records_access());
        assert!(DecisionReason::SameFirm.records_access());
    }

    #[test]
    fn test_reason_serialization() {
        let json = serde_json::to_string(&DecisionReason::NoConflict).unwrap();
        assert_eq!(json, r#"{"type":"no_conflict"}"#);
        assert_eq!(DecisionReason::AlreadyHeld.name(), "already_held");
    }
}
