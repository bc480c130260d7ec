//! Audit event types and emission functions.

use crate::core::{ConflictClass, EpochId, Firm};
use crate::policy::AccessDecision;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base trait for audit events.
pub trait AuditEvent: Serialize {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Returns the timestamp of the event.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Audit event for a `read` or `write` decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessAuditEvent {
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,

    /// Epoch the decision was made in.
    pub epoch_id: EpochId,

    /// Epoch number.
    pub epoch: u64,

    /// Requesting subject.
    pub subject: usize,

    /// Requested object.
    pub object: usize,

    /// `read` or `write`.
    pub access: String,

    /// Whether access was granted.
    pub granted: bool,

    /// Decision reason name.
    pub reason: String,

    /// Held object that caused a refusal.
    pub conflicting_object: Option<usize>,
}

impl AccessAuditEvent {
    /// Builds the audit record for a decision.
    pub fn new(decision: &AccessDecision, epoch_id: EpochId) -> Self {
        let conflicting_object = match &decision.reason {
            crate::policy::DecisionReason::Refused {
                conflicting_object, ..
            } => Some(*conflicting_object),
            _ => None,
        };

        Self {
            timestamp: Utc::now(),
            epoch_id,
            epoch: decision.epoch,
            subject: decision.subject,
            object: decision.object,
            access: decision.kind.to_string(),
            granted: decision.is_granted(),
            reason: decision.reason.name().to_string(),
            conflicting_object,
        }
    }
}

impl AuditEvent for AccessAuditEvent {
    fn event_type(&self) -> &'static str {
        "access_decision"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Audit event for a change to an object's or firm's label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelAuditEvent {
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,

    /// Epoch the change happened in.
    pub epoch_id: EpochId,

    /// Object whose firm changed, for object assignments.
    pub object: Option<usize>,

    /// Firm involved.
    pub firm: Firm,

    /// Firm previously owning the object, for object assignments.
    pub previous_firm: Option<Firm>,

    /// Conflict class assigned, for conflict assignments.
    pub conflict: Option<ConflictClass>,
}

impl AuditEvent for LabelAuditEvent {
    fn event_type(&self) -> &'static str {
        if self.object.is_some() {
            "object_assigned"
        } else {
            "conflict_assigned"
        }
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Emits an audit event for an access decision.
pub fn emit_access_decision(decision: &AccessDecision, epoch_id: EpochId) {
    let event = AccessAuditEvent::new(decision, epoch_id);

    tracing::info!(
        target: "chinese_wall::audit",
        event_type = event.event_type(),
        epoch_id = %event.epoch_id,
        epoch = event.epoch,
        subject = event.subject,
        object = event.object,
        access = %event.access,
        granted = event.granted,
        reason = %event.reason,
        conflicting_object = ?event.conflicting_object,
        "Access decision made"
    );
}

/// Emits an audit event for an object being assigned to a firm.
pub fn emit_object_assigned(
    epoch_id: EpochId,
    object: usize,
    firm: &Firm,
    previous_firm: Option<&Firm>,
) {
    let event = LabelAuditEvent {
        timestamp: Utc::now(),
        epoch_id,
        object: Some(object),
        firm: firm.clone(),
        previous_firm: previous_firm.cloned(),
        conflict: None,
    };

    tracing::info!(
        target: "chinese_wall::audit",
        event_type = event.event_type(),
        epoch_id = %event.epoch_id,
        object = object,
        firm = %event.firm,
        previous_firm = ?event.previous_firm,
        "Object assigned to firm"
    );
}

/// Emits an audit event for a firm's conflict class being set.
pub fn emit_conflict_assigned(
    epoch_id: EpochId,
    firm: &Firm,
    conflict: &ConflictClass,
    previous: Option<&ConflictClass>,
) {
    let event = LabelAuditEvent {
        timestamp: Utc::now(),
        epoch_id,
        object: None,
        firm: firm.clone(),
        previous_firm: None,
        conflict: Some(conflict.clone()),
    };

    tracing::info!(
        target: "chinese_wall::audit",
        event_type = event.event_type(),
        epoch_id = %event.epoch_id,
        firm = %event.firm,
        conflict = ?event.conflict,
        previous_conflict = ?previous,
        "Conflict class assigned to firm"
    );
}

/// Emits an audit event for the start of a new epoch.
pub fn emit_epoch_started(previous: EpochId, epoch_id: EpochId, epoch: u64, cleared_entries: usize) {
    tracing::info!(
        target: "chinese_wall::audit",
        event_type = "epoch_started",
        previous_epoch_id = %previous,
        epoch_id = %epoch_id,
        epoch = epoch,
        cleared_entries = cleared_entries,
        "New epoch started"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AccessKind;
    use crate::policy::DecisionReason;

    #[test]
    fn test_access_event_from_refusal() {
        let decision = AccessDecision {
            subject: 0,
            object: 1,
            kind: AccessKind::Write,
            reason: DecisionReason::Refused {
                conflicting_object: 0,
                conflicting_firm: Some(Firm::new("A")),
                conflict_class: ConflictClass::new("X"),
            },
            epoch: 3,
        };
        let event = AccessAuditEvent::new(&decision, EpochId::new());

        assert_eq!(event.event_type(), "access_decision");
        assert_eq!(event.access, "write");
        assert!(!event.granted);
        assert_eq!(event.reason, "refused");
        assert_eq!(event.conflicting_object, Some(0));
        assert_eq!(event.epoch, 3);
    }

    #[test]
    fn test_label_event_type() {
        let event = LabelAuditEvent {
            timestamp: Utc::now(),
            epoch_id: EpochId::new(),
            object: None,
            firm: Firm::new("A"),
            previous_firm: None,
            conflict: Some(ConflictClass::new("X")),
        };
        assert_eq!(event.event_type(), "conflict_assigned");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["firm"], "A");
        assert_eq!(json["conflict"], "X");
    }
}
