//! Structured audit logging of policy activity.
//!
//! This module provides functions for emitting structured audit events
//! using the `tracing` crate under the `chinese_wall::audit` target. Events
//! can be captured by any tracing subscriber (JSON file, journald, etc.).

mod events;

pub use events::{
    emit_access_decision, emit_conflict_assigned, emit_epoch_started, emit_object_assigned,
    AccessAuditEvent, AuditEvent, LabelAuditEvent,
};
