//! Audit event stream emitted on every denial.

use capgate_schema::ToolId;
use serde::{Deserialize, Serialize};

use crate::types::DenialReason;

/// One append-only audit record, emitted whenever the enforcer denies a
/// command.
///
/// `Serialize`/`Deserialize` so a JSON-lines file sink is a one-line
/// `AuditSink` implementation: `writeln!(file, "{}", serde_json::to_string(&event)?)`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AuditEvent {
    /// Unix timestamp the denial occurred at.
    pub timestamp: i64,
    /// Tool id of the denied command.
    pub tool_id: ToolId,
    /// Why the command was denied.
    pub denial_reason: DenialReason,
    /// Project the token identifying this denial belongs to.
    pub project_id: [u8; 32],
}

/// External collaborator that records [`AuditEvent`]s.
///
/// The enforcer depends only on this trait object, never on a concrete
/// sink; the production sink (file, external service) stays outside the
/// core's trust boundary.
pub trait AuditSink {
    /// Record one audit event. Expected to be append-only and non-blocking
    /// under normal load; the enforcer does not retry or buffer on its
    /// behalf.
    fn record(&self, event: AuditEvent);
}
