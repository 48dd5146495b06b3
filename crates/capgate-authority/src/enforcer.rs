//! The single authority gate: `check(token, command) -> allowed | denied`.

use capgate_exec_model::Command;
use tracing::warn;

use crate::audit::{AuditEvent, AuditSink};
use crate::types::{AuthorityLevel, AuthorityToken, DenialReason};

/// Outcome of [`Enforcer::check`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    /// The command may proceed.
    Allowed,
    /// The command is refused for the carried reason.
    Denied(DenialReason),
}

impl Decision {
    /// Whether this decision permits execution.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// The single point where untrusted structure meets execution rights.
///
/// Policy is entirely explicit allow-lists: no regex, no glob, no prefix
/// matching on tool ids. Auditability beats expressiveness.
pub struct Enforcer<'sink> {
    audit_sink: &'sink dyn AuditSink,
}

impl<'sink> Enforcer<'sink> {
    /// Build an enforcer that reports denials to `audit_sink`.
    #[must_use]
    pub fn new(audit_sink: &'sink dyn AuditSink) -> Self {
        Self { audit_sink }
    }

    /// Evaluate `command` against `token`, short-circuiting on the first
    /// rule that denies it.
    ///
    /// `now` is the current wall-clock time in Unix seconds, supplied by
    /// the caller so the decision procedure stays free of a hidden clock
    /// dependency.
    #[must_use]
    pub fn check(&self, token: &AuthorityToken, command: &Command, now: i64) -> Decision {
        let denial = self.first_denial(token, command, now);
        match denial {
            Some(reason) => {
                self.emit_denial(token, command, now, reason);
                Decision::Denied(reason)
            }
            None => Decision::Allowed,
        }
    }

    fn first_denial(&self, token: &AuthorityToken, command: &Command, now: i64) -> Option<DenialReason> {
        if token.level == AuthorityLevel::Observe {
            return Some(DenialReason::InsufficientLevel);
        }
        if !token.permits_tool(&command.tool_id) {
            return Some(DenialReason::ToolNotInAllowList);
        }
        if !token.permits_binary(&command.binary) {
            return Some(DenialReason::BinaryNotInAllowList);
        }
        if !token.permits_cwd(&command.cwd) {
            return Some(DenialReason::CwdOutsideFsRoot);
        }
        if token.is_expired(now) {
            return Some(DenialReason::AuthorityExpired);
        }
        if token.level == AuthorityLevel::ToolsOnly && !command.args.is_empty() {
            return Some(DenialReason::InsufficientLevel);
        }
        None
    }

    fn emit_denial(&self, token: &AuthorityToken, command: &Command, now: i64, reason: DenialReason) {
        warn!(
            tool_id = command.tool_id.as_str(),
            binary = command.binary.as_str(),
            ?reason,
            "enforcer denied command"
        );
        self.audit_sink.record(AuditEvent {
            timestamp: now,
            tool_id: command.tool_id.clone(),
            denial_reason: reason,
            project_id: token.project_id,
        });
    }
}
