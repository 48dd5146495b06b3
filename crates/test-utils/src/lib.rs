//! Shared `rstest` fixtures used across the workspace's crate test
//! suites: an in-memory audit sink and a permissive authority token.

use std::cell::RefCell;
use std::path::PathBuf;

use capgate_authority::{AuditEvent, AuditSink, AuthorityLevel, AuthorityToken, NetworkPolicy};
use capgate_schema::{BinaryPath, ToolId};
use rstest::fixture;

/// Non-production [`AuditSink`] that records every event it receives, for
/// assertions in tests.
#[derive(Default)]
pub struct VecAuditSink {
    events: RefCell<Vec<AuditEvent>>,
}

impl VecAuditSink {
    /// Build an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.borrow().clone()
    }
}

impl AuditSink for VecAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// An empty, ready-to-use audit sink fixture.
#[fixture]
#[must_use]
pub fn audit_sink() -> VecAuditSink {
    VecAuditSink::new()
}

/// A `parameterized_tools`-level token permitting `tool_id`/`binary` under
/// `fs_root`, for tests that only need one allowed tool.
#[must_use]
pub fn permissive_token(tool_id: &str, binary: &str, fs_root: &str) -> AuthorityToken {
    AuthorityToken {
        project_id: [0; 32],
        level: AuthorityLevel::ParameterizedTools,
        expiration: 0,
        allowed_tools: vec![ToolId::try_from(tool_id).expect("fixture tool id is valid")],
        allowed_bins: vec![BinaryPath::try_from(binary).expect("fixture binary path is valid")],
        fs_root: PathBuf::from(fs_root),
        network: NetworkPolicy::Deny,
    }
}

/// An `observe`-level token permitting nothing, for denial-path tests.
#[fixture]
#[must_use]
pub fn observe_token() -> AuthorityToken {
    AuthorityToken {
        project_id: [0; 32],
        level: AuthorityLevel::Observe,
        expiration: 0,
        allowed_tools: Vec::new(),
        allowed_bins: Vec::new(),
        fs_root: PathBuf::from("/"),
        network: NetworkPolicy::Deny,
    }
}
