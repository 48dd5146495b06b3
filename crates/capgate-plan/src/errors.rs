//! Plan-document decoding failures.

use thiserror::Error;

/// Failure to parse a plan document into a [`Plan`](crate::types::Plan).
#[derive(Debug, Error)]
pub enum PlanLoadError {
    /// The bytes did not decode into the plan document shape.
    #[error("plan document is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
}
