//! Error taxonomy for schema decoding, consistency checks, and storage.

use thiserror::Error;

use crate::types::SchemaVersion;

/// Failures arising while loading or storing a [`ToolSchema`](crate::types::ToolSchema).
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A required text field was empty.
    #[error("schema field `{field}` cannot be empty")]
    EmptyField {
        /// Name of the empty field.
        field: &'static str,
    },
    /// The raw bytes did not parse into the schema document shape at all.
    #[error("schema document is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
    /// The document parsed but violates an internal-consistency rule.
    #[error("schema is internally inconsistent: {reason}")]
    InternallyInconsistent {
        /// Human-readable description of the violated rule.
        reason: String,
    },
    /// A schema of an equal or lesser version was supplied for a
    /// `tool_id` that already has a stored schema.
    #[error(
        "schema version downgrade rejected for `{tool_id}`: stored version `{stored}` is not less than incoming version `{incoming}`"
    )]
    VersionDowngrade {
        /// Tool id the downgrade was attempted against.
        tool_id: String,
        /// Version already present in the store.
        stored: SchemaVersion,
        /// Version the caller attempted to install.
        incoming: SchemaVersion,
    },
}
