//! Authority-domain error types.

use thiserror::Error;

/// Failure to parse a string tag into an [`AuthorityLevel`](crate::types::AuthorityLevel)
/// or [`NetworkPolicy`](crate::types::NetworkPolicy).
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum AuthorityTagError {
    /// `authority_level` did not match one of the four known tags.
    #[error("unknown authority level `{value}`")]
    InvalidLevel {
        /// Offending raw value.
        value: String,
    },
    /// `network` did not match one of the three known tags.
    #[error("unknown network policy `{value}`")]
    InvalidNetworkPolicy {
        /// Offending raw value.
        value: String,
    },
}
