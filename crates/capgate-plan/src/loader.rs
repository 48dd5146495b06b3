//! Plan document decoding.

use crate::errors::PlanLoadError;
use crate::types::Plan;

/// Decode a plan document from raw JSON bytes.
///
/// Unknown top-level keys are ignored rather than rejected, since a
/// producer may attach metadata the core has no use for.
///
/// # Errors
///
/// Returns [`PlanLoadError::Malformed`] if the bytes do not decode into
/// the `Plan` shape.
pub fn load_plan(raw_bytes: &[u8]) -> Result<Plan, PlanLoadError> {
    serde_json::from_slice(raw_bytes).map_err(PlanLoadError::Malformed)
}
