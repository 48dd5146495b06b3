//! Plan document types and validation outcomes.

use capgate_authority::DenialReason;
use capgate_exec_model::ValidationError;
use serde::Deserialize;

/// One named parameter supplied for a plan step, mirroring
/// [`ParsedFlag`](capgate_exec_model::ParsedFlag) at the document layer.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ParamEntry {
    /// Flag name, without the leading `--`.
    pub name: String,
    /// Value text, or absent for a bare toggle.
    #[serde(default)]
    pub value: Option<String>,
}

/// One step of a [`Plan`], as supplied by an untrusted producer.
///
/// Intentionally permissive at the document layer: unknown fields are
/// not rejected here, since a producer that attaches extra metadata
/// (e.g. a chain-of-thought trace) should not fail decoding before the
/// validator ever runs.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct PlanStep {
    /// Tool id this step invokes.
    pub tool_id: String,
    /// Named parameters for the step.
    #[serde(default)]
    pub params: Vec<ParamEntry>,
    /// Positional values for the step.
    #[serde(default)]
    pub positionals: Vec<String>,
    /// Producer-supplied rationale for this step, surfaced to reviewers.
    #[serde(default)]
    pub justification: Option<String>,
    /// Producer-estimated risk of this step, in `[0, 1]`.
    #[serde(default)]
    pub risk_score: Option<f64>,
    /// Capabilities the producer expects this step to require.
    #[serde(default)]
    pub capability_requests: Vec<String>,
}

/// A multi-step declarative invocation from an untrusted producer,
/// subject to the full validation pipeline.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Plan {
    /// Producer-assigned plan identifier.
    pub plan_id: String,
    /// Human-readable description of the plan's intent.
    #[serde(default)]
    pub description: Option<String>,
    /// Steps in document order.
    pub steps: Vec<PlanStep>,
}

/// Result of validating one [`PlanStep`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepValidation {
    /// The step validated and is authorized to run.
    Valid,
    /// `step.tool_id` has no schema in the store.
    UnknownTool,
    /// The step's params/positionals failed schema validation.
    SchemaInvalid(Vec<ValidationError>),
    /// The enforcer denied the step's provisional command.
    AuthorityDenied(DenialReason),
}

impl StepValidation {
    /// Whether this result is [`StepValidation::Valid`].
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Per-step results for an entire [`Plan`], in document order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlanValidation {
    /// One result per step, in document order.
    pub step_results: Vec<StepValidation>,
}

impl PlanValidation {
    /// Whether every step validated.
    #[must_use]
    pub fn all_valid(&self) -> bool {
        self.step_results.iter().all(StepValidation::is_valid)
    }

    /// Count of steps that did not validate.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.step_results.iter().filter(|result| !result.is_valid()).count()
    }

    /// Whether the plan carried zero steps, reported distinctly from a
    /// plan where every step happened to validate.
    #[must_use]
    pub fn is_empty_plan(&self) -> bool {
        self.step_results.is_empty()
    }
}
