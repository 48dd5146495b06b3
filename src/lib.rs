//! Capgate: a deterministic, capability-gated command execution engine.
//!
//! Validates structured invocations from untrusted producers against
//! versioned tool schemas, checks them against a project-scoped
//! authority token, and executes them as child processes without ever
//! invoking a string-interpreting shell.
//!
//! The five core crates making up the trust boundary are re-exported
//! here as one coherent surface: [`capgate_schema`] (schema ontology and
//! the version-gated store), [`capgate_exec_model`] (validator and
//! command builder), [`capgate_authority`] (authority tokens and the
//! enforcer), [`capgate_plan`] (multi-step plan validation), and
//! [`capgate_exec`] (the process executor). [`pipeline`] wires them
//! together end to end; [`config`] and [`audit`] are the ambient
//! collaborators the core expects the surrounding application to supply.

pub mod audit;
pub mod config;
pub mod pipeline;

pub use capgate_authority::{AuditEvent, AuditSink, AuthorityLevel, AuthorityToken, Decision, DenialReason, Enforcer, NetworkPolicy};
pub use capgate_exec::{ExecConfig, ExecError, ExecResult, Executor};
pub use capgate_exec_model::{BuildError, Command, CommandBuilder, ParsedArgs, ParsedFlag, ValidationError, ValidationErrorKind, validate};
pub use capgate_plan::{ParamEntry, Plan, PlanExecution, PlanRunner, PlanStep, PlanValidation, StepOutcome, StepValidation, load_plan};
pub use capgate_schema::{ArgType, BinaryPath, FlagDef, PositionalDef, RiskLevel, SchemaError, SchemaStore, SchemaVersion, ToolId, ToolSchema};
