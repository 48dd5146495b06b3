//! End-to-end wiring: `SchemaStore` → `Validator` → `CommandBuilder` →
//! `Enforcer` → `Executor`.

use std::fs;
use std::path::Path;

use capgate_authority::{AuditSink, AuthorityToken, Decision, Enforcer};
use capgate_exec::{ExecConfig, ExecError, ExecResult, Executor};
use capgate_exec_model::{BuildError, Command, CommandBuilder, ParsedArgs};
use capgate_schema::{SchemaStore, ToolId};
use thiserror::Error;

/// Failure from [`build_and_check`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No schema is activated for the requested tool id.
    #[error("no activated schema for tool id `{tool_id}`")]
    UnknownTool {
        /// The tool id that had no schema.
        tool_id: String,
    },
    /// `cwd` could not be resolved to a canonical path.
    #[error("cwd `{path}` could not be canonicalised: {source}")]
    CwdUnresolvable {
        /// The path that failed to resolve.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Building the command failed validation.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// The enforcer denied the resulting command.
    #[error("enforcer denied command for tool id `{tool_id}`")]
    Denied {
        /// The tool id the enforcer denied.
        tool_id: String,
    },
}

/// Resolve `cwd` to a canonical path, build a [`Command`] from `tool_id`
/// and `parsed`, then run it through the [`Enforcer`].
///
/// This is the one boundary through which a `cwd` reaches the enforcer's
/// byte-prefix check (see the open-question resolution in `SPEC_FULL.md`
/// §9): it canonicalises `cwd` before the builder ever sees it, so a
/// caller going through this helper cannot hand the enforcer an
/// uncanonicalised path without bypassing the helper entirely.
///
/// # Errors
///
/// Returns [`PipelineError::UnknownTool`] if `tool_id` has no activated
/// schema, [`PipelineError::CwdUnresolvable`] if `cwd` cannot be
/// canonicalised, [`PipelineError::Build`] if validation fails, or
/// [`PipelineError::Denied`] if the enforcer refuses the command.
pub fn build_and_check(
    schema_store: &SchemaStore,
    token: &AuthorityToken,
    audit_sink: &dyn AuditSink,
    tool_id: &ToolId,
    parsed: &ParsedArgs,
    cwd: &Path,
    env_delta: Vec<(String, String)>,
    now: i64,
) -> Result<Command, PipelineError> {
    let schema = schema_store.get(tool_id).ok_or_else(|| PipelineError::UnknownTool {
        tool_id: tool_id.as_str().to_owned(),
    })?;

    let canonical_cwd = fs::canonicalize(cwd).map_err(|source| PipelineError::CwdUnresolvable {
        path: cwd.display().to_string(),
        source,
    })?;

    let command = CommandBuilder::new().build(schema, parsed, canonical_cwd, env_delta)?;

    let enforcer = Enforcer::new(audit_sink);
    match enforcer.check(token, &command, now) {
        Decision::Allowed => Ok(command),
        Decision::Denied(_) => Err(PipelineError::Denied { tool_id: tool_id.as_str().to_owned() }),
    }
}

/// Run `build_and_check`, then hand the resulting command to the
/// executor if it is allowed.
///
/// # Errors
///
/// Returns [`PipelineError`] for the same reasons as `build_and_check`,
/// or wraps an [`ExecError`] if the executor itself fails after the
/// command was allowed.
pub fn build_check_and_execute(
    schema_store: &SchemaStore,
    token: &AuthorityToken,
    audit_sink: &dyn AuditSink,
    tool_id: &ToolId,
    parsed: &ParsedArgs,
    cwd: &Path,
    env_delta: Vec<(String, String)>,
    exec_config: ExecConfig,
    now: i64,
) -> Result<ExecResult, ExecutionError> {
    let command = build_and_check(schema_store, token, audit_sink, tool_id, parsed, cwd, env_delta, now)?;
    let executor = Executor::new(audit_sink);
    executor.execute(&command, token, exec_config, now).map_err(ExecutionError::Exec)
}

/// Failure from [`build_check_and_execute`].
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The pipeline stage before execution failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    /// The executor failed after the command was allowed.
    #[error(transparent)]
    Exec(ExecError),
}
