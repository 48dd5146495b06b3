//! Deterministic argv assembly from a validated `(ToolSchema, ParsedArgs)`
//! pair.

use std::path::PathBuf;

use capgate_schema::ToolSchema;
use thiserror::Error;

use crate::types::{Command, ParsedArgs};
use crate::validator::{ValidationError, validate};

/// Failure to turn a `(ToolSchema, ParsedArgs)` pair into a [`Command`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// Validation found one or more failures; the invocation was never
    /// assembled.
    #[error("invocation failed validation: {0:?}")]
    Invalid(Vec<ValidationError>),
}

/// Assembles [`Command`] values from validated invocations.
///
/// Always runs the [validator](crate::validator) first (I2): a `Command`
/// never exists for an invocation the validator would reject.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommandBuilder;

impl CommandBuilder {
    /// Build a new, stateless builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate `parsed` against `schema`, then assemble the resulting
    /// argv deterministically.
    ///
    /// Argv order is fixed: the subcommand tail of a dotted `tool_id` (if
    /// any) first, then each flag as `--name` optionally followed by its
    /// value in the order `parsed` supplied them, then positionals in
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Invalid`] carrying every validation failure
    /// found, without building a partial `Command`.
    pub fn build(
        &self,
        schema: &ToolSchema,
        parsed: &ParsedArgs,
        cwd: PathBuf,
        env_delta: Vec<(String, String)>,
    ) -> Result<Command, BuildError> {
        let failures = validate(schema, parsed);
        if !failures.is_empty() {
            return Err(BuildError::Invalid(failures));
        }

        let mut args = Vec::with_capacity(parsed.flags.len() * 2 + parsed.positionals.len() + 1);
        if let Some(subcommand) = schema.id.subcommand_token() {
            args.push(subcommand.to_owned());
        }
        for flag in &parsed.flags {
            args.push(format!("--{}", flag.name));
            if let Some(value) = &flag.value {
                args.push(value.clone());
            }
        }
        args.extend(parsed.positionals.iter().cloned());

        Ok(Command {
            tool_id: schema.id.clone(),
            binary: schema.binary.clone(),
            args,
            cwd,
            env_delta,
            requested_capabilities: schema.capabilities.clone(),
        })
    }
}
