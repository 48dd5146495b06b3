//! Per-step validation and execution of a [`Plan`].

use capgate_authority::{AuditSink, AuthorityToken, Decision, Enforcer};
use capgate_exec::{ExecConfig, ExecError, ExecResult, Executor};
use capgate_exec_model::{Command, CommandBuilder, ParsedArgs, ParsedFlag, validate};
use capgate_schema::{SchemaStore, ToolId};

use crate::types::{Plan, PlanStep, PlanValidation, StepValidation};

/// Outcome of running a single plan step through [`PlanRunner::execute`].
#[derive(Debug)]
pub enum StepOutcome {
    /// The step did not validate; carries the same result `dry_run` would
    /// have produced.
    NotExecuted(StepValidation),
    /// The step validated and was executed.
    Executed(ExecResult),
    /// The step validated but the executor itself failed.
    ExecutionFailed(ExecError),
}

/// Result of [`PlanRunner::execute`]: per-step validation plus, for steps
/// that validated, their execution outcome.
#[derive(Debug)]
pub struct PlanExecution {
    /// Validation result for every step, in document order.
    pub validation: PlanValidation,
    /// Execution outcome for every step, in document order.
    pub step_outcomes: Vec<StepOutcome>,
}

/// Validates and, on request, executes a [`Plan`] against one
/// [`SchemaStore`] and [`AuthorityToken`].
pub struct PlanRunner<'a> {
    schema_store: &'a SchemaStore,
    token: &'a AuthorityToken,
    audit_sink: &'a dyn AuditSink,
}

impl<'a> PlanRunner<'a> {
    /// Build a runner bound to a schema store, authority token, and audit
    /// sink for the lifetime of the validation/execution calls.
    #[must_use]
    pub fn new(schema_store: &'a SchemaStore, token: &'a AuthorityToken, audit_sink: &'a dyn AuditSink) -> Self {
        Self { schema_store, token, audit_sink }
    }

    /// Validate every step of `plan`, never short-circuiting (I7): a
    /// failing step does not block evaluation of subsequent steps. The
    /// executor is never invoked.
    #[must_use]
    pub fn dry_run(&self, plan: &Plan, now: i64) -> PlanValidation {
        let step_results = plan.steps.iter().map(|step| self.validate_step(step, now)).collect();
        PlanValidation { step_results }
    }

    /// Validate every step, then execute the ones that validated.
    #[must_use]
    pub fn execute(&self, plan: &Plan, exec_config: ExecConfig, now: i64) -> PlanExecution {
        let executor = Executor::new(self.audit_sink);
        let mut step_results = Vec::with_capacity(plan.steps.len());
        let mut step_outcomes = Vec::with_capacity(plan.steps.len());

        for step in &plan.steps {
            let validation = self.validate_step(step, now);
            if !validation.is_valid() {
                step_outcomes.push(StepOutcome::NotExecuted(validation.clone()));
                step_results.push(validation);
                continue;
            }

            match self.build_step_command(step) {
                Some(command) => match executor.execute(&command, self.token, exec_config, now) {
                    Ok(result) => step_outcomes.push(StepOutcome::Executed(result)),
                    Err(error) => step_outcomes.push(StepOutcome::ExecutionFailed(error)),
                },
                None => step_outcomes.push(StepOutcome::NotExecuted(validation.clone())),
            }
            step_results.push(validation);
        }

        PlanExecution {
            validation: PlanValidation { step_results },
            step_outcomes,
        }
    }

    fn validate_step(&self, step: &PlanStep, now: i64) -> StepValidation {
        let Ok(tool_id) = ToolId::try_from(step.tool_id.as_str()) else {
            return StepValidation::UnknownTool;
        };
        let Some(schema) = self.schema_store.get(&tool_id) else {
            return StepValidation::UnknownTool;
        };

        let parsed = step_to_parsed_args(step);
        let failures = validate(schema, &parsed);
        if !failures.is_empty() {
            return StepValidation::SchemaInvalid(failures);
        }

        let provisional = Command {
            tool_id: schema.id.clone(),
            binary: schema.binary.clone(),
            args: Vec::new(),
            cwd: self.token.fs_root.clone(),
            env_delta: Vec::new(),
            requested_capabilities: schema.capabilities.clone(),
        };

        let enforcer = Enforcer::new(self.audit_sink);
        match enforcer.check(self.token, &provisional, now) {
            Decision::Denied(reason) => StepValidation::AuthorityDenied(reason),
            Decision::Allowed => StepValidation::Valid,
        }
    }

    fn build_step_command(&self, step: &PlanStep) -> Option<Command> {
        let tool_id = ToolId::try_from(step.tool_id.as_str()).ok()?;
        let schema = self.schema_store.get(&tool_id)?;
        let parsed = step_to_parsed_args(step);
        CommandBuilder::new()
            .build(schema, &parsed, self.token.fs_root.clone(), Vec::new())
            .ok()
    }
}

fn step_to_parsed_args(step: &PlanStep) -> ParsedArgs {
    ParsedArgs {
        flags: step
            .params
            .iter()
            .map(|param| ParsedFlag {
                name: param.name.clone(),
                value: param.value.clone(),
            })
            .collect(),
        positionals: step.positionals.clone(),
    }
}
