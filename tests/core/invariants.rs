//! Direct checks of the numbered invariants the pipeline promises.

use std::path::PathBuf;

use capgate::{
    AuthorityLevel, AuthorityToken, BinaryPath, CommandBuilder, Decision, Enforcer, ExecConfig,
    Executor, NetworkPolicy, ParsedArgs, ParsedFlag, SchemaStore, ToolId, ValidationErrorKind,
    validate,
};

fn echo_schema_json() -> &'static str {
    r#"{
        "id": "test.echo",
        "name": "echo",
        "binary": "/bin/echo",
        "version": 1,
        "risk": "safe",
        "flags": [
            {"name": "text", "arg_type": "string", "required": false}
        ],
        "positionals": []
    }"#
}

fn token(level: AuthorityLevel, allowed_tools: Vec<&str>, allowed_bins: Vec<&str>, fs_root: &str) -> AuthorityToken {
    AuthorityToken {
        project_id: [0; 32],
        level,
        expiration: 0,
        allowed_tools: allowed_tools.into_iter().map(|id| ToolId::try_from(id).expect("valid id")).collect(),
        allowed_bins: allowed_bins.into_iter().map(|bin| BinaryPath::try_from(bin).expect("valid binary")).collect(),
        fs_root: PathBuf::from(fs_root),
        network: NetworkPolicy::Deny,
    }
}

/// I1: a built [`Command`](capgate::Command)'s argv never contains the
/// binary path, a shell name, or a `-c` shell-invocation flag — the
/// builder produces argv handed straight to `std::process::Command`,
/// never a string a shell would re-parse.
#[test]
fn built_command_never_smuggles_a_shell_invocation() {
    let mut store = SchemaStore::new();
    store.load(echo_schema_json().as_bytes()).expect("schema loads");
    let schema = store.get(&ToolId::try_from("test.echo").expect("valid id")).expect("schema present");

    let parsed = ParsedArgs {
        flags: vec![ParsedFlag { name: "text".to_owned(), value: Some("hi; rm -rf /".to_owned()) }],
        positionals: Vec::new(),
    };
    let command = CommandBuilder::new()
        .build(schema, &parsed, PathBuf::from("/tmp"), Vec::new())
        .expect("valid invocation builds");

    assert!(!command.args.iter().any(|arg| arg == "-c" || arg == "sh" || arg == "/bin/sh"));
    assert_eq!(command.args, vec!["--text".to_owned(), "hi; rm -rf /".to_owned()]);
}

/// I2: building the same `(schema, parsed, cwd, env_delta)` twice
/// produces byte-identical argv, independent of call order.
#[test]
fn argv_composition_is_deterministic_across_repeated_builds() {
    let mut store = SchemaStore::new();
    store.load(echo_schema_json().as_bytes()).expect("schema loads");
    let schema = store.get(&ToolId::try_from("test.echo").expect("valid id")).expect("schema present");

    let parsed = ParsedArgs {
        flags: vec![ParsedFlag { name: "text".to_owned(), value: Some("hello".to_owned()) }],
        positionals: Vec::new(),
    };

    let runs: Vec<Vec<String>> = (0..5)
        .map(|_| {
            CommandBuilder::new()
                .build(schema, &parsed, PathBuf::from("/tmp"), Vec::new())
                .expect("valid invocation builds")
                .args
        })
        .collect();

    assert!(runs.windows(2).all(|pair| pair[0] == pair[1]));
}

/// I3: `Enforcer::check` is total — it returns exactly `Allowed` or
/// `Denied(reason)` for every input, never panics, regardless of how
/// degenerate the token or command is.
#[test]
fn enforcer_check_is_total_over_degenerate_inputs() {
    let sink = capgate::audit::VecAuditSink::new();
    let enforcer = Enforcer::new(&sink);

    let empty_token = token(AuthorityLevel::ParameterizedTools, Vec::new(), Vec::new(), "/");
    let mut store = SchemaStore::new();
    store.load(echo_schema_json().as_bytes()).expect("schema loads");
    let schema = store.get(&ToolId::try_from("test.echo").expect("valid id")).expect("schema present");
    let command = CommandBuilder::new()
        .build(schema, &ParsedArgs::new(), PathBuf::from("/"), Vec::new())
        .expect("empty args validate");

    let decision = enforcer.check(&empty_token, &command, 0);
    assert!(matches!(decision, Decision::Denied(_)));
}

/// I4: the executor re-checks authority itself; a command the enforcer
/// would deny is never spawned by `Executor::execute`, even if a caller
/// bypasses the enforcer's own `check` call beforehand.
#[test]
fn executor_refuses_to_spawn_whatever_the_enforcer_would_deny() {
    let mut store = SchemaStore::new();
    store.load(echo_schema_json().as_bytes()).expect("schema loads");
    let schema = store.get(&ToolId::try_from("test.echo").expect("valid id")).expect("schema present");

    let denying_token = token(AuthorityLevel::Observe, vec!["test.echo"], vec!["/bin/echo"], "/");
    let command = CommandBuilder::new()
        .build(schema, &ParsedArgs::new(), PathBuf::from("/tmp"), Vec::new())
        .expect("empty args validate");

    let sink = capgate::audit::VecAuditSink::new();
    let enforcer = Enforcer::new(&sink);
    let enforcer_decision = enforcer.check(&denying_token, &command, 0);
    assert!(!enforcer_decision.is_allowed());

    let executor = Executor::new(&sink);
    let outcome = executor.execute(&command, &denying_token, ExecConfig::no_timeout(), 0);
    assert!(matches!(outcome, Err(capgate::ExecError::AuthorityDenied)));
}

/// I5: a `SchemaStore` never activates a same-or-lower version for a
/// tool id that already has a stored schema.
#[test]
fn schema_store_never_downgrades_an_activated_version() {
    let mut store = SchemaStore::new();
    store.load(echo_schema_json().as_bytes()).expect("v1 loads");

    let same_version = echo_schema_json();
    let error = store.load(same_version.as_bytes()).expect_err("same version must be rejected");
    assert!(matches!(error, capgate::SchemaError::VersionDowngrade { .. }));

    let schema = store.get(&ToolId::try_from("test.echo").expect("valid id")).expect("schema present");
    assert_eq!(schema.version.as_u32(), 1);
}

/// I6: `validate` reports an empty list if and only if the invocation is
/// valid for the schema — a single missing required flag must appear in
/// the same pass as every other problem, never hide behind one failure.
#[test]
fn validator_reports_every_failure_in_one_pass() {
    let schema_json = r#"{
        "id": "git.commit",
        "name": "commit",
        "binary": "/usr/bin/git",
        "version": 1,
        "risk": "local_write",
        "flags": [
            {"name": "message", "arg_type": "string", "required": true},
            {"name": "all", "arg_type": "bool"}
        ],
        "positionals": []
    }"#;
    let mut store = SchemaStore::new();
    store.load(schema_json.as_bytes()).expect("schema loads");
    let schema = store.get(&ToolId::try_from("git.commit").expect("valid id")).expect("schema present");

    let parsed = ParsedArgs {
        flags: vec![ParsedFlag { name: "unknown".to_owned(), value: None }],
        positionals: Vec::new(),
    };

    let failures = validate(schema, &parsed);
    let kinds: Vec<ValidationErrorKind> = failures.iter().map(|f| f.kind).collect();
    assert!(kinds.contains(&ValidationErrorKind::UnknownFlag));
    assert!(kinds.contains(&ValidationErrorKind::MissingRequiredFlag));

    assert!(validate(schema, &ParsedArgs::new()).iter().any(|f| f.kind == ValidationErrorKind::MissingRequiredFlag));
}

/// I7: one bad step in a plan never blocks the rest — `dry_run` reports a
/// result for every step, and the failing step's position is the only one
/// marked invalid.
#[test]
fn plan_step_isolation_does_not_short_circuit_on_the_first_failure() {
    let mut store = SchemaStore::new();
    store.load(echo_schema_json().as_bytes()).expect("schema loads");

    let good_token = token(AuthorityLevel::ParameterizedTools, vec!["test.echo"], vec!["/bin/echo"], "/");
    let sink = capgate::audit::VecAuditSink::new();
    let runner = capgate::PlanRunner::new(&store, &good_token, &sink);

    let plan = capgate::Plan {
        plan_id: "p1".to_owned(),
        description: None,
        steps: vec![
            capgate::PlanStep {
                tool_id: "no.such.tool".to_owned(),
                params: Vec::new(),
                positionals: Vec::new(),
                justification: None,
                risk_score: None,
                capability_requests: Vec::new(),
            },
            capgate::PlanStep {
                tool_id: "test.echo".to_owned(),
                params: Vec::new(),
                positionals: Vec::new(),
                justification: None,
                risk_score: None,
                capability_requests: Vec::new(),
            },
        ],
    };

    let validation = runner.dry_run(&plan, 0);
    assert_eq!(validation.step_results.len(), 2);
    assert_eq!(validation.step_results[0], capgate::StepValidation::UnknownTool);
    assert_eq!(validation.step_results[1], capgate::StepValidation::Valid);
    assert_eq!(validation.failed_count(), 1);
}

/// I8: this core never writes back to the schema store or the authority
/// token it is handed — nothing resembling a learning or adaptation loop
/// is wired in, so repeated denials of the same input always produce the
/// same [`DenialReason`].
#[test]
fn repeated_denials_are_stable_because_nothing_here_learns() {
    let mut store = SchemaStore::new();
    store.load(echo_schema_json().as_bytes()).expect("schema loads");
    let schema = store.get(&ToolId::try_from("test.echo").expect("valid id")).expect("schema present");

    let denying_token = token(AuthorityLevel::Observe, vec!["test.echo"], vec!["/bin/echo"], "/");
    let command = CommandBuilder::new()
        .build(schema, &ParsedArgs::new(), PathBuf::from("/tmp"), Vec::new())
        .expect("empty args validate");

    let sink = capgate::audit::VecAuditSink::new();
    let enforcer = Enforcer::new(&sink);

    let first = enforcer.check(&denying_token, &command, 0);
    let second = enforcer.check(&denying_token, &command, 1);
    assert_eq!(first, second);
}
