//! Literal-input end-to-end scenarios.

use std::path::PathBuf;

use capgate::{
    AuthorityLevel, AuthorityToken, CommandBuilder, Decision, Enforcer, ExecConfig, Executor,
    ParamEntry, Plan, PlanRunner, PlanStep, ParsedArgs, ParsedFlag, SchemaError, SchemaStore,
    StepValidation, ToolId, ValidationErrorKind,
};

fn true_schema_json() -> &'static str {
    r#"{
        "id": "test.true",
        "name": "true",
        "binary": "/bin/true",
        "version": 1,
        "risk": "safe",
        "flags": [],
        "positionals": []
    }"#
}

fn token_for(tool_id: &str, binary: &str, level: AuthorityLevel, fs_root: &str) -> AuthorityToken {
    let mut token = test_utils::permissive_token(tool_id, binary, fs_root);
    token.level = level;
    token
}

#[test]
fn scenario_1_happy_path_runs_successfully() {
    let mut store = SchemaStore::new();
    store.load(true_schema_json().as_bytes()).expect("schema loads");
    let schema = store.get(&ToolId::try_from("test.true").expect("valid id")).expect("schema present");

    let token = token_for("test.true", "/bin/true", AuthorityLevel::ParameterizedTools, "/");
    let command = CommandBuilder::new()
        .build(schema, &ParsedArgs::new(), PathBuf::from("/tmp"), Vec::new())
        .expect("empty args validate");

    let sink = capgate::audit::VecAuditSink::new();
    let executor = Executor::new(&sink);
    let result = executor
        .execute(&command, &token, ExecConfig::no_timeout(), 0)
        .expect("/bin/true spawns and runs");

    assert_eq!(result.exit_code, 0);
    assert!(!result.timed_out);
}

#[test]
fn scenario_2_observe_denial_emits_one_audit_event() {
    let mut store = SchemaStore::new();
    store.load(true_schema_json().as_bytes()).expect("schema loads");
    let schema = store.get(&ToolId::try_from("test.true").expect("valid id")).expect("schema present");

    let token = token_for("test.true", "/bin/true", AuthorityLevel::Observe, "/");
    let command = CommandBuilder::new()
        .build(schema, &ParsedArgs::new(), PathBuf::from("/tmp"), Vec::new())
        .expect("empty args validate");

    let sink = capgate::audit::VecAuditSink::new();

    let enforcer = Enforcer::new(&sink);
    let decision = enforcer.check(&token, &command, 0);
    assert!(matches!(decision, Decision::Denied(capgate::DenialReason::InsufficientLevel)));

    let executor = Executor::new(&sink);
    let error = executor
        .execute(&command, &token, ExecConfig::no_timeout(), 0)
        .expect_err("observe level must never execute");
    assert!(matches!(error, capgate::ExecError::AuthorityDenied));

    assert_eq!(sink.events().len(), 1);
}

#[test]
fn scenario_6_argv_is_built_in_the_documented_order() {
    let schema_json = r#"{
        "id": "git.commit",
        "name": "commit",
        "binary": "/usr/bin/git",
        "version": 1,
        "risk": "local_write",
        "flags": [
            {"name": "message", "short": 109, "arg_type": "string", "required": true},
            {"name": "all", "arg_type": "bool"}
        ],
        "positionals": []
    }"#;
    let mut store = SchemaStore::new();
    store.load(schema_json.as_bytes()).expect("schema loads");
    let schema = store.get(&ToolId::try_from("git.commit").expect("valid id")).expect("schema present");

    let parsed = ParsedArgs {
        flags: vec![
            ParsedFlag { name: "message".to_owned(), value: Some("test commit".to_owned()) },
            ParsedFlag { name: "all".to_owned(), value: None },
        ],
        positionals: Vec::new(),
    };

    let command_a = CommandBuilder::new()
        .build(schema, &parsed, PathBuf::from("/tmp"), Vec::new())
        .expect("valid invocation builds");
    let command_b = CommandBuilder::new()
        .build(schema, &parsed, PathBuf::from("/tmp"), Vec::new())
        .expect("valid invocation builds");

    let expected: Vec<String> = vec!["commit".to_owned(), "--message".to_owned(), "test commit".to_owned(), "--all".to_owned()];
    assert_eq!(command_a.args, expected);
    assert_eq!(command_a.args, command_b.args);
}

#[test]
fn scenario_4_missing_required_flag_fails_closed() {
    let schema_json = r#"{
        "id": "git.commit",
        "name": "commit",
        "binary": "/usr/bin/git",
        "version": 1,
        "risk": "local_write",
        "flags": [
            {"name": "message", "arg_type": "string", "required": true}
        ],
        "positionals": []
    }"#;
    let mut store = SchemaStore::new();
    store.load(schema_json.as_bytes()).expect("schema loads");
    let schema = store.get(&ToolId::try_from("git.commit").expect("valid id")).expect("schema present");

    let failures = capgate::validate(schema, &ParsedArgs::new());
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, ValidationErrorKind::MissingRequiredFlag);
    assert_eq!(failures[0].context, "message");

    let build_result = CommandBuilder::new().build(schema, &ParsedArgs::new(), PathBuf::from("/tmp"), Vec::new());
    assert!(build_result.is_err());
}

#[test]
fn scenario_3_version_downgrade_leaves_the_stored_schema_untouched() {
    let schema_v1 = r#"{
        "id": "git.commit",
        "name": "commit",
        "binary": "/usr/bin/git",
        "version": 1,
        "risk": "local_write",
        "flags": [],
        "positionals": []
    }"#;
    let mut store = SchemaStore::new();
    store.load(schema_v1.as_bytes()).expect("v1 loads");

    let error = store.load(schema_v1.as_bytes()).expect_err("same version reload must be rejected");
    assert!(matches!(error, SchemaError::VersionDowngrade { .. }));

    let schema = store.get(&ToolId::try_from("git.commit").expect("valid id")).expect("v1 still stored");
    assert_eq!(schema.version.as_u32(), 1);
}

#[test]
fn scenario_5_plan_with_mixed_outcomes_reports_every_step() {
    let schema_json = r#"{
        "id": "git.commit",
        "name": "commit",
        "binary": "/usr/bin/git",
        "version": 1,
        "risk": "local_write",
        "flags": [
            {"name": "message", "arg_type": "string", "required": true}
        ],
        "positionals": []
    }"#;
    let mut store = SchemaStore::new();
    store.load(schema_json.as_bytes()).expect("schema loads");

    let token = token_for("git.commit", "/usr/bin/git", AuthorityLevel::ParameterizedTools, "/");
    let sink = capgate::audit::VecAuditSink::new();
    let runner = PlanRunner::new(&store, &token, &sink);

    let plan = Plan {
        plan_id: "p1".to_owned(),
        description: None,
        steps: vec![
            PlanStep {
                tool_id: "git.commit".to_owned(),
                params: vec![ParamEntry { name: "message".to_owned(), value: Some("fix".to_owned()) }],
                positionals: Vec::new(),
                justification: None,
                risk_score: None,
                capability_requests: Vec::new(),
            },
            PlanStep {
                tool_id: "rm.everything".to_owned(),
                params: Vec::new(),
                positionals: Vec::new(),
                justification: None,
                risk_score: None,
                capability_requests: Vec::new(),
            },
            PlanStep {
                tool_id: "git.commit".to_owned(),
                params: Vec::new(),
                positionals: Vec::new(),
                justification: None,
                risk_score: None,
                capability_requests: Vec::new(),
            },
        ],
    };

    let validation = runner.dry_run(&plan, 0);
    assert!(!validation.all_valid());
    assert_eq!(validation.failed_count(), 2);
    assert_eq!(validation.step_results[0], StepValidation::Valid);
    assert_eq!(validation.step_results[1], StepValidation::UnknownTool);
    assert!(matches!(
        &validation.step_results[2],
        StepValidation::SchemaInvalid(failures)
            if failures.iter().any(|f| f.kind == ValidationErrorKind::MissingRequiredFlag)
    ));
}
