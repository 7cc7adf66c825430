use argent_ast::*;
use argent_server::{
    process_verification_request, CancellationToken, Frontend, FrontendConfig, JobFailure,
    NullReporter, Reporter, ServerError, ServerMessage, VerificationOutcome,
};
use argent_verifier::{
    fingerprint_of, Backend, CacheKey, ErrorKind, VerificationCache, VerificationError,
    VerificationResult,
};
use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{Arc, Mutex},
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct StubFrontend {
    program: Program,
    errors: Vec<String>,
    config: FrontendConfig,
}

impl StubFrontend {
    fn new(program: Program) -> Self {
        StubFrontend {
            program,
            errors: vec![],
            config: FrontendConfig::new("tests/program.vpr"),
        }
    }
}

impl Frontend for StubFrontend {
    fn parse(&mut self) {}
    fn typecheck(&mut self) {}
    fn translate(&mut self) {}

    fn errors(&self) -> &[String] {
        &self.errors
    }

    fn program(&self) -> Option<&Program> {
        Some(&self.program)
    }

    fn config(&self) -> &FrontendConfig {
        &self.config
    }
}

/// Records which methods it is asked to verify and fails the scripted ones
/// at their first assert statement.
struct ScriptedBackend {
    failing: HashSet<String>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedBackend {
    fn new(failing: &[&str]) -> Self {
        ScriptedBackend {
            failing: failing.iter().map(|name| name.to_string()).collect(),
            calls: Arc::new(Mutex::new(vec![])),
        }
    }

    fn verified_method_sets(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Backend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn verify(&mut self, program: &Program) -> VerificationResult {
        let mut names = vec![];
        let mut errors = vec![];
        for method in &program.methods {
            let body = match &method.body {
                Some(body) => body,
                // A body-stripped stub is not re-verified.
                None => continue,
            };
            names.push(method.name.clone());
            if !self.failing.contains(&method.name) {
                continue;
            }
            if let Some(Stmt::Assert(expr, pos)) =
                body.iter().find(|stmt| matches!(stmt, Stmt::Assert(..)))
            {
                errors.push(
                    VerificationError::new(
                        ErrorKind::AssertFailed,
                        "the asserted expression might not hold",
                        *pos,
                    )
                    .with_reason_pos(expr.pos()),
                );
            }
        }
        self.calls.lock().unwrap().push(names);
        if errors.is_empty() {
            VerificationResult::Success
        } else {
            VerificationResult::Failure(errors)
        }
    }

    fn stop(&mut self) {}
}

/// `foo` holds `acc(pf())` and asserts `x == <foo_literal>`; `bar` is
/// independent of `pf`. Every node position is derived from `line_offset`
/// so a "blank line inserted" edit is just a different offset.
fn make_program(foo_literal: i64, pf_literal: i64, line_offset: i32) -> Program {
    let l = line_offset;
    let foo_assert_expr = Expr::eq_cmp(
        Expr::local(LocalVar::new("x", Type::Int)).set_pos(Position::new(l + 3, 12, 103)),
        foo_literal.into(),
    )
    .set_pos(Position::new(l + 3, 10, 102));
    let foo = Method {
        name: "foo".to_string(),
        formal_args: vec![LocalVar::new("x", Type::Int)],
        formal_returns: vec![],
        local_vars: vec![],
        pres: vec![
            Expr::pred_permission("pf", vec![], PermAmount::Write)
                .set_pos(Position::new(l + 2, 14, 101)),
        ],
        posts: vec![],
        body: Some(vec![Stmt::Assert(
            foo_assert_expr,
            Position::new(l + 3, 3, 104),
        )]),
        pos: Position::new(l + 1, 1, 100),
        end_line: l + 10,
    };
    let bar = Method {
        name: "bar".to_string(),
        formal_args: vec![],
        formal_returns: vec![],
        local_vars: vec![],
        pres: vec![],
        posts: vec![],
        body: Some(vec![Stmt::Assert(
            Expr::from(true).set_pos(Position::new(l + 13, 10, 202)),
            Position::new(l + 13, 3, 201),
        )]),
        pos: Position::new(l + 12, 1, 200),
        end_line: l + 20,
    };
    let pf = Predicate {
        name: "pf".to_string(),
        formal_args: vec![],
        body: Some(Expr::eq_cmp(pf_literal.into(), pf_literal.into())),
        pos: Position::new(l + 22, 1, 300),
    };
    Program {
        name: "scenario".to_string(),
        domains: vec![],
        fields: vec![],
        methods: vec![foo, bar],
        functions: vec![],
        predicates: vec![pf],
    }
}

fn run(
    program: Program,
    backend: &mut ScriptedBackend,
    cache: &VerificationCache,
    reporter: &dyn Reporter,
) -> VerificationOutcome {
    let mut frontend = StubFrontend::new(program);
    process_verification_request(
        &mut frontend,
        backend,
        cache,
        reporter,
        &CancellationToken::new(),
    )
    .unwrap()
}

#[test]
fn cold_run_verifies_and_stores_every_method() {
    init_logging();
    let cache = VerificationCache::new();
    let mut backend = ScriptedBackend::new(&["foo"]);

    let outcome = run(make_program(1, 7, 0), &mut backend, &cache, &NullReporter);

    assert_eq!(backend.verified_method_sets(), vec![vec![
        "foo".to_string(),
        "bar".to_string()
    ]]);
    assert_eq!(cache.len(), 2);
    match outcome {
        VerificationOutcome::Failure(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(!errors[0].cached);
            assert_eq!(errors[0].pos.line(), 3);
        }
        other => panic!("expected a failure, found {:?}", other),
    }
}

#[test]
fn warm_run_skips_the_backend_and_replays_errors() {
    init_logging();
    let cache = VerificationCache::new();
    let mut backend = ScriptedBackend::new(&["foo"]);

    let cold = run(make_program(1, 7, 0), &mut backend, &cache, &NullReporter);
    let warm = run(make_program(1, 7, 0), &mut backend, &cache, &NullReporter);

    // One back-end call in total: the warm run replayed everything.
    assert_eq!(backend.verified_method_sets().len(), 1);
    let (cold_errors, warm_errors) = match (cold, warm) {
        (VerificationOutcome::Failure(cold), VerificationOutcome::Failure(warm)) => (cold, warm),
        other => panic!("expected two failures, found {:?}", other),
    };
    assert_eq!(warm_errors.len(), cold_errors.len());
    assert!(warm_errors.iter().all(|e| e.cached));
    assert_eq!(warm_errors[0].kind, cold_errors[0].kind);
    assert_eq!(warm_errors[0].pos, cold_errors[0].pos);
}

#[test]
fn changed_body_is_reverified_alone() {
    init_logging();
    let cache = VerificationCache::new();
    let mut backend = ScriptedBackend::new(&["foo"]);

    run(make_program(1, 7, 0), &mut backend, &cache, &NullReporter);
    let outcome = run(make_program(2, 7, 0), &mut backend, &cache, &NullReporter);

    let calls = backend.verified_method_sets();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], vec!["foo".to_string()]);
    match outcome {
        VerificationOutcome::Failure(errors) => {
            // foo's fresh error plus nothing from bar.
            assert_eq!(errors.len(), 1);
            assert!(!errors[0].cached);
        }
        other => panic!("expected a failure, found {:?}", other),
    }
}

#[test]
fn changed_dependency_invalidates_only_its_callers() {
    init_logging();
    let cache = VerificationCache::new();
    let mut backend = ScriptedBackend::new(&[]);

    run(make_program(1, 7, 0), &mut backend, &cache, &NullReporter);
    // Edit the shared predicate: foo mentions it, bar does not.
    run(make_program(1, 8, 0), &mut backend, &cache, &NullReporter);

    let calls = backend.verified_method_sets();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], vec!["foo".to_string()]);
}

#[test]
fn position_only_edit_replays_with_shifted_positions() {
    init_logging();
    let cache = VerificationCache::new();
    let mut backend = ScriptedBackend::new(&["foo"]);

    run(make_program(1, 7, 0), &mut backend, &cache, &NullReporter);
    let outcome = run(make_program(1, 7, 1), &mut backend, &cache, &NullReporter);

    // No second back-end invocation.
    assert_eq!(backend.verified_method_sets().len(), 1);
    match outcome {
        VerificationOutcome::Failure(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].cached);
            // The assert moved from line 3 to line 4; so did its reason.
            assert_eq!(errors[0].pos.line(), 4);
            assert_eq!(errors[0].reason_pos.line(), 4);
            assert_eq!(errors[0].reason_pos.column(), 10);
        }
        other => panic!("expected a failure, found {:?}", other),
    }
}

#[test]
fn corrupted_access_path_falls_back_to_reverification() {
    init_logging();
    let cache = VerificationCache::new();
    let mut backend = ScriptedBackend::new(&["foo"]);

    let program = make_program(1, 7, 0);
    let cold = run(program.clone(), &mut backend, &cache, &NullReporter);

    // Corrupt the stored path of foo's error: the recorded variant tag no
    // longer matches the tree.
    let key = CacheKey {
        backend: "scripted".to_string(),
        file: PathBuf::from("tests/program.vpr"),
        fingerprint: fingerprint_of(&program.methods[0]),
    };
    let mut entry = cache
        .get("scripted", &key.file, key.fingerprint)
        .expect("foo must be cached after the cold run");
    entry.errors[0].offending_path.0[0].kind = NodeKind::Inhale;
    cache.insert(key, entry);

    let rerun = run(program, &mut backend, &cache, &NullReporter);

    let calls = backend.verified_method_sets();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], vec!["foo".to_string()]);
    assert_eq!(rerun, cold);
    if let VerificationOutcome::Failure(errors) = rerun {
        assert!(!errors[0].cached);
    }
}

#[test]
fn reports_precede_the_backend_and_the_final_message_closes_the_run() {
    init_logging();
    struct CollectingReporter(Mutex<Vec<ServerMessage>>);
    impl Reporter for CollectingReporter {
        fn report(&self, message: ServerMessage) {
            self.0.lock().unwrap().push(message);
        }
    }

    let cache = VerificationCache::new();
    let mut backend = ScriptedBackend::new(&[]);
    let reporter = CollectingReporter(Mutex::new(vec![]));

    run(make_program(1, 7, 0), &mut backend, &cache, &reporter);

    let messages = reporter.0.into_inner().unwrap();
    assert!(matches!(messages[0], ServerMessage::ProgramOutline { .. }));
    assert!(matches!(
        messages[1],
        ServerMessage::Statistics {
            methods: 2,
            functions: 0,
            predicates: 1,
            domains: 0,
            fields: 0
        }
    ));
    assert!(matches!(
        messages[2],
        ServerMessage::ProgramDefinitions { .. }
    ));
    assert!(matches!(
        messages.last(),
        Some(ServerMessage::OverallSuccess { .. })
    ));
}

#[test]
fn translator_errors_leave_the_cache_untouched() {
    init_logging();
    let cache = VerificationCache::new();
    let mut backend = ScriptedBackend::new(&[]);
    let mut frontend = StubFrontend::new(make_program(1, 7, 0));
    frontend.errors = vec!["type error: expected Int".to_string()];

    struct CollectingReporter(Mutex<Vec<ServerMessage>>);
    impl Reporter for CollectingReporter {
        fn report(&self, message: ServerMessage) {
            self.0.lock().unwrap().push(message);
        }
    }
    let reporter = CollectingReporter(Mutex::new(vec![]));

    let outcome = process_verification_request(
        &mut frontend,
        &mut backend,
        &cache,
        &reporter,
        &CancellationToken::new(),
    )
    .unwrap();

    assert!(matches!(outcome, VerificationOutcome::TranslatorFailed(_)));
    assert!(cache.is_empty());
    assert!(backend.verified_method_sets().is_empty());
    let messages = reporter.0.into_inner().unwrap();
    assert!(matches!(
        messages.last(),
        Some(ServerMessage::OverallFailure {
            failure: JobFailure::Translation(_),
            ..
        })
    ));
}

#[test]
fn cancellation_before_dispatch_writes_nothing() {
    init_logging();
    let cache = VerificationCache::new();
    let mut backend = ScriptedBackend::new(&[]);
    let mut frontend = StubFrontend::new(make_program(1, 7, 0));
    let token = CancellationToken::new();
    token.cancel();

    let result = process_verification_request(
        &mut frontend,
        &mut backend,
        &cache,
        &NullReporter,
        &token,
    );

    assert!(matches!(result, Err(ServerError::Cancelled)));
    assert!(cache.is_empty());
    assert!(backend.verified_method_sets().is_empty());
}

#[test]
fn an_error_without_a_line_is_fatal() {
    init_logging();
    struct BrokenBackend;
    impl Backend for BrokenBackend {
        fn name(&self) -> &str {
            "broken"
        }
        fn verify(&mut self, _program: &Program) -> VerificationResult {
            VerificationResult::Failure(vec![VerificationError::new(
                ErrorKind::Internal,
                "no position attached",
                Position::default(),
            )])
        }
        fn stop(&mut self) {}
    }

    let cache = VerificationCache::new();
    let mut frontend = StubFrontend::new(make_program(1, 7, 0));
    let result = process_verification_request(
        &mut frontend,
        &mut BrokenBackend,
        &cache,
        &NullReporter,
        &CancellationToken::new(),
    );

    assert!(matches!(result, Err(ServerError::MissingPosition { .. })));
    assert!(cache.is_empty());
}
