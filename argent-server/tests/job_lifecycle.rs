use argent_ast::{Expr, Method, Position, Program, Stmt};
use argent_server::{spawn_job, BackendConfig, Frontend, FrontendConfig, ServerMessage};
use argent_verifier::{Backend, BackendRegistry, VerificationCache, VerificationResult};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct StubFrontend {
    program: Program,
    config: FrontendConfig,
}

impl StubFrontend {
    fn new() -> Self {
        StubFrontend {
            program: Program {
                name: "single".to_string(),
                domains: vec![],
                fields: vec![],
                methods: vec![Method {
                    name: "main".to_string(),
                    formal_args: vec![],
                    formal_returns: vec![],
                    local_vars: vec![],
                    pres: vec![],
                    posts: vec![],
                    body: Some(vec![Stmt::Assert(
                        Expr::from(true).set_pos(Position::new(2, 10, 11)),
                        Position::new(2, 3, 10),
                    )]),
                    pos: Position::new(1, 1, 1),
                    end_line: 3,
                }],
                functions: vec![],
                predicates: vec![],
            },
            config: FrontendConfig::new("tests/single.vpr"),
        }
    }
}

impl Frontend for StubFrontend {
    fn parse(&mut self) {}
    fn typecheck(&mut self) {}
    fn translate(&mut self) {}

    fn errors(&self) -> &[String] {
        &[]
    }

    fn program(&self) -> Option<&Program> {
        Some(&self.program)
    }

    fn config(&self) -> &FrontendConfig {
        &self.config
    }
}

struct TrivialBackend;

impl Backend for TrivialBackend {
    fn name(&self) -> &str {
        "trivial"
    }

    fn verify(&mut self, _program: &Program) -> VerificationResult {
        VerificationResult::Success
    }

    fn stop(&mut self) {}
}

struct PanickingBackend;

impl Backend for PanickingBackend {
    fn name(&self) -> &str {
        "panicking"
    }

    fn verify(&mut self, _program: &Program) -> VerificationResult {
        panic!("solver process disappeared")
    }

    fn stop(&mut self) {}
}

fn registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register("trivial", |_args| Box::new(TrivialBackend));
    registry.register("panicking", |_args| Box::new(PanickingBackend));
    registry
}

#[test]
fn a_job_streams_reports_and_ends_with_the_final_marker() {
    init_logging();
    let cache = Arc::new(VerificationCache::new());
    let handle = spawn_job(&registry(), &BackendConfig::new("trivial"), StubFrontend::new(), cache);

    let messages = handle.collect_messages();
    handle.join();

    assert!(matches!(messages[0], ServerMessage::ProgramOutline { .. }));
    assert!(matches!(
        messages.last(),
        Some(ServerMessage::FinalReport)
    ));
    assert!(messages
        .iter()
        .any(|m| matches!(m, ServerMessage::OverallSuccess { .. })));
}

#[test]
fn an_unknown_backend_is_a_configuration_error() {
    init_logging();
    let cache = Arc::new(VerificationCache::new());
    let handle = spawn_job(&registry(), &BackendConfig::new("carbon"), StubFrontend::new(), cache);

    let messages = handle.collect_messages();
    handle.join();

    assert_eq!(messages.len(), 2);
    match &messages[0] {
        ServerMessage::Exception { message } => assert!(message.contains("carbon")),
        other => panic!("expected an exception, found {:?}", other),
    }
    assert_eq!(messages[1], ServerMessage::FinalReport);
}

#[test]
fn a_panicking_backend_terminates_only_its_job() {
    init_logging();
    let cache = Arc::new(VerificationCache::new());
    let handle = spawn_job(&registry(), &BackendConfig::new("panicking"), StubFrontend::new(), cache.clone());

    let messages = handle.collect_messages();
    handle.join();

    assert!(messages.iter().any(
        |m| matches!(m, ServerMessage::Exception { message } if message.contains("panicked"))
    ));
    assert_eq!(messages.last(), Some(&ServerMessage::FinalReport));
    assert!(cache.is_empty());

    // The server is alive and well: a later job still runs.
    let handle = spawn_job(&registry(), &BackendConfig::new("trivial"), StubFrontend::new(), cache);
    let messages = handle.collect_messages();
    handle.join();
    assert!(messages
        .iter()
        .any(|m| matches!(m, ServerMessage::OverallSuccess { .. })));
}
