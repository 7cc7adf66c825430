// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-job verification pipeline: translate, consult the cache,
//! dispatch the reduced program, attribute fresh errors to their methods,
//! merge with replayed ones, and update the store.

use crate::{
    config,
    frontend::Frontend,
    job::CancellationToken,
    reporter::{JobFailure, Reporter, ServerMessage},
    stopwatch::Stopwatch,
};
use argent_ast::{collect_definitions, collect_members, Method, Program};
use argent_verifier::{
    locate, Backend, DependencyResolver, ProgramFingerprints, VerificationCache,
    VerificationError, VerificationResult,
};
use log::{debug, info, warn};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    Success,
    Failure(Vec<VerificationError>),
    /// Parsing, type-checking, or translation failed; the back-end was
    /// never consulted and the cache is untouched.
    TranslatorFailed(Vec<String>),
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A back-end error without a source line cannot be attributed to any
    /// method. This is a programming error in the back-end, not a state
    /// the pipeline can recover from.
    #[error("back-end reported an error without a source line: {message}")]
    MissingPosition { message: String },
    #[error("verification job cancelled")]
    Cancelled,
}

/// The methods that must go to the back-end and the errors that do not.
struct CacheConsultation {
    to_verify: Vec<Method>,
    /// Body-stripped copies of the methods whose results were replayed;
    /// they stay in the reduced program so transitively referenced scopes
    /// remain resolvable, but the back-end has no bodies to re-process.
    stubs: Vec<Method>,
    cached_errors: Vec<VerificationError>,
}

pub fn process_verification_request(
    frontend: &mut dyn Frontend,
    backend: &mut dyn Backend,
    cache: &VerificationCache,
    reporter: &dyn Reporter,
    token: &CancellationToken,
) -> Result<VerificationOutcome, ServerError> {
    let mut stopwatch = Stopwatch::start("argent-server", "translation");
    frontend.parse();
    if frontend.errors().is_empty() {
        frontend.typecheck();
    }
    if frontend.errors().is_empty() {
        frontend.translate();
    }
    let translation_errors = frontend.errors().to_vec();
    let program = match frontend.program() {
        Some(program) if translation_errors.is_empty() => program.clone(),
        _ => {
            let errors = if translation_errors.is_empty() {
                vec!["the front-end produced no program".to_string()]
            } else {
                translation_errors
            };
            let time_ms = stopwatch.finish().as_millis() as u64;
            reporter.report(ServerMessage::OverallFailure {
                backend: backend.name().to_string(),
                time_ms,
                failure: JobFailure::Translation(errors.clone()),
            });
            return Ok(VerificationOutcome::TranslatorFailed(errors));
        }
    };
    let file = frontend.config().file.clone();
    let caching_enabled = config::enable_cache() && !frontend.config().disable_cache;

    // Informational reports always precede the first back-end interaction.
    if !config::quiet() {
        reporter.report(ServerMessage::ProgramOutline {
            members: collect_members(&program),
        });
        reporter.report(ServerMessage::Statistics {
            methods: program.methods.len(),
            functions: program.functions.len(),
            predicates: program.predicates.len(),
            domains: program.domains.len(),
            fields: program.fields.len(),
        });
        reporter.report(ServerMessage::ProgramDefinitions {
            definitions: collect_definitions(&program),
        });
    }

    if token.is_cancelled() {
        return Err(ServerError::Cancelled);
    }

    if !caching_enabled {
        stopwatch.start_next("verification");
        let result = backend.verify(&program);
        let time_ms = stopwatch.finish().as_millis() as u64;
        return Ok(finish(reporter, backend.name(), time_ms, result.errors().to_vec()));
    }

    stopwatch.start_next("cache consultation");
    let fingerprints = ProgramFingerprints::of(&program);
    let resolver = DependencyResolver::new(&program);
    let consultation = consult_cache(
        &program,
        &file,
        backend.name(),
        cache,
        &fingerprints,
        &resolver,
    );

    if token.is_cancelled() {
        return Err(ServerError::Cancelled);
    }

    let result = if consultation.to_verify.is_empty() {
        info!("all methods replayed from the cache; skipping the back-end");
        VerificationResult::Success
    } else {
        let mut reduced_methods = consultation.to_verify.clone();
        reduced_methods.extend(consultation.stubs.iter().cloned());
        let reduced = program.with_methods(reduced_methods);
        debug!("reduced program:\n{}", reduced);
        stopwatch.start_next("verification");
        backend.verify(&reduced)
    };

    let fresh_errors = result.errors().to_vec();
    for error in &fresh_errors {
        if !error.pos.has_location() {
            return Err(ServerError::MissingPosition {
                message: error.message.clone(),
            });
        }
    }

    if token.is_cancelled() {
        // No cache writes for a cancelled job.
        return Err(ServerError::Cancelled);
    }

    stopwatch.start_next("cache update");
    for method in &consultation.to_verify {
        let method_errors = method_specific_errors(method, &fresh_errors);
        let dependency_hash = resolver.dependency_hash(&method.name, &fingerprints);
        cache.update(backend.name(), &file, method, dependency_hash, &method_errors);
    }

    let mut all_errors = fresh_errors;
    all_errors.extend(
        consultation
            .cached_errors
            .into_iter()
            .map(VerificationError::set_cached),
    );
    let time_ms = stopwatch.finish().as_millis() as u64;
    Ok(finish(reporter, backend.name(), time_ms, all_errors))
}

fn finish(
    reporter: &dyn Reporter,
    backend: &str,
    time_ms: u64,
    errors: Vec<VerificationError>,
) -> VerificationOutcome {
    if errors.is_empty() {
        reporter.report(ServerMessage::OverallSuccess {
            backend: backend.to_string(),
            time_ms,
        });
        VerificationOutcome::Success
    } else {
        reporter.report(ServerMessage::OverallFailure {
            backend: backend.to_string(),
            time_ms,
            failure: JobFailure::Verification(errors.clone()),
        });
        VerificationOutcome::Failure(errors)
    }
}

/// Partition the program's methods by cache state. A hit replays its
/// errors with positions rewritten against the current AST; a miss, a
/// stale dependency hash, or any unresolvable access path sends the
/// method back to the back-end.
fn consult_cache(
    program: &Program,
    file: &Path,
    backend: &str,
    cache: &VerificationCache,
    fingerprints: &ProgramFingerprints,
    resolver: &DependencyResolver,
) -> CacheConsultation {
    let mut to_verify = vec![];
    let mut stubs = vec![];
    let mut cached_errors = vec![];
    let mut hits = 0usize;

    for method in &program.methods {
        let fingerprint = match fingerprints.method(&method.name) {
            Some(fingerprint) => fingerprint,
            None => {
                to_verify.push(method.clone());
                continue;
            }
        };
        let entry = match cache.get(backend, file, fingerprint) {
            Some(entry) => entry,
            None => {
                debug!("cache miss for method {}", method.name);
                to_verify.push(method.clone());
                continue;
            }
        };
        if entry.dependency_hash != resolver.dependency_hash(&method.name, fingerprints) {
            debug!(
                "cache hit for method {} discarded: a dependency changed",
                method.name
            );
            to_verify.push(method.clone());
            continue;
        }
        match replay_errors(method, &entry.errors) {
            Some(errors) => {
                hits += 1;
                cached_errors.extend(errors);
                stubs.push(method.strip_body());
            }
            None => {
                warn!(
                    "cache hit for method {} discarded: an access path did not resolve",
                    method.name
                );
                to_verify.push(method.clone());
            }
        }
    }

    info!(
        "cache consultation: {} hit(s), {} miss(es)",
        hits,
        to_verify.len()
    );
    CacheConsultation {
        to_verify,
        stubs,
        cached_errors,
    }
}

/// Rewrite every stored error of a method against its current AST.
/// Returns `None` if any access path fails to resolve; a hit never
/// silently produces wrong positions.
fn replay_errors(
    method: &Method,
    stored: &[argent_verifier::LocalizedError],
) -> Option<Vec<VerificationError>> {
    let mut replayed = Vec::with_capacity(stored.len());
    for localized in stored {
        let offending = locate(method, &localized.offending_path)?;
        let mut error = localized.error.clone();
        error.pos = offending.pos();
        if let Some(ref reason_path) = localized.reason_path {
            let reason = locate(method, reason_path)?;
            error.reason_pos = reason.pos();
        }
        replayed.push(error);
    }
    Some(replayed)
}

/// The errors whose position falls within the method's line range. An
/// error outside every method's range belongs to no method and is only
/// surfaced in the current run.
fn method_specific_errors(
    method: &Method,
    errors: &[VerificationError],
) -> Vec<VerificationError> {
    errors
        .iter()
        .filter(|error| method.contains_line(error.pos.line()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use argent_ast::*;
    use argent_verifier::ErrorKind;

    fn method_spanning(name: &str, start: i32, end: i32) -> Method {
        Method {
            name: name.to_string(),
            formal_args: vec![],
            formal_returns: vec![],
            local_vars: vec![],
            pres: vec![],
            posts: vec![],
            body: Some(vec![]),
            pos: Position::new(start, 1, 1),
            end_line: end,
        }
    }

    #[test]
    fn errors_are_attributed_by_line_range() {
        let foo = method_spanning("foo", 1, 10);
        let bar = method_spanning("bar", 12, 20);
        let errors = vec![
            VerificationError::new(ErrorKind::AssertFailed, "in foo", Position::new(5, 1, 1)),
            VerificationError::new(ErrorKind::AssertFailed, "in bar", Position::new(12, 1, 2)),
            VerificationError::new(ErrorKind::AssertFailed, "nowhere", Position::new(11, 1, 3)),
        ];
        let foo_errors = method_specific_errors(&foo, &errors);
        assert_eq!(foo_errors.len(), 1);
        assert_eq!(foo_errors[0].message, "in foo");
        let bar_errors = method_specific_errors(&bar, &errors);
        assert_eq!(bar_errors.len(), 1);
        assert_eq!(bar_errors[0].message, "in bar");
    }
}
