// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::VerificationResult;
use argent_ast::Program;
use rustc_hash::FxHashMap;

/// The contract every solver-driven back-end satisfies. The orchestrator
/// depends on nothing beyond it.
pub trait Backend: Send {
    /// A stable identity. Part of every cache key, so two back-ends that
    /// can disagree on a program must not share a name.
    fn name(&self) -> &str;

    fn verify(&mut self, program: &Program) -> VerificationResult;

    /// Tell the back-end to release its solver resources.
    fn stop(&mut self);
}

/// Builds a back-end instance from the job's extra verifier arguments.
pub type BackendFactory = Box<dyn Fn(&[String]) -> Box<dyn Backend> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("no verification back-end registered under `{0}`")]
    NotFound(String),
}

/// Maps back-end selectors to factories. Populated at startup with the
/// built-in back-ends and extended by explicit registration.
#[derive(Default)]
pub struct BackendRegistry {
    factories: FxHashMap<String, BackendFactory>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&[String]) -> Box<dyn Backend> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn resolve(
        &self,
        selector: &str,
        verifier_args: &[String],
    ) -> Result<Box<dyn Backend>, BackendError> {
        match self.factories.get(selector) {
            Some(factory) => Ok(factory(verifier_args)),
            None => Err(BackendError::NotFound(selector.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysSucceeds;

    impl Backend for AlwaysSucceeds {
        fn name(&self) -> &str {
            "always-succeeds"
        }

        fn verify(&mut self, _program: &Program) -> VerificationResult {
            VerificationResult::Success
        }

        fn stop(&mut self) {}
    }

    #[test]
    fn resolves_registered_backends() {
        let mut registry = BackendRegistry::new();
        registry.register("always-succeeds", |_args| Box::new(AlwaysSucceeds));

        assert!(registry.contains("always-succeeds"));
        let backend = registry.resolve("always-succeeds", &[]).unwrap();
        assert_eq!(backend.name(), "always-succeeds");

        let err = match registry.resolve("carbon", &[]) {
            Err(err) => err,
            Ok(_) => panic!("expected resolve to fail for an unregistered selector"),
        };
        assert!(matches!(err, BackendError::NotFound(ref name) if name == "carbon"));
    }
}
