// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The process-lifetime store of per-method verification outcomes.
//! Entries are keyed by back-end identity, source file, and the method's
//! content fingerprint; they carry the dependency hash the outcome was
//! produced under and every error in access-path form.

mod dependency;
mod fingerprint;
mod locator;

pub use dependency::*;
pub use fingerprint::*;
pub use locator::*;

use crate::VerificationError;
use argent_ast::Method;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    sync::RwLock,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub backend: String,
    pub file: PathBuf,
    pub fingerprint: Fingerprint,
}

/// A verification error in stored form: the template keeps its original
/// positions, the access paths recover the corresponding nodes in any
/// later AST with the same method shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedError {
    pub error: VerificationError,
    pub offending_path: AccessPath,
    /// Absent when the error's reason carries no position of its own.
    pub reason_path: Option<AccessPath>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub dependency_hash: Fingerprint,
    pub errors: Vec<LocalizedError>,
}

/// Concurrency-safe map from cache keys to entries. Writes are atomic per
/// method; between a lookup and a later update the last write wins, which
/// is sound because every write records the outcome for the exact
/// fingerprint in its key.
#[derive(Default)]
pub struct VerificationCache {
    entries: RwLock<FxHashMap<CacheKey, CacheEntry>>,
}

impl VerificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, backend: &str, file: &Path, fingerprint: Fingerprint) -> Option<CacheEntry> {
        let key = CacheKey {
            backend: backend.to_string(),
            file: file.to_path_buf(),
            fingerprint,
        };
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .cloned()
    }

    /// Store the outcome of verifying `method`. Every error is translated
    /// into access-path form relative to the method root; if any offending
    /// node cannot be found in the method the entry is not stored, since a
    /// hit on it could not replay all its diagnostics.
    pub fn update(
        &self,
        backend: &str,
        file: &Path,
        method: &Method,
        dependency_hash: Fingerprint,
        errors: &[VerificationError],
    ) -> bool {
        let mut localized = Vec::with_capacity(errors.len());
        for error in errors {
            let offending_path = match find_by_position(method, error.pos) {
                Some(path) => path,
                None => {
                    warn!(
                        "not caching method {}: offending node of `{}` at {} not found",
                        method.name,
                        error.full_id(),
                        error.pos
                    );
                    return false;
                }
            };
            let reason_path = if error.reason_pos.is_default() {
                None
            } else {
                let path = find_by_position(method, error.reason_pos);
                if path.is_none() {
                    debug!(
                        "reason node of `{}` at {} lies outside method {}; \
                         its position will not be rewritten on replay",
                        error.full_id(),
                        error.reason_pos,
                        method.name
                    );
                }
                path
            };
            localized.push(LocalizedError {
                error: error.clone(),
                offending_path,
                reason_path,
            });
        }

        let key = CacheKey {
            backend: backend.to_string(),
            file: file.to_path_buf(),
            fingerprint: fingerprint_of(method),
        };
        debug!(
            "caching {} error(s) for method {} under {}",
            localized.len(),
            method.name,
            key.fingerprint
        );
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(
                key,
                CacheEntry {
                    dependency_hash,
                    errors: localized,
                },
            );
        true
    }

    /// Insert a pre-localized entry. Exposed for embedders that relocate
    /// entries themselves.
    pub fn insert(&self, key: CacheKey, entry: CacheEntry) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, entry);
    }

    pub fn invalidate(&self, key: &CacheKey) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, VerificationError};
    use argent_ast::*;

    fn method_with_assert(pos_line: i32) -> Method {
        let assert_pos = Position::new(pos_line + 1, 3, 7);
        Method {
            name: "foo".to_string(),
            formal_args: vec![],
            formal_returns: vec![],
            local_vars: vec![],
            pres: vec![],
            posts: vec![],
            body: Some(vec![Stmt::Assert(false.into(), assert_pos)]),
            pos: Position::new(pos_line, 1, 1),
            end_line: pos_line + 2,
        }
    }

    #[test]
    fn update_then_get_round_trips() {
        let cache = VerificationCache::new();
        let method = method_with_assert(5);
        let error = VerificationError::new(
            ErrorKind::AssertFailed,
            "assert might fail",
            Position::new(6, 3, 7),
        );
        let deps_hash = fingerprint_of(&method);

        assert!(cache.update("silicon", Path::new("a.vpr"), &method, deps_hash, &[error]));
        assert_eq!(cache.len(), 1);

        let entry = cache
            .get("silicon", Path::new("a.vpr"), fingerprint_of(&method))
            .unwrap();
        assert_eq!(entry.dependency_hash, deps_hash);
        assert_eq!(entry.errors.len(), 1);
        assert_eq!(entry.errors[0].error.kind, ErrorKind::AssertFailed);

        // Same fingerprint, different backend or file: no entry.
        assert!(cache
            .get("carbon", Path::new("a.vpr"), fingerprint_of(&method))
            .is_none());
        assert!(cache
            .get("silicon", Path::new("b.vpr"), fingerprint_of(&method))
            .is_none());
    }

    #[test]
    fn unlocalizable_error_skips_the_entry() {
        let cache = VerificationCache::new();
        let method = method_with_assert(5);
        // No node of the method sits at line 50.
        let stray = VerificationError::new(
            ErrorKind::AssertFailed,
            "assert might fail",
            Position::new(50, 1, 999),
        );
        assert!(!cache.update(
            "silicon",
            Path::new("a.vpr"),
            &method,
            fingerprint_of(&method),
            &[stray]
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_removes_the_entry() {
        let cache = VerificationCache::new();
        let method = method_with_assert(5);
        let deps_hash = fingerprint_of(&method);
        assert!(cache.update("silicon", Path::new("a.vpr"), &method, deps_hash, &[]));

        let key = CacheKey {
            backend: "silicon".to_string(),
            file: PathBuf::from("a.vpr"),
            fingerprint: fingerprint_of(&method),
        };
        cache.invalidate(&key);
        assert!(cache.is_empty());
    }
}
