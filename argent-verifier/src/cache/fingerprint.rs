// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use argent_ast::Program;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// A content hash of an AST subtree. Positions and other transient
/// metadata never enter the digest, so two syntactically identical
/// subtrees fingerprint equally regardless of where they appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Streams the AST's position-ignoring `Hash` impls into a SHA-256 digest.
/// The 64-bit `finish` exists only to satisfy the `Hasher` contract;
/// fingerprints are read through `finalize`.
pub struct DigestHasher {
    digest: Sha256,
}

impl DigestHasher {
    pub fn new() -> Self {
        DigestHasher {
            digest: Sha256::new(),
        }
    }

    pub fn finalize(self) -> Fingerprint {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&self.digest.finalize());
        Fingerprint(bytes)
    }
}

impl Default for DigestHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for DigestHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.digest.update(bytes);
    }

    fn finish(&self) -> u64 {
        let digest = self.digest.clone().finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}

/// Fingerprint an AST node, or anything else whose `Hash` is structural.
pub fn fingerprint_of<T: Hash + ?Sized>(node: &T) -> Fingerprint {
    let mut hasher = DigestHasher::new();
    node.hash(&mut hasher);
    hasher.finalize()
}

/// The kinds of top-level members. The derived order is the canonical
/// order used when folding dependency sets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum MemberKind {
    Domain,
    Field,
    Function,
    Method,
    Predicate,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemberKind::Domain => write!(f, "domain"),
            MemberKind::Field => write!(f, "field"),
            MemberKind::Function => write!(f, "function"),
            MemberKind::Method => write!(f, "method"),
            MemberKind::Predicate => write!(f, "predicate"),
        }
    }
}

/// A top-level member reference: kind plus name.
pub type MemberId = (MemberKind, String);

/// Per-program memo table of member fingerprints. Each member's tree is
/// walked exactly once per verification run; every later lookup is a map
/// access.
pub struct ProgramFingerprints {
    members: FxHashMap<MemberId, Fingerprint>,
}

impl ProgramFingerprints {
    pub fn of(program: &Program) -> Self {
        let mut members = FxHashMap::default();
        for method in &program.methods {
            members.insert(
                (MemberKind::Method, method.name.clone()),
                fingerprint_of(method),
            );
        }
        for function in &program.functions {
            members.insert(
                (MemberKind::Function, function.name.clone()),
                fingerprint_of(function),
            );
        }
        for predicate in &program.predicates {
            members.insert(
                (MemberKind::Predicate, predicate.name.clone()),
                fingerprint_of(predicate),
            );
        }
        for domain in &program.domains {
            members.insert(
                (MemberKind::Domain, domain.name.clone()),
                fingerprint_of(domain),
            );
        }
        for field in &program.fields {
            members.insert(
                (MemberKind::Field, field.name.clone()),
                fingerprint_of(field),
            );
        }
        ProgramFingerprints { members }
    }

    pub fn get(&self, kind: MemberKind, name: &str) -> Option<Fingerprint> {
        self.members.get(&(kind, name.to_string())).copied()
    }

    pub fn method(&self, name: &str) -> Option<Fingerprint> {
        self.get(MemberKind::Method, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argent_ast::*;

    fn sample_method(pos: Position, end_line: i32) -> Method {
        Method {
            name: "foo".to_string(),
            formal_args: vec![LocalVar::new("x", Type::Int)],
            formal_returns: vec![],
            local_vars: vec![],
            pres: vec![Expr::ge_cmp(
                Expr::local(LocalVar::new("x", Type::Int)).set_pos(pos),
                0.into(),
            )],
            posts: vec![],
            body: Some(vec![Stmt::Assert(
                Expr::ge_cmp(Expr::local(LocalVar::new("x", Type::Int)), 0.into()),
                pos,
            )]),
            pos,
            end_line,
        }
    }

    #[test]
    fn fingerprint_ignores_positions() {
        let a = sample_method(Position::new(1, 1, 10), 5);
        let b = sample_method(Position::new(42, 3, 999), 61);
        assert_eq!(fingerprint_of(&a), fingerprint_of(&b));
    }

    #[test]
    fn fingerprint_sees_literals_and_names() {
        let a = sample_method(Position::new(1, 1, 10), 5);
        let mut renamed = a.clone();
        renamed.formal_args[0].name = "y".to_string();
        assert_ne!(fingerprint_of(&a), fingerprint_of(&renamed));

        let mut different_literal = a.clone();
        different_literal.pres[0] = Expr::ge_cmp(
            Expr::local(LocalVar::new("x", Type::Int)),
            1.into(),
        );
        assert_ne!(fingerprint_of(&a), fingerprint_of(&different_literal));
    }

    #[test]
    fn memo_table_covers_all_member_kinds() {
        let program = Program {
            name: "p".to_string(),
            domains: vec![Domain {
                name: "Pair".to_string(),
                functions: vec![],
                axioms: vec![],
                pos: Position::default(),
            }],
            fields: vec![Field::new("val_int", Type::Int)],
            methods: vec![sample_method(Position::new(1, 1, 1), 5)],
            functions: vec![Function {
                name: "get".to_string(),
                formal_args: vec![],
                return_type: Type::Int,
                pres: vec![],
                posts: vec![],
                body: None,
                pos: Position::default(),
            }],
            predicates: vec![Predicate {
                name: "pf".to_string(),
                formal_args: vec![],
                body: None,
                pos: Position::default(),
            }],
        };
        let fingerprints = ProgramFingerprints::of(&program);
        assert!(fingerprints.method("foo").is_some());
        assert!(fingerprints.get(MemberKind::Function, "get").is_some());
        assert!(fingerprints.get(MemberKind::Predicate, "pf").is_some());
        assert!(fingerprints.get(MemberKind::Domain, "Pair").is_some());
        assert!(fingerprints.get(MemberKind::Field, "val_int").is_some());
        assert!(fingerprints.method("bar").is_none());
    }
}
