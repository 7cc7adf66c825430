// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The reference graph over top-level members and the per-method
//! dependency hash. A method depends on every function, predicate, domain,
//! and field its specification or body mentions, transitively through the
//! bodies and axioms of those members. Other methods are never
//! dependencies: editing one method must not invalidate another.

use crate::cache::fingerprint::{Fingerprint, MemberId, MemberKind, ProgramFingerprints};
use argent_ast::*;
use rustc_hash::{FxHashMap, FxHashSet};
use sha2::{Digest, Sha256};

pub struct DependencyResolver {
    /// Direct references of every member, resolved against the program's
    /// declared names.
    direct_refs: FxHashMap<MemberId, FxHashSet<MemberId>>,
}

impl DependencyResolver {
    pub fn new(program: &Program) -> Self {
        let mut direct_refs = FxHashMap::default();
        for method in &program.methods {
            let mut collector = RefCollector::new(program);
            collector.collect_method(method);
            direct_refs.insert((MemberKind::Method, method.name.clone()), collector.refs);
        }
        for function in &program.functions {
            let mut collector = RefCollector::new(program);
            collector.collect_function(function);
            direct_refs.insert(
                (MemberKind::Function, function.name.clone()),
                collector.refs,
            );
        }
        for predicate in &program.predicates {
            let mut collector = RefCollector::new(program);
            collector.collect_predicate(predicate);
            direct_refs.insert(
                (MemberKind::Predicate, predicate.name.clone()),
                collector.refs,
            );
        }
        for domain in &program.domains {
            let mut collector = RefCollector::new(program);
            collector.collect_domain(domain);
            direct_refs.insert((MemberKind::Domain, domain.name.clone()), collector.refs);
        }
        for field in &program.fields {
            let mut collector = RefCollector::new(program);
            collector.collect_type(&field.typ);
            direct_refs.insert((MemberKind::Field, field.name.clone()), collector.refs);
        }
        DependencyResolver { direct_refs }
    }

    /// The dependency set of a method: the method itself plus every
    /// transitively referenced non-method member, in canonical
    /// (kind, name) order. Reference cycles terminate on the visited set.
    pub fn dependencies(&self, method_name: &str) -> Vec<MemberId> {
        let root: MemberId = (MemberKind::Method, method_name.to_string());
        let mut visited: FxHashSet<MemberId> = FxHashSet::default();
        visited.insert(root.clone());
        let mut worklist: Vec<MemberId> = self
            .direct_refs
            .get(&root)
            .map(|refs| refs.iter().cloned().collect())
            .unwrap_or_default();
        while let Some(member) = worklist.pop() {
            if !visited.insert(member.clone()) {
                continue;
            }
            if let Some(refs) = self.direct_refs.get(&member) {
                for reference in refs {
                    if !visited.contains(reference) {
                        worklist.push(reference.clone());
                    }
                }
            }
        }
        let mut dependencies: Vec<MemberId> = visited.into_iter().collect();
        dependencies.sort();
        dependencies
    }

    /// Fold the fingerprints of the dependency set into a single hash.
    /// Changes iff the method or any member it transitively references
    /// changes content.
    pub fn dependency_hash(
        &self,
        method_name: &str,
        fingerprints: &ProgramFingerprints,
    ) -> Fingerprint {
        let mut digest = Sha256::new();
        for (kind, name) in self.dependencies(method_name) {
            if let Some(fingerprint) = fingerprints.get(kind, &name) {
                digest.update(fingerprint.0);
            }
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest.finalize());
        Fingerprint(bytes)
    }
}

/// Collects the member names a single member's AST mentions. Names are
/// resolved against the program: a mention only becomes a reference when
/// the program declares a member of the matching kind.
struct RefCollector<'p> {
    program: &'p Program,
    refs: FxHashSet<MemberId>,
}

impl<'p> RefCollector<'p> {
    fn new(program: &'p Program) -> Self {
        RefCollector {
            program,
            refs: FxHashSet::default(),
        }
    }

    fn add_function(&mut self, name: &str) {
        if self.program.get_function(name).is_some() {
            self.refs.insert((MemberKind::Function, name.to_string()));
        }
    }

    fn add_predicate(&mut self, name: &str) {
        if self.program.get_predicate(name).is_some() {
            self.refs.insert((MemberKind::Predicate, name.to_string()));
        }
    }

    fn add_domain(&mut self, name: &str) {
        if self.program.get_domain(name).is_some() {
            self.refs.insert((MemberKind::Domain, name.to_string()));
        }
    }

    fn add_field(&mut self, name: &str) {
        if self.program.get_field(name).is_some() {
            self.refs.insert((MemberKind::Field, name.to_string()));
        }
    }

    fn collect_method(&mut self, method: &Method) {
        for var in method
            .formal_args
            .iter()
            .chain(method.formal_returns.iter())
            .chain(method.local_vars.iter())
        {
            self.collect_type(&var.typ);
        }
        for expr in method.pres.iter().chain(method.posts.iter()) {
            self.collect_expr(expr);
        }
        if let Some(ref body) = method.body {
            for stmt in body {
                self.collect_stmt(stmt);
            }
        }
    }

    fn collect_function(&mut self, function: &Function) {
        for arg in &function.formal_args {
            self.collect_type(&arg.typ);
        }
        self.collect_type(&function.return_type);
        for expr in function.pres.iter().chain(function.posts.iter()) {
            self.collect_expr(expr);
        }
        if let Some(ref body) = function.body {
            self.collect_expr(body);
        }
    }

    fn collect_predicate(&mut self, predicate: &Predicate) {
        for arg in &predicate.formal_args {
            self.collect_type(&arg.typ);
        }
        if let Some(ref body) = predicate.body {
            self.collect_expr(body);
        }
    }

    fn collect_domain(&mut self, domain: &Domain) {
        for function in &domain.functions {
            for arg in &function.formal_args {
                self.collect_type(&arg.typ);
            }
            self.collect_type(&function.return_type);
        }
        for axiom in &domain.axioms {
            self.collect_expr(&axiom.expr);
        }
    }

    fn collect_type(&mut self, typ: &Type) {
        let mut domains = vec![];
        typ.collect_domains(&mut domains);
        for domain in domains {
            // A mention of the declaring domain inside itself is harmless:
            // it lands in the visited set anyway.
            self.add_domain(&domain);
        }
    }

    fn collect_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Fold(name, _, _, _) | Stmt::Unfold(name, _, _, _) => self.add_predicate(name),
            // Method-to-method references are deliberately not edges.
            Stmt::MethodCall(_, _, targets, _) => {
                for target in targets {
                    self.collect_type(&target.typ);
                }
            }
            _ => {}
        }
        for child in Node::Stmt(stmt).children() {
            match child {
                Node::Expr(expr) => self.collect_expr(expr),
                Node::Stmt(nested) => self.collect_stmt(nested),
            }
        }
    }

    fn collect_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Local(var, _) => self.collect_type(&var.typ),
            Expr::Field(_, field, _) => {
                self.add_field(&field.name);
                self.collect_type(&field.typ);
            }
            Expr::FuncApp(name, _, return_type, _) => {
                self.add_function(name);
                self.collect_type(return_type);
            }
            Expr::DomainFuncApp(_, domain, _, return_type, _) => {
                self.add_domain(domain);
                self.collect_type(return_type);
            }
            Expr::PredicateAccessPredicate(name, _, _, _) | Expr::Unfolding(name, _, _, _, _) => {
                self.add_predicate(name);
            }
            Expr::ForAll(vars, _, _, _)
            | Expr::Exists(vars, _, _, _) => {
                for var in vars {
                    self.collect_type(&var.typ);
                }
            }
            Expr::LetExpr(var, _, _, _) => self.collect_type(&var.typ),
            Expr::Seq(ty, _, _) | Expr::SetLit(ty, _, _) | Expr::MultisetLit(ty, _, _) => {
                self.collect_type(ty)
            }
            _ => {}
        }
        for child in Node::Expr(expr).children() {
            if let Node::Expr(nested) = child {
                self.collect_expr(nested);
            }
        }
    }
}
