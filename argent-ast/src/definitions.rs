// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Informational definition records, consumed by outline and
//! go-to-definition style tooling. Not involved in caching.

use crate::{ast::*, program::Program};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefinitionKind {
    Method,
    Function,
    Predicate,
    Domain,
    Argument,
    Return,
    Local,
    Axiom,
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    pub kind: DefinitionKind,
    pub pos: Position,
    /// The position of the enclosing member, for scoped declarations.
    pub scope: Option<Position>,
}

impl Definition {
    fn top_level(name: &str, kind: DefinitionKind, pos: Position) -> Self {
        Definition {
            name: name.to_string(),
            kind,
            pos,
            scope: None,
        }
    }

    fn scoped(name: &str, kind: DefinitionKind, scope: Position) -> Self {
        Definition {
            name: name.to_string(),
            kind,
            pos: scope,
            scope: Some(scope),
        }
    }
}

/// Top-level members only; powers the program outline report.
pub fn collect_members(program: &Program) -> Vec<Definition> {
    let mut members = vec![];
    for method in &program.methods {
        members.push(Definition::top_level(
            &method.name,
            DefinitionKind::Method,
            method.pos,
        ));
    }
    for function in &program.functions {
        members.push(Definition::top_level(
            &function.name,
            DefinitionKind::Function,
            function.pos,
        ));
    }
    for predicate in &program.predicates {
        members.push(Definition::top_level(
            &predicate.name,
            DefinitionKind::Predicate,
            predicate.pos,
        ));
    }
    for domain in &program.domains {
        members.push(Definition::top_level(
            &domain.name,
            DefinitionKind::Domain,
            domain.pos,
        ));
    }
    for field in &program.fields {
        members.push(Definition::top_level(
            &field.name,
            DefinitionKind::Field,
            Position::default(),
        ));
    }
    members
}

/// Every definition, including declarations scoped to a member.
pub fn collect_definitions(program: &Program) -> Vec<Definition> {
    let mut definitions = collect_members(program);
    for method in &program.methods {
        for arg in &method.formal_args {
            definitions.push(Definition::scoped(
                &arg.name,
                DefinitionKind::Argument,
                method.pos,
            ));
        }
        for ret in &method.formal_returns {
            definitions.push(Definition::scoped(
                &ret.name,
                DefinitionKind::Return,
                method.pos,
            ));
        }
        for local in &method.local_vars {
            definitions.push(Definition::scoped(
                &local.name,
                DefinitionKind::Local,
                method.pos,
            ));
        }
    }
    for function in &program.functions {
        for arg in &function.formal_args {
            definitions.push(Definition::scoped(
                &arg.name,
                DefinitionKind::Argument,
                function.pos,
            ));
        }
    }
    for domain in &program.domains {
        for axiom in &domain.axioms {
            definitions.push(Definition::scoped(
                &axiom.name,
                DefinitionKind::Axiom,
                domain.pos,
            ));
        }
    }
    definitions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_scoped_declarations() {
        let program = Program {
            name: "p".to_string(),
            domains: vec![],
            fields: vec![Field::new("val_int", Type::Int)],
            methods: vec![Method {
                name: "foo".to_string(),
                formal_args: vec![LocalVar::new("x", Type::Int)],
                formal_returns: vec![LocalVar::new("res", Type::Int)],
                local_vars: vec![LocalVar::new("tmp", Type::Int)],
                pres: vec![],
                posts: vec![],
                body: Some(vec![]),
                pos: Position::new(10, 1, 1),
                end_line: 20,
            }],
            functions: vec![],
            predicates: vec![],
        };

        let definitions = collect_definitions(&program);
        let kinds: Vec<DefinitionKind> = definitions.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DefinitionKind::Method,
                DefinitionKind::Field,
                DefinitionKind::Argument,
                DefinitionKind::Return,
                DefinitionKind::Local,
            ]
        );
        assert!(definitions
            .iter()
            .filter(|d| d.kind == DefinitionKind::Argument)
            .all(|d| d.scope == Some(Position::new(10, 1, 1))));
    }
}
