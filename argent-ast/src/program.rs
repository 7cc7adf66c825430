// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::ast::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub domains: Vec<Domain>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub functions: Vec<Function>,
    pub predicates: Vec<Predicate>,
}

impl Program {
    pub fn get_method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn get_predicate(&self, name: &str) -> Option<&Predicate> {
        self.predicates.iter().find(|p| p.name == name)
    }

    pub fn get_domain(&self, name: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.name == name)
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Rebuild the program with a different method list, preserving all
    /// shared declarations. Used to assemble the reduced program sent to
    /// the back-end.
    pub fn with_methods(&self, methods: Vec<Method>) -> Program {
        Program {
            name: self.name.clone(),
            domains: self.domains.clone(),
            fields: self.fields.clone(),
            methods,
            functions: self.functions.clone(),
            predicates: self.predicates.clone(),
        }
    }

    /// Visit each top-level expression of each member.
    /// Note: sub-expressions of expressions will not be visited.
    pub fn visit_expressions<F: FnMut(&Expr)>(&self, mut visitor: F) {
        for method in &self.methods {
            for expr in method.pres.iter().chain(method.posts.iter()) {
                visitor(expr);
            }
        }
        for function in &self.functions {
            for expr in function.pres.iter().chain(function.posts.iter()) {
                visitor(expr);
            }
            if let Some(ref body) = function.body {
                visitor(body);
            }
        }
        for predicate in &self.predicates {
            if let Some(ref body) = predicate.body {
                visitor(body);
            }
        }
        for domain in &self.domains {
            for axiom in &domain.axioms {
                visitor(&axiom.expr);
            }
        }
    }

    /// Visit each statement of each method body.
    pub fn visit_statements<F: FnMut(&Stmt)>(&self, mut visitor: F) {
        fn walk<F: FnMut(&Stmt)>(stmts: &[Stmt], visitor: &mut F) {
            for stmt in stmts {
                visitor(stmt);
                match stmt {
                    Stmt::Package(_, body, _) => walk(body, visitor),
                    Stmt::If(_, then_stmts, else_stmts, _) => {
                        walk(then_stmts, visitor);
                        walk(else_stmts, visitor);
                    }
                    Stmt::While(_, _, body, _) => walk(body, visitor),
                    _ => {}
                }
            }
        }
        for method in &self.methods {
            if let Some(ref body) = method.body {
                walk(body, &mut visitor);
            }
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "// program {}", self.name)?;
        for domain in &self.domains {
            writeln!(f, "{}", domain)?;
        }
        for field in &self.fields {
            writeln!(f, "field {}: {}", field.name, field.typ)?;
        }
        for function in &self.functions {
            writeln!(f, "{}", function)?;
        }
        for predicate in &self.predicates {
            writeln!(f, "{}", predicate)?;
        }
        for method in &self.methods {
            writeln!(f, "{}", method)?;
        }
        Ok(())
    }
}
