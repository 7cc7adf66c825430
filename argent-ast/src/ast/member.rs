// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::ast::{common::*, expr::*, stmt::*};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// A top-level procedure. The unit of caching: two methods with equal
/// content hashes are interchangeable for the back-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub formal_args: Vec<LocalVar>,
    pub formal_returns: Vec<LocalVar>,
    pub local_vars: Vec<LocalVar>,
    pub pres: Vec<Expr>,
    pub posts: Vec<Expr>,
    pub body: Option<Vec<Stmt>>,
    pub pos: Position,
    pub end_line: i32,
}

impl Method {
    /// The inclusive source line range covered by this method.
    pub fn line_range(&self) -> (i32, i32) {
        (self.pos.line(), self.end_line)
    }

    pub fn contains_line(&self, line: i32) -> bool {
        let (start, end) = self.line_range();
        start <= line && line <= end
    }

    /// A copy without the body, used when a verified method only has to
    /// remain resolvable as part of a reduced program.
    pub fn strip_body(&self) -> Method {
        Method {
            body: None,
            local_vars: vec![],
            ..self.clone()
        }
    }
}

impl PartialEq for Method {
    /// Compare ignoring `pos` and `end_line`.
    fn eq(&self, other: &Self) -> bool {
        (
            &self.name,
            &self.formal_args,
            &self.formal_returns,
            &self.local_vars,
            &self.pres,
            &self.posts,
            &self.body,
        ) == (
            &other.name,
            &other.formal_args,
            &other.formal_returns,
            &other.local_vars,
            &other.pres,
            &other.posts,
            &other.body,
        )
    }
}

impl Eq for Method {}

impl Hash for Method {
    /// Hash ignoring `pos` and `end_line`.
    fn hash<H: Hasher>(&self, state: &mut H) {
        (
            &self.name,
            &self.formal_args,
            &self.formal_returns,
            &self.local_vars,
            &self.pres,
            &self.posts,
            &self.body,
        )
            .hash(state)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "method {}(", self.name)?;
        let mut first = true;
        for arg in &self.formal_args {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
            first = false;
        }
        write!(f, ")")?;
        if !self.formal_returns.is_empty() {
            write!(
                f,
                " returns ({})",
                self.formal_returns
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<String>>()
                    .join(", ")
            )?;
        }
        writeln!(f)?;
        for pre in &self.pres {
            writeln!(f, "  requires {}", pre)?;
        }
        for post in &self.posts {
            writeln!(f, "  ensures {}", post)?;
        }
        if let Some(ref body) = self.body {
            writeln!(f, "{{")?;
            for stmt in body {
                writeln!(f, "  {}", stmt)?;
            }
            write!(f, "}}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub formal_args: Vec<LocalVar>,
    pub return_type: Type,
    pub pres: Vec<Expr>,
    pub posts: Vec<Expr>,
    pub body: Option<Expr>,
    pub pos: Position,
}

impl PartialEq for Function {
    /// Compare ignoring `pos`.
    fn eq(&self, other: &Self) -> bool {
        (
            &self.name,
            &self.formal_args,
            &self.return_type,
            &self.pres,
            &self.posts,
            &self.body,
        ) == (
            &other.name,
            &other.formal_args,
            &other.return_type,
            &other.pres,
            &other.posts,
            &other.body,
        )
    }
}

impl Eq for Function {}

impl Hash for Function {
    /// Hash ignoring `pos`.
    fn hash<H: Hasher>(&self, state: &mut H) {
        (
            &self.name,
            &self.formal_args,
            &self.return_type,
            &self.pres,
            &self.posts,
            &self.body,
        )
            .hash(state)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "function {}(", self.name)?;
        let mut first = true;
        for arg in &self.formal_args {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
            first = false;
        }
        writeln!(f, "): {}", self.return_type)?;
        for pre in &self.pres {
            writeln!(f, "  requires {}", pre)?;
        }
        for post in &self.posts {
            writeln!(f, "  ensures {}", post)?;
        }
        if let Some(ref body) = self.body {
            writeln!(f, "{{")?;
            writeln!(f, "  {}", body)?;
            write!(f, "}}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predicate {
    pub name: String,
    pub formal_args: Vec<LocalVar>,
    pub body: Option<Expr>,
    pub pos: Position,
}

impl Predicate {
    pub fn is_abstract(&self) -> bool {
        self.body.is_none()
    }
}

impl PartialEq for Predicate {
    /// Compare ignoring `pos`.
    fn eq(&self, other: &Self) -> bool {
        (&self.name, &self.formal_args, &self.body)
            == (&other.name, &other.formal_args, &other.body)
    }
}

impl Eq for Predicate {}

impl Hash for Predicate {
    /// Hash ignoring `pos`.
    fn hash<H: Hasher>(&self, state: &mut H) {
        (&self.name, &self.formal_args, &self.body).hash(state)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "predicate {}({})",
            self.name,
            self.formal_args
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        )?;
        if let Some(ref body) = self.body {
            write!(f, " {{ {} }}", body)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    pub functions: Vec<DomainFunc>,
    pub axioms: Vec<DomainAxiom>,
    pub pos: Position,
}

impl PartialEq for Domain {
    /// Compare ignoring `pos`.
    fn eq(&self, other: &Self) -> bool {
        (&self.name, &self.functions, &self.axioms)
            == (&other.name, &other.functions, &other.axioms)
    }
}

impl Eq for Domain {}

impl Hash for Domain {
    /// Hash ignoring `pos`.
    fn hash<H: Hasher>(&self, state: &mut H) {
        (&self.name, &self.functions, &self.axioms).hash(state)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "domain {} {{", self.name)?;
        for function in &self.functions {
            writeln!(f, "  {}", function)?;
        }
        for axiom in &self.axioms {
            writeln!(f, "  {}", axiom)?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainFunc {
    pub name: String,
    pub formal_args: Vec<LocalVar>,
    pub return_type: Type,
    pub domain_name: String,
}

impl fmt::Display for DomainFunc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "function {}({}): {}",
            self.name,
            self.formal_args
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<String>>()
                .join(", "),
            self.return_type
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainAxiom {
    pub name: String,
    pub expr: Expr,
    pub domain_name: String,
}

impl fmt::Display for DomainAxiom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "axiom {} {{ {} }}", self.name, self.expr)
    }
}
