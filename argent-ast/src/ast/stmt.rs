// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::ast::{common::*, expr::*};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    hash::{Hash, Hasher},
    mem::discriminant,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    Comment(String),
    Label(String, Position),
    Inhale(Expr, Position),
    Exhale(Expr, Position),
    Assert(Expr, Position),
    /// Assign: target, value.
    Assign(Expr, Expr, Position),
    /// MethodCall: method_name, args, targets.
    MethodCall(String, Vec<Expr>, Vec<LocalVar>, Position),
    /// Fold: predicate_name, args, permission amount.
    Fold(String, Vec<Expr>, PermAmount, Position),
    /// Unfold: predicate_name, args, permission amount.
    Unfold(String, Vec<Expr>, PermAmount, Position),
    /// Package a magic wand: the wand, the package body.
    Package(Expr, Vec<Stmt>, Position),
    /// Apply a magic wand.
    Apply(Expr, Position),
    /// If: guard, then branch, else branch.
    If(Expr, Vec<Stmt>, Vec<Stmt>, Position),
    /// While: guard, invariants, body.
    While(Expr, Vec<Expr>, Vec<Stmt>, Position),
}

impl Stmt {
    /// Comments carry no position; every executable statement does.
    pub fn pos(&self) -> Position {
        match self {
            Stmt::Comment(_) => Position::default(),
            Stmt::Label(_, p)
            | Stmt::Inhale(_, p)
            | Stmt::Exhale(_, p)
            | Stmt::Assert(_, p)
            | Stmt::Assign(_, _, p)
            | Stmt::MethodCall(_, _, _, p)
            | Stmt::Fold(_, _, _, p)
            | Stmt::Unfold(_, _, _, p)
            | Stmt::Package(_, _, p)
            | Stmt::Apply(_, p)
            | Stmt::If(_, _, _, p)
            | Stmt::While(_, _, _, p) => *p,
        }
    }

    pub fn set_pos(mut self, pos: Position) -> Self {
        match &mut self {
            Stmt::Comment(_) => {}
            Stmt::Label(_, p)
            | Stmt::Inhale(_, p)
            | Stmt::Exhale(_, p)
            | Stmt::Assert(_, p)
            | Stmt::Assign(_, _, p)
            | Stmt::MethodCall(_, _, _, p)
            | Stmt::Fold(_, _, _, p)
            | Stmt::Unfold(_, _, _, p)
            | Stmt::Package(_, _, p)
            | Stmt::Apply(_, p)
            | Stmt::If(_, _, _, p)
            | Stmt::While(_, _, _, p) => *p = pos,
        }
        self
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::Comment(ref comment) => write!(f, "// {}", comment),
            Stmt::Label(ref label, _) => write!(f, "label {}", label),
            Stmt::Inhale(ref expr, _) => write!(f, "inhale {}", expr),
            Stmt::Exhale(ref expr, _) => write!(f, "exhale {}", expr),
            Stmt::Assert(ref expr, _) => write!(f, "assert {}", expr),
            Stmt::Assign(ref target, ref value, _) => write!(f, "{} := {}", target, value),
            Stmt::MethodCall(ref name, ref args, ref targets, _) => write!(
                f,
                "{} := {}({})",
                targets
                    .iter()
                    .map(|t| t.name.clone())
                    .collect::<Vec<String>>()
                    .join(", "),
                name,
                args.iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<String>>()
                    .join(", "),
            ),
            Stmt::Fold(ref name, ref args, perm, _) => write!(
                f,
                "fold acc({}({}), {})",
                name,
                args.iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<String>>()
                    .join(", "),
                perm,
            ),
            Stmt::Unfold(ref name, ref args, perm, _) => write!(
                f,
                "unfold acc({}({}), {})",
                name,
                args.iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<String>>()
                    .join(", "),
                perm,
            ),
            Stmt::Package(ref wand, _, _) => write!(f, "package {}", wand),
            Stmt::Apply(ref wand, _) => write!(f, "apply {}", wand),
            Stmt::If(ref guard, ref then_stmts, ref else_stmts, _) => {
                write!(
                    f,
                    "if ({}) {{ {} stmts }} else {{ {} stmts }}",
                    guard,
                    then_stmts.len(),
                    else_stmts.len()
                )
            }
            Stmt::While(ref guard, ref invs, ref body, _) => {
                write!(
                    f,
                    "while ({}) [{} invariants] {{ {} stmts }}",
                    guard,
                    invs.len(),
                    body.len()
                )
            }
        }
    }
}

impl PartialEq for Stmt {
    /// Compare ignoring the `position` field.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Stmt::Comment(ref left), Stmt::Comment(ref right)) => left == right,
            (Stmt::Label(ref left, _), Stmt::Label(ref right, _)) => left == right,
            (Stmt::Inhale(ref left, _), Stmt::Inhale(ref right, _)) => left == right,
            (Stmt::Exhale(ref left, _), Stmt::Exhale(ref right, _)) => left == right,
            (Stmt::Assert(ref left, _), Stmt::Assert(ref right, _)) => left == right,
            (
                Stmt::Assign(ref self_target, ref self_value, _),
                Stmt::Assign(ref other_target, ref other_value, _),
            ) => (self_target, self_value) == (other_target, other_value),
            (
                Stmt::MethodCall(ref self_name, ref self_args, ref self_targets, _),
                Stmt::MethodCall(ref other_name, ref other_args, ref other_targets, _),
            ) => {
                (self_name, self_args, self_targets) == (other_name, other_args, other_targets)
            }
            (
                Stmt::Fold(ref self_name, ref self_args, self_perm, _),
                Stmt::Fold(ref other_name, ref other_args, other_perm, _),
            ) => (self_name, self_args, self_perm) == (other_name, other_args, other_perm),
            (
                Stmt::Unfold(ref self_name, ref self_args, self_perm, _),
                Stmt::Unfold(ref other_name, ref other_args, other_perm, _),
            ) => (self_name, self_args, self_perm) == (other_name, other_args, other_perm),
            (
                Stmt::Package(ref self_wand, ref self_body, _),
                Stmt::Package(ref other_wand, ref other_body, _),
            ) => (self_wand, self_body) == (other_wand, other_body),
            (Stmt::Apply(ref left, _), Stmt::Apply(ref right, _)) => left == right,
            (
                Stmt::If(ref self_guard, ref self_then, ref self_else, _),
                Stmt::If(ref other_guard, ref other_then, ref other_else, _),
            ) => (self_guard, self_then, self_else) == (other_guard, other_then, other_else),
            (
                Stmt::While(ref self_guard, ref self_invs, ref self_body, _),
                Stmt::While(ref other_guard, ref other_invs, ref other_body, _),
            ) => (self_guard, self_invs, self_body) == (other_guard, other_invs, other_body),
            (a, b) => {
                debug_assert_ne!(discriminant(a), discriminant(b));
                false
            }
        }
    }
}

impl Eq for Stmt {}

impl Hash for Stmt {
    /// Hash ignoring the `position` field.
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        match self {
            Stmt::Comment(ref comment) => comment.hash(state),
            Stmt::Label(ref label, _) => label.hash(state),
            Stmt::Inhale(ref expr, _) => expr.hash(state),
            Stmt::Exhale(ref expr, _) => expr.hash(state),
            Stmt::Assert(ref expr, _) => expr.hash(state),
            Stmt::Assign(ref target, ref value, _) => (target, value).hash(state),
            Stmt::MethodCall(ref name, ref args, ref targets, _) => {
                (name, args, targets).hash(state)
            }
            Stmt::Fold(ref name, ref args, perm, _) => (name, args, perm).hash(state),
            Stmt::Unfold(ref name, ref args, perm, _) => (name, args, perm).hash(state),
            Stmt::Package(ref wand, ref body, _) => (wand, body).hash(state),
            Stmt::Apply(ref wand, _) => wand.hash(state),
            Stmt::If(ref guard, ref then_stmts, ref else_stmts, _) => {
                (guard, then_stmts, else_stmts).hash(state)
            }
            Stmt::While(ref guard, ref invs, ref body, _) => (guard, invs, body).hash(state),
        }
    }
}
