// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::ast::common::*;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    hash::{Hash, Hasher},
    mem::discriminant,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    /// A local variable use.
    Local(LocalVar, Position),
    /// A field access: base, field.
    Field(Box<Expr>, Field, Position),
    Const(Const, Position),
    /// The value of an expression in the pre-state.
    Old(Box<Expr>, Position),
    /// The value of an expression at a label: label, base.
    LabelledOld(String, Box<Expr>, Position),
    UnaryOp(UnaryOpKind, Box<Expr>, Position),
    BinOp(BinOpKind, Box<Expr>, Box<Expr>, Position),
    /// Operation on a container value (e.g. Seq index).
    ContainerOp(ContainerOpKind, Box<Expr>, Box<Expr>, Position),
    /// Explicit sequence: element type, elements.
    Seq(Type, Vec<Expr>, Position),
    /// Explicit set: element type, elements.
    SetLit(Type, Vec<Expr>, Position),
    /// Explicit multiset: element type, elements.
    MultisetLit(Type, Vec<Expr>, Position),
    /// Cond: guard, then_expr, else_expr.
    Cond(Box<Expr>, Box<Expr>, Box<Expr>, Position),
    /// ForAll: variables, triggers, body.
    ForAll(Vec<LocalVar>, Vec<Trigger>, Box<Expr>, Position),
    /// Exists: variables, triggers, body.
    Exists(Vec<LocalVar>, Vec<Trigger>, Box<Expr>, Position),
    /// let variable == (def) in body.
    LetExpr(LocalVar, Box<Expr>, Box<Expr>, Position),
    /// FuncApp: function_name, args, return_type.
    FuncApp(String, Vec<Expr>, Type, Position),
    /// DomainFuncApp: function_name, domain_name, args, return_type.
    DomainFuncApp(String, String, Vec<Expr>, Type, Position),
    /// PredicateAccessPredicate: predicate_name, args, permission amount.
    PredicateAccessPredicate(String, Vec<Expr>, PermAmount, Position),
    FieldAccessPredicate(Box<Expr>, PermAmount, Position),
    /// Unfolding: predicate_name, args, in_expr, permission amount.
    Unfolding(String, Vec<Expr>, Box<Expr>, PermAmount, Position),
    /// MagicWand: lhs, rhs.
    MagicWand(Box<Expr>, Box<Expr>, Position),
    /// Applying: wand, in_expr.
    Applying(Box<Expr>, Box<Expr>, Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOpKind {
    Not,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOpKind {
    EqCmp,
    NeCmp,
    GtCmp,
    GeCmp,
    LtCmp,
    LeCmp,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Implies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerOpKind {
    SeqIndex,
    SeqConcat,
    SeqTake,
    SeqDrop,
    SetContains,
    SetUnion,
    SetIntersection,
    SetSubset,
    MultisetCount,
    MultisetUnion,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Const {
    Bool(bool),
    Int(i64),
    BigInt(String),
    /// A fractional permission literal: numerator, denominator.
    Perm(i64, i64),
}

/// A quantifier trigger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trigger(pub Vec<Expr>);

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Const::Bool(val) => write!(f, "{}", val),
            Const::Int(val) => write!(f, "{}", val),
            Const::BigInt(val) => write!(f, "{}", val),
            Const::Perm(num, den) => write!(f, "{}/{}", num, den),
        }
    }
}

impl fmt::Display for UnaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOpKind::Not => write!(f, "!"),
            UnaryOpKind::Minus => write!(f, "-"),
        }
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinOpKind::EqCmp => write!(f, "=="),
            BinOpKind::NeCmp => write!(f, "!="),
            BinOpKind::GtCmp => write!(f, ">"),
            BinOpKind::GeCmp => write!(f, ">="),
            BinOpKind::LtCmp => write!(f, "<"),
            BinOpKind::LeCmp => write!(f, "<="),
            BinOpKind::Add => write!(f, "+"),
            BinOpKind::Sub => write!(f, "-"),
            BinOpKind::Mul => write!(f, "*"),
            BinOpKind::Div => write!(f, "\\"),
            BinOpKind::Mod => write!(f, "%"),
            BinOpKind::And => write!(f, "&&"),
            BinOpKind::Or => write!(f, "||"),
            BinOpKind::Implies => write!(f, "==>"),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.0
                .iter()
                .map(|x| x.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

fn fmt_args(args: &[Expr]) -> String {
    args.iter()
        .map(|x| x.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Local(ref v, _) => write!(f, "{}", v.name),
            Expr::Field(ref base, ref field, _) => write!(f, "{}.{}", base, field),
            Expr::Const(ref value, _) => write!(f, "{}", value),
            Expr::Old(ref base, _) => write!(f, "old({})", base),
            Expr::LabelledOld(ref label, ref base, _) => write!(f, "old[{}]({})", label, base),
            Expr::UnaryOp(op, ref arg, _) => write!(f, "{}({})", op, arg),
            Expr::BinOp(op, ref left, ref right, _) => write!(f, "({}) {} ({})", left, op, right),
            Expr::ContainerOp(op, ref left, ref right, _) => match op {
                ContainerOpKind::SeqIndex => write!(f, "{}[{}]", left, right),
                ContainerOpKind::SeqConcat => write!(f, "{} ++ {}", left, right),
                ContainerOpKind::SeqTake => write!(f, "{}[..{}]", left, right),
                ContainerOpKind::SeqDrop => write!(f, "{}[{}..]", left, right),
                ContainerOpKind::SetContains => write!(f, "({} in {})", left, right),
                ContainerOpKind::SetUnion => write!(f, "({} union {})", left, right),
                ContainerOpKind::SetIntersection => {
                    write!(f, "({} intersection {})", left, right)
                }
                ContainerOpKind::SetSubset => write!(f, "({} subset {})", left, right),
                ContainerOpKind::MultisetCount => write!(f, "count({}, {})", left, right),
                ContainerOpKind::MultisetUnion => write!(f, "({} union {})", left, right),
            },
            Expr::Seq(ref ty, ref elems, _) => {
                write!(f, "Seq[{}]({})", ty, fmt_args(elems))
            }
            Expr::SetLit(ref ty, ref elems, _) => {
                write!(f, "Set[{}]({})", ty, fmt_args(elems))
            }
            Expr::MultisetLit(ref ty, ref elems, _) => {
                write!(f, "Multiset[{}]({})", ty, fmt_args(elems))
            }
            Expr::Cond(ref guard, ref then_expr, ref else_expr, _) => {
                write!(f, "({} ? {} : {})", guard, then_expr, else_expr)
            }
            Expr::ForAll(ref vars, ref triggers, ref body, _) => write!(
                f,
                "forall {} :: {} {}",
                vars.iter()
                    .map(|x| x.to_string())
                    .collect::<Vec<String>>()
                    .join(", "),
                triggers
                    .iter()
                    .map(|x| x.to_string())
                    .collect::<Vec<String>>()
                    .join(" "),
                body,
            ),
            Expr::Exists(ref vars, ref triggers, ref body, _) => write!(
                f,
                "exists {} :: {} {}",
                vars.iter()
                    .map(|x| x.to_string())
                    .collect::<Vec<String>>()
                    .join(", "),
                triggers
                    .iter()
                    .map(|x| x.to_string())
                    .collect::<Vec<String>>()
                    .join(" "),
                body,
            ),
            Expr::LetExpr(ref var, ref def, ref body, _) => {
                write!(f, "(let {} == ({}) in {})", var, def, body)
            }
            Expr::FuncApp(ref name, ref args, _, _) => {
                write!(f, "{}({})", name, fmt_args(args))
            }
            Expr::DomainFuncApp(ref name, _, ref args, _, _) => {
                write!(f, "{}({})", name, fmt_args(args))
            }
            Expr::PredicateAccessPredicate(ref name, ref args, perm, _) => {
                write!(f, "acc({}({}), {})", name, fmt_args(args), perm)
            }
            Expr::FieldAccessPredicate(ref base, perm, _) => {
                write!(f, "acc({}, {})", base, perm)
            }
            Expr::Unfolding(ref name, ref args, ref base, perm, _) => {
                write!(
                    f,
                    "(unfolding acc({}({}), {}) in {})",
                    name,
                    fmt_args(args),
                    perm,
                    base
                )
            }
            Expr::MagicWand(ref lhs, ref rhs, _) => write!(f, "({}) --* ({})", lhs, rhs),
            Expr::Applying(ref wand, ref base, _) => {
                write!(f, "(applying ({}) in {})", wand, base)
            }
        }
    }
}

impl Expr {
    pub fn pos(&self) -> Position {
        match self {
            Expr::Local(_, p)
            | Expr::Field(_, _, p)
            | Expr::Const(_, p)
            | Expr::Old(_, p)
            | Expr::LabelledOld(_, _, p)
            | Expr::UnaryOp(_, _, p)
            | Expr::BinOp(_, _, _, p)
            | Expr::ContainerOp(_, _, _, p)
            | Expr::Seq(_, _, p)
            | Expr::SetLit(_, _, p)
            | Expr::MultisetLit(_, _, p)
            | Expr::Cond(_, _, _, p)
            | Expr::ForAll(_, _, _, p)
            | Expr::Exists(_, _, _, p)
            | Expr::LetExpr(_, _, _, p)
            | Expr::FuncApp(_, _, _, p)
            | Expr::DomainFuncApp(_, _, _, _, p)
            | Expr::PredicateAccessPredicate(_, _, _, p)
            | Expr::FieldAccessPredicate(_, _, p)
            | Expr::Unfolding(_, _, _, _, p)
            | Expr::MagicWand(_, _, p)
            | Expr::Applying(_, _, p) => *p,
        }
    }

    pub fn set_pos(mut self, pos: Position) -> Self {
        match &mut self {
            Expr::Local(_, p)
            | Expr::Field(_, _, p)
            | Expr::Const(_, p)
            | Expr::Old(_, p)
            | Expr::LabelledOld(_, _, p)
            | Expr::UnaryOp(_, _, p)
            | Expr::BinOp(_, _, _, p)
            | Expr::ContainerOp(_, _, _, p)
            | Expr::Seq(_, _, p)
            | Expr::SetLit(_, _, p)
            | Expr::MultisetLit(_, _, p)
            | Expr::Cond(_, _, _, p)
            | Expr::ForAll(_, _, _, p)
            | Expr::Exists(_, _, _, p)
            | Expr::LetExpr(_, _, _, p)
            | Expr::FuncApp(_, _, _, p)
            | Expr::DomainFuncApp(_, _, _, _, p)
            | Expr::PredicateAccessPredicate(_, _, _, p)
            | Expr::FieldAccessPredicate(_, _, p)
            | Expr::Unfolding(_, _, _, _, p)
            | Expr::MagicWand(_, _, p)
            | Expr::Applying(_, _, p) => *p = pos,
        }
        self
    }

    pub fn local(var: LocalVar) -> Self {
        Expr::Local(var, Position::default())
    }

    pub fn field(self, field: Field) -> Self {
        Expr::Field(Box::new(self), field, Position::default())
    }

    pub fn not(expr: Expr) -> Self {
        Expr::UnaryOp(UnaryOpKind::Not, Box::new(expr), Position::default())
    }

    pub fn minus(expr: Expr) -> Self {
        Expr::UnaryOp(UnaryOpKind::Minus, Box::new(expr), Position::default())
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::BinOp(
            BinOpKind::And,
            Box::new(left),
            Box::new(right),
            Position::default(),
        )
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::BinOp(
            BinOpKind::Or,
            Box::new(left),
            Box::new(right),
            Position::default(),
        )
    }

    pub fn implies(left: Expr, right: Expr) -> Self {
        Expr::BinOp(
            BinOpKind::Implies,
            Box::new(left),
            Box::new(right),
            Position::default(),
        )
    }

    pub fn eq_cmp(left: Expr, right: Expr) -> Self {
        Expr::BinOp(
            BinOpKind::EqCmp,
            Box::new(left),
            Box::new(right),
            Position::default(),
        )
    }

    pub fn ne_cmp(left: Expr, right: Expr) -> Self {
        Expr::BinOp(
            BinOpKind::NeCmp,
            Box::new(left),
            Box::new(right),
            Position::default(),
        )
    }

    pub fn ge_cmp(left: Expr, right: Expr) -> Self {
        Expr::BinOp(
            BinOpKind::GeCmp,
            Box::new(left),
            Box::new(right),
            Position::default(),
        )
    }

    pub fn le_cmp(left: Expr, right: Expr) -> Self {
        Expr::BinOp(
            BinOpKind::LeCmp,
            Box::new(left),
            Box::new(right),
            Position::default(),
        )
    }

    pub fn add(left: Expr, right: Expr) -> Self {
        Expr::BinOp(
            BinOpKind::Add,
            Box::new(left),
            Box::new(right),
            Position::default(),
        )
    }

    pub fn sub(left: Expr, right: Expr) -> Self {
        Expr::BinOp(
            BinOpKind::Sub,
            Box::new(left),
            Box::new(right),
            Position::default(),
        )
    }

    pub fn func_app(name: impl Into<String>, args: Vec<Expr>, return_type: Type) -> Self {
        Expr::FuncApp(name.into(), args, return_type, Position::default())
    }

    pub fn domain_func_app(
        name: impl Into<String>,
        domain: impl Into<String>,
        args: Vec<Expr>,
        return_type: Type,
    ) -> Self {
        Expr::DomainFuncApp(
            name.into(),
            domain.into(),
            args,
            return_type,
            Position::default(),
        )
    }

    pub fn pred_permission(name: impl Into<String>, args: Vec<Expr>, perm: PermAmount) -> Self {
        Expr::PredicateAccessPredicate(name.into(), args, perm, Position::default())
    }

    pub fn acc_permission(place: Expr, perm: PermAmount) -> Self {
        Expr::FieldAccessPredicate(Box::new(place), perm, Position::default())
    }

    pub fn old(expr: Expr) -> Self {
        Expr::Old(Box::new(expr), Position::default())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Const(Const::Int(value), Position::default())
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Const(Const::Bool(value), Position::default())
    }
}

impl From<LocalVar> for Expr {
    fn from(var: LocalVar) -> Self {
        Expr::Local(var, Position::default())
    }
}

impl PartialEq for Expr {
    /// Compare ignoring the `position` field.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Local(ref self_var, _), Expr::Local(ref other_var, _)) => self_var == other_var,
            (
                Expr::Field(ref self_base, ref self_field, _),
                Expr::Field(ref other_base, ref other_field, _),
            ) => (self_base, self_field) == (other_base, other_field),
            (Expr::Const(ref self_const, _), Expr::Const(ref other_const, _)) => {
                self_const == other_const
            }
            (Expr::Old(ref self_base, _), Expr::Old(ref other_base, _)) => self_base == other_base,
            (
                Expr::LabelledOld(ref self_label, ref self_base, _),
                Expr::LabelledOld(ref other_label, ref other_base, _),
            ) => (self_label, self_base) == (other_label, other_base),
            (
                Expr::UnaryOp(self_op, ref self_arg, _),
                Expr::UnaryOp(other_op, ref other_arg, _),
            ) => (self_op, self_arg) == (other_op, other_arg),
            (
                Expr::BinOp(self_op, ref self_left, ref self_right, _),
                Expr::BinOp(other_op, ref other_left, ref other_right, _),
            ) => (self_op, self_left, self_right) == (other_op, other_left, other_right),
            (
                Expr::ContainerOp(self_op, ref self_left, ref self_right, _),
                Expr::ContainerOp(other_op, ref other_left, ref other_right, _),
            ) => (self_op, self_left, self_right) == (other_op, other_left, other_right),
            (
                Expr::Seq(ref self_ty, ref self_elems, _),
                Expr::Seq(ref other_ty, ref other_elems, _),
            ) => (self_ty, self_elems) == (other_ty, other_elems),
            (
                Expr::SetLit(ref self_ty, ref self_elems, _),
                Expr::SetLit(ref other_ty, ref other_elems, _),
            ) => (self_ty, self_elems) == (other_ty, other_elems),
            (
                Expr::MultisetLit(ref self_ty, ref self_elems, _),
                Expr::MultisetLit(ref other_ty, ref other_elems, _),
            ) => (self_ty, self_elems) == (other_ty, other_elems),
            (
                Expr::Cond(ref self_guard, ref self_then, ref self_else, _),
                Expr::Cond(ref other_guard, ref other_then, ref other_else, _),
            ) => {
                (self_guard, self_then, self_else) == (other_guard, other_then, other_else)
            }
            (
                Expr::ForAll(ref self_vars, ref self_triggers, ref self_body, _),
                Expr::ForAll(ref other_vars, ref other_triggers, ref other_body, _),
            ) => {
                (self_vars, self_triggers, self_body) == (other_vars, other_triggers, other_body)
            }
            (
                Expr::Exists(ref self_vars, ref self_triggers, ref self_body, _),
                Expr::Exists(ref other_vars, ref other_triggers, ref other_body, _),
            ) => {
                (self_vars, self_triggers, self_body) == (other_vars, other_triggers, other_body)
            }
            (
                Expr::LetExpr(ref self_var, ref self_def, ref self_body, _),
                Expr::LetExpr(ref other_var, ref other_def, ref other_body, _),
            ) => (self_var, self_def, self_body) == (other_var, other_def, other_body),
            (
                Expr::FuncApp(ref self_name, ref self_args, ref self_ty, _),
                Expr::FuncApp(ref other_name, ref other_args, ref other_ty, _),
            ) => (self_name, self_args, self_ty) == (other_name, other_args, other_ty),
            (
                Expr::DomainFuncApp(ref self_name, ref self_domain, ref self_args, ref self_ty, _),
                Expr::DomainFuncApp(
                    ref other_name,
                    ref other_domain,
                    ref other_args,
                    ref other_ty,
                    _,
                ),
            ) => {
                (self_name, self_domain, self_args, self_ty)
                    == (other_name, other_domain, other_args, other_ty)
            }
            (
                Expr::PredicateAccessPredicate(ref self_name, ref self_args, self_perm, _),
                Expr::PredicateAccessPredicate(ref other_name, ref other_args, other_perm, _),
            ) => (self_name, self_args, self_perm) == (other_name, other_args, other_perm),
            (
                Expr::FieldAccessPredicate(ref self_base, self_perm, _),
                Expr::FieldAccessPredicate(ref other_base, other_perm, _),
            ) => (self_base, self_perm) == (other_base, other_perm),
            (
                Expr::Unfolding(ref self_name, ref self_args, ref self_base, self_perm, _),
                Expr::Unfolding(ref other_name, ref other_args, ref other_base, other_perm, _),
            ) => {
                (self_name, self_args, self_base, self_perm)
                    == (other_name, other_args, other_base, other_perm)
            }
            (
                Expr::MagicWand(ref self_lhs, ref self_rhs, _),
                Expr::MagicWand(ref other_lhs, ref other_rhs, _),
            ) => (self_lhs, self_rhs) == (other_lhs, other_rhs),
            (
                Expr::Applying(ref self_wand, ref self_base, _),
                Expr::Applying(ref other_wand, ref other_base, _),
            ) => (self_wand, self_base) == (other_wand, other_base),
            (a, b) => {
                debug_assert_ne!(discriminant(a), discriminant(b));
                false
            }
        }
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    /// Hash ignoring the `position` field.
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        match self {
            Expr::Local(ref var, _) => var.hash(state),
            Expr::Field(ref base, ref field, _) => (base, field).hash(state),
            Expr::Const(ref value, _) => value.hash(state),
            Expr::Old(ref base, _) => base.hash(state),
            Expr::LabelledOld(ref label, ref base, _) => (label, base).hash(state),
            Expr::UnaryOp(op, ref arg, _) => (op, arg).hash(state),
            Expr::BinOp(op, ref left, ref right, _) => (op, left, right).hash(state),
            Expr::ContainerOp(op, ref left, ref right, _) => (op, left, right).hash(state),
            Expr::Seq(ref ty, ref elems, _) => (ty, elems).hash(state),
            Expr::SetLit(ref ty, ref elems, _) => (ty, elems).hash(state),
            Expr::MultisetLit(ref ty, ref elems, _) => (ty, elems).hash(state),
            Expr::Cond(ref guard, ref then_expr, ref else_expr, _) => {
                (guard, then_expr, else_expr).hash(state)
            }
            Expr::ForAll(ref vars, ref triggers, ref body, _) => {
                (vars, triggers, body).hash(state)
            }
            Expr::Exists(ref vars, ref triggers, ref body, _) => {
                (vars, triggers, body).hash(state)
            }
            Expr::LetExpr(ref var, ref def, ref body, _) => (var, def, body).hash(state),
            Expr::FuncApp(ref name, ref args, ref ty, _) => (name, args, ty).hash(state),
            Expr::DomainFuncApp(ref name, ref domain, ref args, ref ty, _) => {
                (name, domain, args, ty).hash(state)
            }
            Expr::PredicateAccessPredicate(ref name, ref args, perm, _) => {
                (name, args, perm).hash(state)
            }
            Expr::FieldAccessPredicate(ref base, perm, _) => (base, perm).hash(state),
            Expr::Unfolding(ref name, ref args, ref base, perm, _) => {
                (name, args, base, perm).hash(state)
            }
            Expr::MagicWand(ref lhs, ref rhs, _) => (lhs, rhs).hash(state),
            Expr::Applying(ref wand, ref base, _) => (wand, base).hash(state),
        }
    }
}

pub trait ExprIterator {
    /// Conjoin a sequence of expressions into a single expression.
    /// Returns true if the sequence has no elements.
    fn conjoin(&mut self) -> Expr;

    /// Disjoin a sequence of expressions into a single expression.
    /// Returns false if the sequence has no elements.
    fn disjoin(&mut self) -> Expr;
}

impl<T> ExprIterator for T
where
    T: Iterator<Item = Expr>,
{
    fn conjoin(&mut self) -> Expr {
        if let Some(init) = self.next() {
            self.fold(init, Expr::and)
        } else {
            true.into()
        }
    }

    fn disjoin(&mut self) -> Expr {
        if let Some(init) = self.next() {
            self.fold(init, Expr::or)
        } else {
            false.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_positions() {
        let a = Expr::eq_cmp(Expr::from(1), Expr::from(2)).set_pos(Position::new(3, 7, 11));
        let b = Expr::eq_cmp(Expr::from(1), Expr::from(2)).set_pos(Position::new(90, 1, 5000));
        assert_eq!(a, b);
        assert_ne!(a, Expr::eq_cmp(Expr::from(1), Expr::from(3)));
    }

    #[test]
    fn conjoin_empty_is_true() {
        assert_eq!(Vec::<Expr>::new().into_iter().conjoin(), true.into());
    }
}
