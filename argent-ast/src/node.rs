// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::ast::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A borrowed view on any node of a method's tree. Descent order is the
/// declaration order of each variant's children, so a recorded child index
/// stays meaningful for any tree with the same shape.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Expr(&'a Expr),
    Stmt(&'a Stmt),
}

/// The variant tag of a node, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    // Expressions.
    Local,
    FieldAccess,
    Const,
    Old,
    LabelledOld,
    UnaryOp,
    BinOp,
    ContainerOp,
    Seq,
    SetLit,
    MultisetLit,
    Cond,
    ForAll,
    Exists,
    LetExpr,
    FuncApp,
    DomainFuncApp,
    PredicateAccessPredicate,
    FieldAccessPredicate,
    Unfolding,
    MagicWand,
    Applying,
    // Statements.
    Comment,
    Label,
    Inhale,
    Exhale,
    Assert,
    Assign,
    MethodCall,
    Fold,
    Unfold,
    Package,
    Apply,
    If,
    While,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Expr(expr) => match expr {
                Expr::Local(..) => NodeKind::Local,
                Expr::Field(..) => NodeKind::FieldAccess,
                Expr::Const(..) => NodeKind::Const,
                Expr::Old(..) => NodeKind::Old,
                Expr::LabelledOld(..) => NodeKind::LabelledOld,
                Expr::UnaryOp(..) => NodeKind::UnaryOp,
                Expr::BinOp(..) => NodeKind::BinOp,
                Expr::ContainerOp(..) => NodeKind::ContainerOp,
                Expr::Seq(..) => NodeKind::Seq,
                Expr::SetLit(..) => NodeKind::SetLit,
                Expr::MultisetLit(..) => NodeKind::MultisetLit,
                Expr::Cond(..) => NodeKind::Cond,
                Expr::ForAll(..) => NodeKind::ForAll,
                Expr::Exists(..) => NodeKind::Exists,
                Expr::LetExpr(..) => NodeKind::LetExpr,
                Expr::FuncApp(..) => NodeKind::FuncApp,
                Expr::DomainFuncApp(..) => NodeKind::DomainFuncApp,
                Expr::PredicateAccessPredicate(..) => NodeKind::PredicateAccessPredicate,
                Expr::FieldAccessPredicate(..) => NodeKind::FieldAccessPredicate,
                Expr::Unfolding(..) => NodeKind::Unfolding,
                Expr::MagicWand(..) => NodeKind::MagicWand,
                Expr::Applying(..) => NodeKind::Applying,
            },
            Node::Stmt(stmt) => match stmt {
                Stmt::Comment(..) => NodeKind::Comment,
                Stmt::Label(..) => NodeKind::Label,
                Stmt::Inhale(..) => NodeKind::Inhale,
                Stmt::Exhale(..) => NodeKind::Exhale,
                Stmt::Assert(..) => NodeKind::Assert,
                Stmt::Assign(..) => NodeKind::Assign,
                Stmt::MethodCall(..) => NodeKind::MethodCall,
                Stmt::Fold(..) => NodeKind::Fold,
                Stmt::Unfold(..) => NodeKind::Unfold,
                Stmt::Package(..) => NodeKind::Package,
                Stmt::Apply(..) => NodeKind::Apply,
                Stmt::If(..) => NodeKind::If,
                Stmt::While(..) => NodeKind::While,
            },
        }
    }

    pub fn pos(&self) -> Position {
        match self {
            Node::Expr(expr) => expr.pos(),
            Node::Stmt(stmt) => stmt.pos(),
        }
    }

    /// The node's children in declaration order.
    pub fn children(&self) -> Vec<Node<'a>> {
        match self {
            Node::Expr(expr) => match expr {
                Expr::Local(..) | Expr::Const(..) => vec![],
                Expr::Field(base, _, _)
                | Expr::Old(base, _)
                | Expr::LabelledOld(_, base, _)
                | Expr::UnaryOp(_, base, _)
                | Expr::FieldAccessPredicate(base, _, _) => vec![Node::Expr(base)],
                Expr::BinOp(_, left, right, _)
                | Expr::ContainerOp(_, left, right, _)
                | Expr::MagicWand(left, right, _)
                | Expr::Applying(left, right, _) => {
                    vec![Node::Expr(left), Node::Expr(right)]
                }
                Expr::Seq(_, elems, _)
                | Expr::SetLit(_, elems, _)
                | Expr::MultisetLit(_, elems, _) => elems.iter().map(Node::Expr).collect(),
                Expr::Cond(guard, then_expr, else_expr, _) => vec![
                    Node::Expr(guard),
                    Node::Expr(then_expr),
                    Node::Expr(else_expr),
                ],
                Expr::ForAll(_, triggers, body, _) | Expr::Exists(_, triggers, body, _) => {
                    let mut children: Vec<Node> = triggers
                        .iter()
                        .flat_map(|t| t.0.iter().map(Node::Expr))
                        .collect();
                    children.push(Node::Expr(body));
                    children
                }
                Expr::LetExpr(_, def, body, _) => vec![Node::Expr(def), Node::Expr(body)],
                Expr::FuncApp(_, args, _, _)
                | Expr::DomainFuncApp(_, _, args, _, _)
                | Expr::PredicateAccessPredicate(_, args, _, _) => {
                    args.iter().map(Node::Expr).collect()
                }
                Expr::Unfolding(_, args, base, _, _) => {
                    let mut children: Vec<Node> = args.iter().map(Node::Expr).collect();
                    children.push(Node::Expr(base));
                    children
                }
            },
            Node::Stmt(stmt) => match stmt {
                Stmt::Comment(..) | Stmt::Label(..) => vec![],
                Stmt::Inhale(expr, _)
                | Stmt::Exhale(expr, _)
                | Stmt::Assert(expr, _)
                | Stmt::Apply(expr, _) => vec![Node::Expr(expr)],
                Stmt::Assign(target, value, _) => vec![Node::Expr(target), Node::Expr(value)],
                Stmt::MethodCall(_, args, _, _)
                | Stmt::Fold(_, args, _, _)
                | Stmt::Unfold(_, args, _, _) => args.iter().map(Node::Expr).collect(),
                Stmt::Package(wand, body, _) => {
                    let mut children = vec![Node::Expr(wand)];
                    children.extend(body.iter().map(Node::Stmt));
                    children
                }
                Stmt::If(guard, then_stmts, else_stmts, _) => {
                    let mut children = vec![Node::Expr(guard)];
                    children.extend(then_stmts.iter().map(Node::Stmt));
                    children.extend(else_stmts.iter().map(Node::Stmt));
                    children
                }
                Stmt::While(guard, invs, body, _) => {
                    let mut children = vec![Node::Expr(guard)];
                    children.extend(invs.iter().map(Node::Expr));
                    children.extend(body.iter().map(Node::Stmt));
                    children
                }
            },
        }
    }
}

/// The roots of a method's tree: specification first, then the body.
pub fn method_children(method: &Method) -> Vec<Node<'_>> {
    let mut children: Vec<Node> = method
        .pres
        .iter()
        .chain(method.posts.iter())
        .map(Node::Expr)
        .collect();
    if let Some(ref body) = method.body {
        children.extend(body.iter().map(Node::Stmt));
    }
    children
}
