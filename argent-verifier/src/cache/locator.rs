// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Position-independent node addressing. An access path records the
//! descent from a method's root to a node as (variant tag, child index)
//! pairs; it survives any edit that preserves the method's shape, which by
//! fingerprint equality is every edit that produces a cache hit.

use argent_ast::{method_children, Method, Node, NodeKind, Position};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub kind: NodeKind,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessPath(pub Vec<PathStep>);

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let steps: Vec<String> = self
            .0
            .iter()
            .map(|step| format!("{}[{}]", step.kind, step.index))
            .collect();
        write!(f, "{}", steps.join("/"))
    }
}

/// Walk an access path from the method root. Any disagreement between the
/// recorded descent and the current tree yields `None`; callers fall back
/// to re-verification, never to a guessed position.
pub fn locate<'a>(method: &'a Method, path: &AccessPath) -> Option<Node<'a>> {
    let mut steps = path.0.iter();
    let first = steps.next()?;
    let mut node = *method_children(method).get(first.index)?;
    if node.kind() != first.kind {
        warn!(
            "access path mismatch in method {}: expected {} at root index {}, found {}",
            method.name,
            first.kind,
            first.index,
            node.kind()
        );
        return None;
    }
    for step in steps {
        let children = node.children();
        node = *children.get(step.index)?;
        if node.kind() != step.kind {
            warn!(
                "access path mismatch in method {}: expected {} at index {}, found {}",
                method.name,
                step.kind,
                step.index,
                node.kind()
            );
            return None;
        }
    }
    Some(node)
}

/// Find the first node (in depth-first declaration order) whose position
/// equals `pos` and return the path to it. Used while converting a fresh
/// back-end error into its stored form.
pub fn find_by_position(method: &Method, pos: Position) -> Option<AccessPath> {
    fn search(node: Node, pos: Position, path: &mut Vec<PathStep>) -> bool {
        if node.pos() == pos {
            return true;
        }
        for (index, child) in node.children().into_iter().enumerate() {
            path.push(PathStep {
                kind: child.kind(),
                index,
            });
            if search(child, pos, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut path = vec![];
    for (index, child) in method_children(method).into_iter().enumerate() {
        path.push(PathStep {
            kind: child.kind(),
            index,
        });
        if search(child, pos, &mut path) {
            return Some(AccessPath(path));
        }
        path.pop();
    }
    None
}
