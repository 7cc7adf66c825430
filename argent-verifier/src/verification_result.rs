// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use argent_ast::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of a verification request on a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VerificationResult {
    /// The program verified.
    Success,
    /// The program did not verify.
    Failure(Vec<VerificationError>),
}

impl VerificationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn errors(&self) -> &[VerificationError] {
        match self {
            VerificationResult::Success => &[],
            VerificationResult::Failure(errors) => errors,
        }
    }
}

/// The closed set of error variants a back-end reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    AssignmentFailed,
    CallFailed,
    PreconditionViolated,
    PostconditionViolated,
    LoopInvariantNotPreserved,
    LoopInvariantNotEstablished,
    FoldFailed,
    UnfoldFailed,
    PackageFailed,
    ApplyFailed,
    AssertFailed,
    InhaleFailed,
    ExhaleFailed,
    TerminationFailed,
    FunctionNotWellformed,
    PredicateNotWellformed,
    MagicWandNotWellformed,
    HeuristicsFailed,
    Internal,
}

impl ErrorKind {
    /// The stable wire identifier of this variant.
    pub fn full_id(self) -> &'static str {
        match self {
            ErrorKind::AssignmentFailed => "assignment.failed",
            ErrorKind::CallFailed => "call.failed",
            ErrorKind::PreconditionViolated => "call.precondition",
            ErrorKind::PostconditionViolated => "postcondition.violated",
            ErrorKind::LoopInvariantNotPreserved => "invariant.not.preserved",
            ErrorKind::LoopInvariantNotEstablished => "invariant.not.established",
            ErrorKind::FoldFailed => "fold.failed",
            ErrorKind::UnfoldFailed => "unfold.failed",
            ErrorKind::PackageFailed => "package.failed",
            ErrorKind::ApplyFailed => "apply.failed",
            ErrorKind::AssertFailed => "assert.failed",
            ErrorKind::InhaleFailed => "inhale.failed",
            ErrorKind::ExhaleFailed => "exhale.failed",
            ErrorKind::TerminationFailed => "termination.failed",
            ErrorKind::FunctionNotWellformed => "function.not.wellformed",
            ErrorKind::PredicateNotWellformed => "predicate.not.wellformed",
            ErrorKind::MagicWandNotWellformed => "wand.not.wellformed",
            ErrorKind::HeuristicsFailed => "heuristics.failed",
            ErrorKind::Internal => "internal",
        }
    }
}

/// A counterexample extracted from the solver model, attached to an error
/// when the back-end was asked to produce one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterexample {
    /// Variable name to model value, in solver output order.
    pub model: Vec<(String, String)>,
}

/// An error produced by a back-end. The positions are those of the AST the
/// back-end actually saw; replaying a cached error rewrites them against
/// the current AST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationError {
    pub kind: ErrorKind,
    pub message: String,
    /// Position of the offending node.
    pub pos: Position,
    /// Position of the reason's offending node; default when the reason
    /// carries no position of its own.
    pub reason_pos: Position,
    pub counterexample: Option<Counterexample>,
    /// True iff this error was replayed from the cache rather than
    /// produced by the back-end in the current run.
    pub cached: bool,
}

impl VerificationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, pos: Position) -> Self {
        VerificationError {
            kind,
            message: message.into(),
            pos,
            reason_pos: Position::default(),
            counterexample: None,
            cached: false,
        }
    }

    pub fn with_reason_pos(mut self, reason_pos: Position) -> Self {
        self.reason_pos = reason_pos;
        self
    }

    pub fn full_id(&self) -> &'static str {
        self.kind.full_id()
    }

    /// Mark this error as replayed from the cache. Idempotent.
    pub fn set_cached(self) -> Self {
        VerificationError {
            cached: true,
            ..self
        }
    }
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({})",
            self.full_id(),
            self.message,
            self.pos
        )?;
        if self.cached {
            write!(f, " (cached)")?;
        }
        Ok(())
    }
}
