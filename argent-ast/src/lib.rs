// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The typed AST consumed by the verification server: members, statements,
//! expressions, and the position-independent equality the result cache is
//! built on.

#![deny(unused_must_use)]

pub mod ast;
mod definitions;
mod node;
mod program;

pub use ast::*;
pub use definitions::*;
pub use node::*;
pub use program::*;
