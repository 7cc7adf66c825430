// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use argent_ast::Program;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// The source file this job verifies. Part of every cache key.
    pub file: PathBuf,
    /// Disable caching for this job regardless of the global setting.
    pub disable_cache: bool,
}

impl FrontendConfig {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        FrontendConfig {
            file: file.into(),
            disable_cache: false,
        }
    }
}

/// The parsing/type-checking/translation pipeline the orchestrator
/// consumes. Each phase either advances the internal state towards a
/// program or populates the error list; `program` returns the final AST
/// once translation succeeded.
pub trait Frontend: Send {
    fn parse(&mut self);
    fn typecheck(&mut self);
    fn translate(&mut self);
    fn errors(&self) -> &[String];
    fn program(&self) -> Option<&Program>;
    fn config(&self) -> &FrontendConfig;
}
