// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The verification server: per-job orchestration of translation, cache
//! consultation, reduced-program dispatch, and result merging.

#![deny(unused_must_use)]

pub mod config;
mod frontend;
mod job;
mod process_verification;
mod reporter;
mod stopwatch;

pub use frontend::*;
pub use job::*;
pub use process_verification::*;
pub use reporter::*;
pub use stopwatch::*;
