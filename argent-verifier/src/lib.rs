// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The interface to verification back-ends and the incremental result
//! cache: content fingerprints, dependency hashes, access-path error
//! localization, and the keyed store.

#![deny(unused_must_use)]

mod backend;
mod cache;
mod verification_result;

pub use backend::*;
pub use cache::*;
pub use verification_result::*;
