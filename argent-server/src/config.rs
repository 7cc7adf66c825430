// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use ::config::{Config, Environment, Value};
use lazy_static::lazy_static;
use serde::Deserialize;
use std::sync::RwLock;

lazy_static! {
    static ref SETTINGS: RwLock<Config> = RwLock::new({
        let mut settings = Config::default();

        // 1. Default values.
        settings.set_default("enable_cache", true).unwrap();
        settings.set_default("backend", "silicon").unwrap();
        settings
            .set_default::<Vec<String>>("extra_verifier_args", vec![])
            .unwrap();
        settings.set_default("quiet", false).unwrap();

        // 2. Override with environment variables, e.g.
        //    `ARGENT_ENABLE_CACHE=false`.
        settings
            .merge(Environment::with_prefix("ARGENT"))
            .unwrap();

        settings
    });
}

fn read_setting<T>(name: &'static str) -> T
where
    T: Deserialize<'static>,
{
    SETTINGS
        .read()
        .unwrap()
        .get(name)
        .unwrap_or_else(|e| panic!("Failed to read setting {}: {}", name, e))
}

/// Overwrite a setting at runtime. Used by tests and embedders.
pub fn set<T: Into<Value>>(name: &str, value: T) {
    SETTINGS
        .write()
        .unwrap()
        .set(name, value)
        .unwrap_or_else(|e| panic!("Failed to write setting {}: {}", name, e));
}

/// Whether verification results are memoized per method across runs.
pub fn enable_cache() -> bool {
    read_setting("enable_cache")
}

/// The default back-end selector used when a job does not name one.
pub fn backend() -> String {
    read_setting("backend")
}

/// Additional arguments handed to the back-end verifier.
pub fn extra_verifier_args() -> Vec<String> {
    read_setting("extra_verifier_args")
}

/// Suppress informational reports.
pub fn quiet() -> bool {
    read_setting("quiet")
}
