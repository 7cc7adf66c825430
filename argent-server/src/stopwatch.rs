// © 2022, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use log::info;
use std::time::{Duration, Instant};

/// Logs how long each pipeline section takes and how long the whole run
/// took.
pub struct Stopwatch {
    domain: String,
    section_name: String,
    run_start: Instant,
    section_start: Instant,
    is_finished: bool,
}

impl Stopwatch {
    pub fn start<S: ToString>(domain: S, section_name: S) -> Self {
        let domain = domain.to_string();
        let section_name = section_name.to_string();
        info!("[{}] Starting: {}", domain, section_name);
        let now = Instant::now();
        Self {
            domain,
            section_name,
            run_start: now,
            section_start: now,
            is_finished: false,
        }
    }

    pub fn start_next<S: ToString>(&mut self, section_name: S) {
        let now = Instant::now();
        self.log_section(now);
        self.section_name = section_name.to_string();
        info!("[{}] Starting: {}", self.domain, self.section_name);
        self.section_start = now;
    }

    /// Finish the current section and return the total elapsed time.
    pub fn finish(mut self) -> Duration {
        let now = Instant::now();
        self.log_section(now);
        self.is_finished = true;
        now.duration_since(self.run_start)
    }

    fn log_section(&self, now: Instant) {
        let duration = now.duration_since(self.section_start);
        info!(
            "[{}] Completed: {} ({}.{:02} seconds)",
            self.domain,
            self.section_name,
            duration.as_secs(),
            duration.subsec_millis() / 10
        );
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        if !self.is_finished {
            self.log_section(Instant::now());
        }
    }
}
