// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The typed message stream a verification job emits. Emission is
//! fire-and-forget: a slow or vanished consumer never stalls the
//! pipeline.

use argent_ast::Definition;
use argent_verifier::VerificationError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    io::Write,
    sync::{mpsc, Mutex},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JobFailure {
    /// The back-end produced verification errors.
    Verification(Vec<VerificationError>),
    /// The front-end failed before the back-end was ever consulted.
    Translation(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// The program's top-level members.
    ProgramOutline { members: Vec<Definition> },
    Statistics {
        methods: usize,
        functions: usize,
        predicates: usize,
        domains: usize,
        fields: usize,
    },
    /// Every definition, including member-scoped declarations.
    ProgramDefinitions { definitions: Vec<Definition> },
    OverallSuccess { backend: String, time_ms: u64 },
    OverallFailure {
        backend: String,
        time_ms: u64,
        failure: JobFailure,
    },
    Exception { message: String },
    /// The last message of every job.
    FinalReport,
}

pub trait Reporter: Send + Sync {
    fn report(&self, message: ServerMessage);
}

/// Streams messages to an `mpsc` consumer. A disconnected receiver drops
/// the message with a warning.
pub struct ChannelReporter {
    sender: Mutex<mpsc::Sender<ServerMessage>>,
}

impl ChannelReporter {
    pub fn new(sender: mpsc::Sender<ServerMessage>) -> Self {
        ChannelReporter {
            sender: Mutex::new(sender),
        }
    }
}

impl Reporter for ChannelReporter {
    fn report(&self, message: ServerMessage) {
        let sender = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        if sender.send(message).is_err() {
            warn!("dropping report: the job's consumer is gone");
        }
    }
}

/// Writes each message as one JSON line.
pub struct JsonLineReporter<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLineReporter<W> {
    pub fn new(writer: W) -> Self {
        JsonLineReporter {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> Reporter for JsonLineReporter<W> {
    fn report(&self, message: ServerMessage) {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        match serde_json::to_string(&message) {
            Ok(line) => {
                if writeln!(writer, "{}", line).is_err() {
                    warn!("dropping report: the sink is not writable");
                }
            }
            Err(e) => warn!("dropping report that failed to serialize: {}", e),
        }
    }
}

pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _message: ServerMessage) {}
}
