// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! One verification job per spawned thread. A job runs the pipeline from
//! parse through merge sequentially; jobs for different (backend, file)
//! pairs run in parallel and share only the cache. Whatever happens inside
//! the pipeline, the job's message stream ends with `FinalReport` and the
//! server outlives the job.

use crate::{
    config,
    frontend::Frontend,
    process_verification::process_verification_request,
    reporter::{ChannelReporter, Reporter, ServerMessage},
};
use argent_verifier::{BackendRegistry, VerificationCache};
use log::error;
use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc,
    },
    thread,
};

/// Which back-end a job runs and with which extra arguments.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub selector: String,
    pub verifier_args: Vec<String>,
}

impl BackendConfig {
    pub fn new(selector: impl Into<String>) -> Self {
        BackendConfig {
            selector: selector.into(),
            verifier_args: config::extra_verifier_args(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(config::backend())
    }
}

/// Requests cancellation of a running job. The pipeline checks the token
/// at its stage boundaries; a cancelled job writes nothing to the cache.
#[derive(Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

pub struct JobHandle {
    messages: mpsc::Receiver<ServerMessage>,
    token: CancellationToken,
    thread: Option<thread::JoinHandle<()>>,
}

impl JobHandle {
    pub fn messages(&self) -> &mpsc::Receiver<ServerMessage> {
        &self.messages
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Drain the stream up to and including the final marker.
    pub fn collect_messages(&self) -> Vec<ServerMessage> {
        let mut messages = vec![];
        while let Ok(message) = self.messages.recv() {
            let is_final = message == ServerMessage::FinalReport;
            messages.push(message);
            if is_final {
                break;
            }
        }
        messages
    }

    pub fn join(mut self) {
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                // The panic was already serialized into the stream.
                error!("a verification job thread ended abnormally");
            }
        }
    }
}

/// Start a verification job for `(backend_config, frontend)`. An unknown
/// selector is a configuration error: the stream carries an exception and
/// the final marker without a thread ever being spawned.
pub fn spawn_job<F>(
    registry: &BackendRegistry,
    backend_config: &BackendConfig,
    frontend: F,
    cache: Arc<VerificationCache>,
) -> JobHandle
where
    F: Frontend + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let reporter = ChannelReporter::new(sender);
    let token = CancellationToken::new();

    let mut backend = match registry.resolve(
        &backend_config.selector,
        &backend_config.verifier_args,
    ) {
        Ok(backend) => backend,
        Err(e) => {
            reporter.report(ServerMessage::Exception {
                message: e.to_string(),
            });
            reporter.report(ServerMessage::FinalReport);
            return JobHandle {
                messages: receiver,
                token,
                thread: None,
            };
        }
    };

    let job_token = token.clone();
    let mut frontend = frontend;
    let builder = thread::Builder::new().name(format!(
        "verification job running {}",
        backend_config.selector
    ));
    let handle = builder
        .spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                process_verification_request(
                    &mut frontend,
                    backend.as_mut(),
                    &cache,
                    &reporter,
                    &job_token,
                )
            }));
            match outcome {
                Ok(Ok(_)) => {}
                Ok(Err(server_error)) => {
                    reporter.report(ServerMessage::Exception {
                        message: server_error.to_string(),
                    });
                }
                Err(panic_payload) => {
                    reporter.report(ServerMessage::Exception {
                        message: describe_panic(panic_payload.as_ref()),
                    });
                }
            }
            backend.stop();
            reporter.report(ServerMessage::FinalReport);
        })
        .unwrap();

    JobHandle {
        messages: receiver,
        token,
        thread: Some(handle),
    }
}

fn describe_panic(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("verification job panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("verification job panicked: {}", message)
    } else {
        "verification job panicked".to_string()
    }
}
