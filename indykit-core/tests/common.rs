//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use indykit_core::{CommandHandle, Continuation, Correlator, IndyResult, Outcome, Payload};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Stand-in for libindy. Entry points record the command handle they were
/// given; completions are fired later from the library's own threads.
pub struct SimulatedLibrary {
    correlator: Arc<Correlator>,
    accepted: Mutex<Vec<CommandHandle>>,
}

impl SimulatedLibrary {
    pub fn new(correlator: Arc<Correlator>) -> Self {
        Self {
            correlator,
            accepted: Mutex::new(Vec::new()),
        }
    }

    /// Entry point that accepts the call and returns success.
    pub fn accept(&self, handle: CommandHandle) -> i32 {
        self.accepted.lock().unwrap().push(handle);
        0
    }

    /// Handles accepted so far, in call order.
    pub fn accepted(&self) -> Vec<CommandHandle> {
        self.accepted.lock().unwrap().clone()
    }

    /// Fires a completion from a library thread after `delay`.
    pub fn complete_later(
        &self,
        handle: CommandHandle,
        status: i32,
        payload: Payload,
        delay: Duration,
    ) -> JoinHandle<IndyResult<()>> {
        let correlator = Arc::clone(&self.correlator);
        std::thread::spawn(move || {
            std::thread::sleep(delay);
            correlator.deliver(handle, status, payload)
        })
    }

    /// Completes every accepted call with success and `payload`, in reverse
    /// order, each from its own thread.
    pub fn complete_all(&self, payload: &Payload) -> Vec<JoinHandle<IndyResult<()>>> {
        self.accepted()
            .into_iter()
            .rev()
            .map(|handle| self.complete_later(handle, 0, payload.clone(), Duration::ZERO))
            .collect()
    }
}

/// Continuation recording every outcome it is resolved with.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<AtomicUsize>,
    outcomes: Arc<Mutex<Vec<Outcome>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn continuation(&self) -> Continuation {
        let recorder = self.clone();
        Box::new(move |outcome| {
            recorder.calls.fetch_add(1, Ordering::SeqCst);
            recorder.outcomes.lock().unwrap().push(outcome);
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Outcome> {
        self.outcomes.lock().unwrap().last().cloned()
    }
}
