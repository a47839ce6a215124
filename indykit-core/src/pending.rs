//! Correlation of asynchronous native completions with their callers.
//!
//! Every asynchronous libindy entry point takes a command handle and a
//! callback. The [`Correlator`] hands out the handles, remembers who is
//! waiting on each one and routes the completion back to them:
//!
//! ```text
//! submit(op, continuation, native_call)
//!    ├─ lock: allocate handle, insert PendingEntry, unlock
//!    ├─ status = native_call(handle)
//!    │  ├─ status == 0 → Pending, wait for deliver(handle, ..)
//!    │  └─ status != 0 → Failed-Immediate: remove entry, resolve with error
//!    └─ return handle or error
//!
//! deliver(handle, status, payload)
//!    ├─ lock: remove entry, unlock
//!    │  └─ no entry → DanglingCompletion
//!    └─ resolve continuation with payload or translated error
//! ```
//!
//! The native entry point and every continuation run outside the table lock,
//! so a native library that completes on the issuing thread before returning
//! cannot deadlock the correlator.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::oneshot;

use crate::call::PendingCall;
use crate::code_table::CodeTable;
use crate::config::{BoundaryConfig, ConfigError};
use crate::error::{ErrorKind, IndyError, IndyResult, BOUNDARY_STATUS};
use crate::error_code::ErrorCode;
use crate::handle::{CommandHandle, HandleAllocator};
use crate::payload::{FromPayload, Payload};

/// What a pending operation eventually resolves to.
pub type Outcome = IndyResult<Payload>;

/// Caller-supplied code run with the outcome of an operation, exactly once.
pub type Continuation = Box<dyn FnOnce(Outcome) + Send + 'static>;

/// One-shot cell holding a continuation. The first `resolve` wins.
pub(crate) struct Resolver {
    slot: Mutex<Option<Continuation>>,
}

impl Resolver {
    fn new(continuation: Continuation) -> Arc<Self> {
        Arc::new(Self {
            slot: Mutex::new(Some(continuation)),
        })
    }

    /// Runs the continuation if nobody has yet. Returns whether this call did.
    pub(crate) fn resolve(&self, outcome: Outcome) -> bool {
        let continuation = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match continuation {
            Some(continuation) => {
                continuation(outcome);
                true
            }
            None => false,
        }
    }
}

struct PendingEntry {
    resolver: Arc<Resolver>,
    operation: &'static str,
    created_at: Instant,
}

struct TableState {
    entries: HashMap<CommandHandle, PendingEntry>,
    handles: HandleAllocator,
    shut_down: bool,
}

static INSTALLED: OnceLock<Arc<Correlator>> = OnceLock::new();

/// Table of in-flight native operations keyed by [`CommandHandle`].
pub struct Correlator {
    state: Mutex<TableState>,
    codes: CodeTable,
    call_timeout: Option<Duration>,
}

impl Correlator {
    /// Creates a correlator translating with the published code table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_code_table(CodeTable::published().clone())
    }

    /// Creates a correlator translating with `codes`.
    #[must_use]
    pub fn with_code_table(codes: CodeTable) -> Self {
        Self {
            state: Mutex::new(TableState {
                entries: HashMap::new(),
                handles: HandleAllocator::new(),
                shut_down: false,
            }),
            codes,
            call_timeout: None,
        }
    }

    /// Creates a correlator from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured code table is invalid.
    pub fn from_config(config: &BoundaryConfig) -> Result<Self, ConfigError> {
        let mut correlator = Self::with_code_table(config.code_table()?);
        correlator.call_timeout = config.call_timeout();
        Ok(correlator)
    }

    /// Publishes `correlator` as the one the `extern "C"` callback
    /// trampolines deliver to. Can only happen once per process.
    ///
    /// # Errors
    ///
    /// Returns the argument back if a correlator is already installed.
    pub fn install(correlator: Arc<Self>) -> Result<(), Arc<Self>> {
        INSTALLED.set(correlator)?;
        log::info!("native completion correlator installed");
        Ok(())
    }

    /// The correlator installed with [`Correlator::install`], if any.
    #[must_use]
    pub fn installed() -> Option<&'static Arc<Self>> {
        INSTALLED.get()
    }

    /// Returns the installed correlator, installing a default one first if
    /// none exists yet.
    pub fn installed_or_default() -> &'static Arc<Self> {
        INSTALLED.get_or_init(|| Arc::new(Self::new()))
    }

    /// The table used to translate status codes.
    #[must_use]
    pub const fn code_table(&self) -> &CodeTable {
        &self.codes
    }

    /// Default caller-side timeout applied by
    /// [`PendingCall::with_default_timeout`].
    #[must_use]
    pub const fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout
    }

    fn lock(&self) -> MutexGuard<'_, TableState> {
        // Continuations never run under this lock, so a poisoned guard still
        // protects a consistent table.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issues a native call whose outcome is delivered to `continuation`.
    ///
    /// `native_call` receives the allocated handle and must return the
    /// synchronous status of the entry point. On success the operation stays
    /// pending until [`Correlator::deliver`] is called with the same handle.
    /// On failure the entry is removed and `continuation` is resolved with
    /// the translated error before this returns.
    ///
    /// # Errors
    ///
    /// Returns the translated error when the native call fails synchronously
    /// and [`ErrorKind::ShutDown`] after [`Correlator::shutdown`].
    pub fn submit<F>(
        &self,
        operation: &'static str,
        continuation: Continuation,
        native_call: F,
    ) -> IndyResult<CommandHandle>
    where
        F: FnOnce(CommandHandle) -> i32,
    {
        self.register(operation, Resolver::new(continuation), native_call)
    }

    fn register<F>(
        &self,
        operation: &'static str,
        resolver: Arc<Resolver>,
        native_call: F,
    ) -> IndyResult<CommandHandle>
    where
        F: FnOnce(CommandHandle) -> i32,
    {
        let handle = {
            let mut state = self.lock();
            if state.shut_down {
                drop(state);
                let err = IndyError::with_message(
                    ErrorKind::ShutDown,
                    BOUNDARY_STATUS,
                    format!("cannot issue {operation}: the correlator is shut down"),
                );
                resolver.resolve(Err(err.clone()));
                return Err(err);
            }
            let TableState {
                entries, handles, ..
            } = &mut *state;
            let handle = handles.allocate(|candidate| entries.contains_key(&candidate));
            entries.insert(
                handle,
                PendingEntry {
                    resolver: Arc::clone(&resolver),
                    operation,
                    created_at: Instant::now(),
                },
            );
            handle
        };
        log::trace!("allocated command handle {handle} for {operation}");

        let status = native_call(handle);
        if status == ErrorCode::Success.raw() {
            log::debug!("{operation} issued with command handle {handle}");
            return Ok(handle);
        }

        let err = self.codes.error_for(status);
        let owned = {
            let mut state = self.lock();
            // the handle may already belong to a newer operation
            let owned = state
                .entries
                .get(&handle)
                .is_some_and(|entry| Arc::ptr_eq(&entry.resolver, &resolver));
            if owned {
                state.entries.remove(&handle);
            }
            owned
        };
        if owned {
            resolver.resolve(Err(err.clone()));
            log::debug!("{operation} failed immediately: {err}");
        } else {
            log::error!(
                "{operation} returned status {status} but command handle {handle} was already completed"
            );
        }
        Err(err)
    }

    /// Issues a native call and returns a future for its typed result.
    ///
    /// A synchronous failure yields a [`PendingCall`] that is already
    /// resolved with the translated error.
    pub fn issue<T, F>(&self, operation: &'static str, native_call: F) -> PendingCall<T>
    where
        T: FromPayload,
        F: FnOnce(CommandHandle) -> i32,
    {
        let (sender, receiver) = oneshot::channel();
        let resolver = Resolver::new(Box::new(move |outcome: Outcome| {
            if sender.send(outcome.and_then(T::from_payload)).is_err() {
                log::debug!("{operation} resolved after its caller stopped waiting");
            }
        }));
        let expiry = Arc::downgrade(&resolver);
        let handle = self.register(operation, resolver, native_call).ok();
        PendingCall::new(receiver, handle, self.call_timeout).expiring_through(expiry)
    }

    /// Delivers the completion for `handle`.
    ///
    /// Removes the pending entry and resolves its continuation with `payload`
    /// when `status` is success, or with the translated error otherwise. If
    /// the caller already timed out, the entry is still removed and the
    /// completion is absorbed.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DanglingCompletion`] if `handle` is not pending,
    /// which means the native layer completed an operation twice or
    /// completed one it was never given.
    pub fn deliver(&self, handle: CommandHandle, status: i32, payload: Payload) -> IndyResult<()> {
        let removed = self.lock().entries.remove(&handle);
        let Some(entry) = removed else {
            let err = IndyError::dangling(handle, status);
            log::error!("{err}");
            return Err(err);
        };

        let outcome = self.codes.translate(status).map(|()| payload);
        let elapsed = entry.created_at.elapsed();
        if entry.resolver.resolve(outcome) {
            log::debug!(
                "{} completed with status {status} for command handle {handle} after {elapsed:?}",
                entry.operation
            );
        } else {
            log::warn!(
                "absorbed late completion of {} for command handle {handle} after {elapsed:?}",
                entry.operation
            );
        }
        Ok(())
    }

    /// Resolves a pending operation with [`ErrorKind::Timeout`] without
    /// removing it; the native completion still has to arrive and is
    /// absorbed by [`Correlator::deliver`].
    ///
    /// Returns `true` if this call resolved the operation.
    pub fn expire(&self, handle: CommandHandle) -> bool {
        let resolver = self
            .lock()
            .entries
            .get(&handle)
            .map(|entry| Arc::clone(&entry.resolver));
        let expired =
            resolver.is_some_and(|resolver| resolver.resolve(Err(IndyError::timeout(handle))));
        if expired {
            log::warn!("command handle {handle} expired before its completion arrived");
        }
        expired
    }

    /// Expires every operation that has been pending for at least `age`.
    ///
    /// Returns the handles resolved by this sweep, in ascending order.
    pub fn expire_older_than(&self, age: Duration) -> Vec<CommandHandle> {
        let stale: Vec<(CommandHandle, Arc<Resolver>)> = self
            .lock()
            .entries
            .iter()
            .filter(|(_, entry)| entry.created_at.elapsed() >= age)
            .map(|(handle, entry)| (*handle, Arc::clone(&entry.resolver)))
            .collect();

        let mut expired: Vec<CommandHandle> = stale
            .into_iter()
            .filter(|(handle, resolver)| resolver.resolve(Err(IndyError::timeout(*handle))))
            .map(|(handle, _)| handle)
            .collect();
        expired.sort_unstable();
        if !expired.is_empty() {
            log::warn!(
                "expired {} command(s) pending for longer than {age:?}",
                expired.len()
            );
        }
        expired
    }

    /// Drains the table, resolving every operation still pending with
    /// [`ErrorKind::ShutDown`]. Later submissions fail immediately and later
    /// completions are reported as dangling.
    ///
    /// Returns the number of operations drained.
    pub fn shutdown(&self) -> usize {
        let drained: Vec<(CommandHandle, PendingEntry)> = {
            let mut state = self.lock();
            state.shut_down = true;
            state.entries.drain().collect()
        };
        let count = drained.len();
        for (handle, entry) in drained {
            entry.resolver.resolve(Err(IndyError::shut_down(handle)));
        }
        log::info!("correlator shut down with {count} pending command(s)");
        count
    }

    /// Number of operations in the table, including expired ones still
    /// waiting for their completion.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if `handle` is in the table.
    #[must_use]
    pub fn is_pending(&self, handle: CommandHandle) -> bool {
        self.lock().entries.contains_key(&handle)
    }

    /// Handles currently in the table, in ascending order.
    #[must_use]
    pub fn pending_handles(&self) -> Vec<CommandHandle> {
        let mut handles: Vec<CommandHandle> = self.lock().entries.keys().copied().collect();
        handles.sort_unstable();
        handles
    }
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Correlator {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if state.entries.is_empty() {
            return;
        }
        log::warn!(
            "correlator dropped with {} pending command(s)",
            state.entries.len()
        );
        for (handle, entry) in state.entries.drain() {
            entry.resolver.resolve(Err(IndyError::shut_down(handle)));
        }
    }
}

impl fmt::Debug for Correlator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Correlator")
            .field("pending", &self.pending_count())
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}
