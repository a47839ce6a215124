//! Typed futures for operations issued through a [`Correlator`].
//!
//! [`Correlator`]: crate::pending::Correlator

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Weak;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::error::{ErrorKind, IndyError, IndyResult, BOUNDARY_STATUS};
use crate::handle::CommandHandle;
use crate::pending::Resolver;

/// Result of an issued native operation.
///
/// Resolves exactly once, either with the decoded completion payload or with
/// the error the operation failed with. Dropping it does not cancel the
/// native operation; its completion is still consumed by the correlator.
#[must_use = "a pending call does nothing unless awaited or waited on"]
pub struct PendingCall<T> {
    receiver: oneshot::Receiver<IndyResult<T>>,
    handle: Option<CommandHandle>,
    default_timeout: Option<Duration>,
    expiry: Option<Weak<Resolver>>,
}

impl<T> PendingCall<T> {
    pub(crate) const fn new(
        receiver: oneshot::Receiver<IndyResult<T>>,
        handle: Option<CommandHandle>,
        default_timeout: Option<Duration>,
    ) -> Self {
        Self {
            receiver,
            handle,
            default_timeout,
            expiry: None,
        }
    }

    /// Lets [`PendingCall::timeout`] resolve the correlator entry early.
    pub(crate) fn expiring_through(mut self, resolver: Weak<Resolver>) -> Self {
        self.expiry = Some(resolver);
        self
    }

    /// A call that resolved before reaching the native layer.
    #[cfg_attr(not(feature = "libindy"), allow(dead_code))]
    pub(crate) fn ready(result: IndyResult<T>) -> Self {
        let (sender, receiver) = oneshot::channel();
        // the receiver is alive until this returns
        let _ = sender.send(result);
        Self::new(receiver, None, None)
    }

    /// Handle the operation was issued with. `None` if the native entry
    /// point failed synchronously.
    #[must_use]
    pub const fn handle(&self) -> Option<CommandHandle> {
        self.handle
    }

    /// Blocks the current thread until the operation resolves.
    ///
    /// # Errors
    ///
    /// Returns the error the operation resolved with.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn wait(self) -> IndyResult<T> {
        let handle = self.handle;
        self.receiver
            .blocking_recv()
            .unwrap_or_else(|_| Err(abandoned(handle)))
    }

    /// Waits at most `limit` for the operation.
    ///
    /// When the limit elapses the operation is resolved with
    /// [`ErrorKind::Timeout`], exactly as [`Correlator::expire`] would. The
    /// native operation keeps running; its completion is absorbed by the
    /// correlator when it arrives.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Timeout`] if `limit` elapses first, otherwise the
    /// error the operation resolved with.
    ///
    /// [`Correlator::expire`]: crate::pending::Correlator::expire
    pub async fn timeout(mut self, limit: Duration) -> IndyResult<T> {
        if let Ok(result) = tokio::time::timeout(limit, &mut self).await {
            return result;
        }

        let handle = self.handle;
        let expired = self
            .expiry
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|resolver| resolver.resolve(Err(timeout_error(handle))));
        if expired {
            log::warn!("gave up on command {handle:?} after {limit:?}");
        }
        // either the timeout just resolved above or a completion that raced
        // it is being delivered
        self.await
    }

    /// Waits with the correlator's configured call timeout, or without a
    /// limit if none is configured.
    ///
    /// # Errors
    ///
    /// See [`PendingCall::timeout`].
    pub async fn with_default_timeout(self) -> IndyResult<T> {
        match self.default_timeout {
            Some(limit) => self.timeout(limit).await,
            None => self.await,
        }
    }
}

fn timeout_error(handle: Option<CommandHandle>) -> IndyError {
    handle.map_or_else(
        || IndyError::new(ErrorKind::Timeout, BOUNDARY_STATUS),
        IndyError::timeout,
    )
}

fn abandoned(handle: Option<CommandHandle>) -> IndyError {
    IndyError::with_message(
        ErrorKind::ShutDown,
        BOUNDARY_STATUS,
        format!("command {handle:?} was dropped without being resolved"),
    )
}

impl<T> fmt::Debug for PendingCall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCall")
            .field("handle", &self.handle)
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

impl<T> Future for PendingCall<T> {
    type Output = IndyResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let handle = self.handle;
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(abandoned(handle))))
    }
}
