//! Command handles correlating native calls with their completions.

use std::fmt;

/// Opaque token passed to a native entry point and echoed back by its
/// completion callback.
///
/// Handles are strictly positive and unique among the operations that are
/// pending at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandHandle(i32);

impl CommandHandle {
    /// Wraps a raw handle received from the native layer.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw value passed across the C ABI.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CommandHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic handle counter.
///
/// Not synchronized: the owner calls [`HandleAllocator::allocate`] while
/// holding the lock that guards the pending table, so the liveness check and
/// the insert that follows it are atomic.
#[derive(Debug)]
pub(crate) struct HandleAllocator {
    next: i32,
}

impl HandleAllocator {
    pub(crate) const fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next handle for which `in_use` is false.
    ///
    /// Wraps from `i32::MAX` back to `1`. Terminates as long as fewer than
    /// `i32::MAX` handles are in use, since every skipped value is in use.
    pub(crate) fn allocate(&mut self, in_use: impl Fn(CommandHandle) -> bool) -> CommandHandle {
        loop {
            let candidate = CommandHandle(self.next);
            self.next = if self.next == i32::MAX { 1 } else { self.next + 1 };
            if !in_use(candidate) {
                return candidate;
            }
        }
    }

    #[cfg(test)]
    pub(crate) const fn starting_at(next: i32) -> Self {
        Self { next }
    }
}
