//! Boundary between Rust callers and the libindy C ABI.
//!
//! libindy reports failures as integer status codes and delivers results of
//! asynchronous operations through `extern "C"` callbacks that echo back a
//! caller-chosen command handle. This crate provides:
//!
//! * [`translate`] and [`CodeTable`], turning status codes into structured
//!   [`IndyError`]s with a closed [`ErrorKind`].
//! * [`Correlator`], which allocates command handles, keeps track of pending
//!   operations and resolves each of them exactly once.
//! * [`callbacks`], the `extern "C"` trampolines handed to libindy.
//! * [`StoragePlugin`] registration.
//! * With the `libindy` feature, typed wallet and pool calls against the
//!   linked library.
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

mod error_code;
pub use error_code::*;

mod error;
pub use error::*;

mod handle;
pub use handle::CommandHandle;

mod payload;
pub use payload::*;

mod code_table;
pub use code_table::*;

mod config;
pub use config::*;

mod pending;
pub use pending::*;

mod call;
pub use call::*;

pub mod callbacks;

mod plugin;
pub use plugin::*;

#[cfg(feature = "libindy")]
mod sys;

#[cfg(feature = "libindy")]
pub mod pool;
#[cfg(feature = "libindy")]
pub mod wallet;
