//! Foreign-language surface of indykit.
//!
//! Exposes status code translation and the log bridge to Swift and Kotlin
//! through `UniFFI`. Rust callers should use `indykit-core` directly.
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

mod error;
pub use error::*;

mod logger;
pub use logger::*;

mod status;
pub use status::*;

uniffi::setup_scaffolding!("indykit");
