use indykit_core::IndyError;

/// Error returned across the foreign-language boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum NativeError {
    /// A libindy status code translated to a structured error.
    #[error("{kind} (code {code}): {message}")]
    Indy {
        /// Snake case name of the error kind, e.g. `wallet_not_found`.
        kind: String,
        /// The raw status code.
        code: i32,
        /// Human-readable description.
        message: String,
    },
}

impl From<IndyError> for NativeError {
    fn from(err: IndyError) -> Self {
        Self::Indy {
            kind: err.kind().to_string(),
            code: err.code(),
            message: err.message().to_string(),
        }
    }
}
