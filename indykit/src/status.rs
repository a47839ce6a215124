use indykit_core::{translate, ErrorCode, ErrorKind, Subsystem};

use crate::error::NativeError;

/// Structured description of a libindy status code.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct StatusInfo {
    /// The raw status code.
    pub code: i32,
    /// Snake case kind name, `success` for code `0`.
    pub kind: String,
    /// Subsystem the code belongs to, e.g. `wallet`.
    pub subsystem: String,
    /// Name of the code in libindy's published list, if it is listed.
    pub native_name: Option<String>,
    /// 1-based argument position for "invalid parameter" codes.
    pub parameter_index: Option<u32>,
    /// Human-readable description.
    pub message: String,
}

/// Describes `code` without failing, including codes libindy never
/// published.
#[must_use]
#[uniffi::export]
pub fn describe_status(code: i32) -> StatusInfo {
    let native_name = ErrorCode::from_raw(code).map(|native| native.to_string());
    let subsystem = Subsystem::of(code).to_string();
    match translate(code) {
        Ok(()) => StatusInfo {
            code,
            kind: "success".to_string(),
            subsystem,
            native_name,
            parameter_index: None,
            message: "The operation completed successfully.".to_string(),
        },
        Err(err) => StatusInfo {
            code,
            kind: err.kind().as_ref().to_string(),
            subsystem,
            native_name,
            parameter_index: match err.kind() {
                ErrorKind::InvalidParameter { index } => Some(index),
                _ => None,
            },
            message: err.message().to_string(),
        },
    }
}

/// Fails with the translated error unless `code` is `0`.
///
/// # Errors
///
/// Returns [`NativeError::Indy`] for every non-zero code.
#[uniffi::export]
pub fn check_status(code: i32) -> Result<(), NativeError> {
    translate(code).map_err(NativeError::from)
}
