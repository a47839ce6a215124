//! Result payloads delivered with successful completions.

use strum::AsRefStr;

use crate::error::{ErrorKind, IndyError, IndyResult, BOUNDARY_STATUS};

/// Owned copy of the arguments a completion callback received after its
/// status code. There is one variant per native callback shape.
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Payload {
    /// `(handle, err)`
    Empty,
    /// `(handle, err, i32)`, usually a wallet, pool or search handle.
    Handle(i32),
    /// `(handle, err, *const c_char)`
    Text(String),
    /// `(handle, err, bool)`
    Bool(bool),
    /// `(handle, err, *const u8, u32)`
    Bytes(Vec<u8>),
    /// `(handle, err, *const c_char, *const c_char)`
    TextPair(String, String),
    /// `(handle, err, *const c_char, *const u8, u32)`
    TextBytes(String, Vec<u8>),
}

/// Typed view of a [`Payload`].
pub trait FromPayload: Sized + Send + 'static {
    /// Decodes the payload of a successful completion.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::InvalidStructure`] error if the payload shape
    /// does not match the type.
    fn from_payload(payload: Payload) -> IndyResult<Self>;
}

fn mismatch(expected: &str, payload: &Payload) -> IndyError {
    IndyError::with_message(
        ErrorKind::InvalidStructure,
        BOUNDARY_STATUS,
        format!(
            "expected a {expected} completion payload, got {}",
            payload.as_ref()
        ),
    )
}

impl FromPayload for Payload {
    fn from_payload(payload: Payload) -> IndyResult<Self> {
        Ok(payload)
    }
}

impl FromPayload for () {
    fn from_payload(payload: Payload) -> IndyResult<Self> {
        match payload {
            Payload::Empty => Ok(()),
            other => Err(mismatch("empty", &other)),
        }
    }
}

impl FromPayload for i32 {
    fn from_payload(payload: Payload) -> IndyResult<Self> {
        match payload {
            Payload::Handle(value) => Ok(value),
            other => Err(mismatch("handle", &other)),
        }
    }
}

impl FromPayload for String {
    fn from_payload(payload: Payload) -> IndyResult<Self> {
        match payload {
            Payload::Text(value) => Ok(value),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl FromPayload for bool {
    fn from_payload(payload: Payload) -> IndyResult<Self> {
        match payload {
            Payload::Bool(value) => Ok(value),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl FromPayload for Vec<u8> {
    fn from_payload(payload: Payload) -> IndyResult<Self> {
        match payload {
            Payload::Bytes(value) => Ok(value),
            other => Err(mismatch("bytes", &other)),
        }
    }
}

impl FromPayload for (String, String) {
    fn from_payload(payload: Payload) -> IndyResult<Self> {
        match payload {
            Payload::TextPair(first, second) => Ok((first, second)),
            other => Err(mismatch("text_pair", &other)),
        }
    }
}

impl FromPayload for (String, Vec<u8>) {
    fn from_payload(payload: Payload) -> IndyResult<Self> {
        match payload {
            Payload::TextBytes(text, bytes) => Ok((text, bytes)),
            other => Err(mismatch("text_bytes", &other)),
        }
    }
}
