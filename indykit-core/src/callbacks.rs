//! `extern "C"` completion callbacks handed to libindy.
//!
//! libindy calls back with `(command_handle, err, ...)` where the trailing
//! arguments depend on the operation. There is one trampoline per argument
//! shape. Each copies its arguments into an owned [`Payload`] (only when
//! `err` is success; borrowed pointers are invalid once the callback
//! returns) and delivers it to the installed [`Correlator`].
//!
//! Completions that cannot be delivered (no correlator installed, or a
//! dangling handle) are logged; there is no caller to return them to.

use std::ffi::CStr;
use std::os::raw::c_char;

use crate::error_code::ErrorCode;
use crate::handle::CommandHandle;
use crate::payload::Payload;
use crate::pending::Correlator;

/// `(command_handle, err)`
pub type EmptyCallback = unsafe extern "C" fn(i32, i32);
/// `(command_handle, err, handle)`
pub type HandleCallback = unsafe extern "C" fn(i32, i32, i32);
/// `(command_handle, err, text)`
pub type TextCallback = unsafe extern "C" fn(i32, i32, *const c_char);
/// `(command_handle, err, flag)`
pub type BoolCallback = unsafe extern "C" fn(i32, i32, bool);
/// `(command_handle, err, data, data_len)`
pub type BytesCallback = unsafe extern "C" fn(i32, i32, *const u8, u32);
/// `(command_handle, err, first, second)`
pub type TextPairCallback = unsafe extern "C" fn(i32, i32, *const c_char, *const c_char);
/// `(command_handle, err, text, data, data_len)`
pub type TextBytesCallback = unsafe extern "C" fn(i32, i32, *const c_char, *const u8, u32);

fn complete(command_handle: i32, err: i32, payload: impl FnOnce() -> Payload) {
    let Some(correlator) = Correlator::installed() else {
        log::error!(
            "completion with status {err} for command handle {command_handle} arrived before a correlator was installed"
        );
        return;
    };
    let payload = if err == ErrorCode::Success.raw() {
        payload()
    } else {
        Payload::Empty
    };
    // dangling completions are logged by deliver
    let _ = correlator.deliver(CommandHandle::from_raw(command_handle), err, payload);
}

/// Copies a NUL-terminated string. Null reads as empty.
unsafe fn copy_text(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

/// Copies `len` bytes. Null or zero length reads as empty.
unsafe fn copy_bytes(ptr: *const u8, len: u32) -> Vec<u8> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    std::slice::from_raw_parts(ptr, len as usize).to_vec()
}

/// Completion for operations with no result value.
///
/// # Safety
///
/// Safe to call from any thread.
pub unsafe extern "C" fn on_empty(command_handle: i32, err: i32) {
    complete(command_handle, err, || Payload::Empty);
}

/// Completion for operations returning a handle (wallet, pool, search).
///
/// # Safety
///
/// Safe to call from any thread.
pub unsafe extern "C" fn on_handle(command_handle: i32, err: i32, handle: i32) {
    complete(command_handle, err, || Payload::Handle(handle));
}

/// Completion for operations returning a string.
///
/// # Safety
///
/// When `err` is success, `text` must be null or a valid NUL-terminated
/// string for the duration of the call.
pub unsafe extern "C" fn on_text(command_handle: i32, err: i32, text: *const c_char) {
    complete(command_handle, err, || Payload::Text(copy_text(text)));
}

/// Completion for operations returning a flag.
///
/// # Safety
///
/// Safe to call from any thread.
pub unsafe extern "C" fn on_bool(command_handle: i32, err: i32, flag: bool) {
    complete(command_handle, err, || Payload::Bool(flag));
}

/// Completion for operations returning raw bytes.
///
/// # Safety
///
/// When `err` is success, `data` must be null or valid for reads of
/// `data_len` bytes for the duration of the call.
pub unsafe extern "C" fn on_bytes(command_handle: i32, err: i32, data: *const u8, data_len: u32) {
    complete(command_handle, err, || {
        Payload::Bytes(copy_bytes(data, data_len))
    });
}

/// Completion for operations returning two strings, such as a DID and its
/// verkey.
///
/// # Safety
///
/// When `err` is success, both pointers must be null or valid
/// NUL-terminated strings for the duration of the call.
pub unsafe extern "C" fn on_text_pair(
    command_handle: i32,
    err: i32,
    first: *const c_char,
    second: *const c_char,
) {
    complete(command_handle, err, || {
        Payload::TextPair(copy_text(first), copy_text(second))
    });
}

/// Completion for operations returning a string and raw bytes, such as an
/// unpacked message and its sender.
///
/// # Safety
///
/// When `err` is success, `text` must be null or a valid NUL-terminated
/// string and `data` null or valid for reads of `data_len` bytes, both for
/// the duration of the call.
pub unsafe extern "C" fn on_text_bytes(
    command_handle: i32,
    err: i32,
    text: *const c_char,
    data: *const u8,
    data_len: u32,
) {
    complete(command_handle, err, || {
        Payload::TextBytes(copy_text(text), copy_bytes(data, data_len))
    });
}
