//! Raw libindy entry points used by the [`wallet`] and [`pool`] wrappers.
//!
//! Only compiled with the `libindy` feature, which links against the
//! system `libindy` shared library.
//!
//! [`wallet`]: crate::wallet
//! [`pool`]: crate::pool

#![allow(missing_docs)]

use std::ffi::CString;
use std::os::raw::c_char;

use crate::callbacks::{EmptyCallback, HandleCallback, TextCallback};
use crate::error::{ErrorKind, IndyError, IndyResult, BOUNDARY_STATUS};

#[link(name = "indy")]
extern "C" {
    // Wallet
    pub fn indy_create_wallet(
        command_handle: i32,
        config: *const c_char,
        credentials: *const c_char,
        cb: Option<EmptyCallback>,
    ) -> i32;

    pub fn indy_open_wallet(
        command_handle: i32,
        config: *const c_char,
        credentials: *const c_char,
        cb: Option<HandleCallback>,
    ) -> i32;

    pub fn indy_close_wallet(
        command_handle: i32,
        wallet_handle: i32,
        cb: Option<EmptyCallback>,
    ) -> i32;

    pub fn indy_delete_wallet(
        command_handle: i32,
        config: *const c_char,
        credentials: *const c_char,
        cb: Option<EmptyCallback>,
    ) -> i32;

    // Pool
    pub fn indy_create_pool_ledger_config(
        command_handle: i32,
        config_name: *const c_char,
        config: *const c_char,
        cb: Option<EmptyCallback>,
    ) -> i32;

    pub fn indy_open_pool_ledger(
        command_handle: i32,
        config_name: *const c_char,
        config: *const c_char,
        cb: Option<HandleCallback>,
    ) -> i32;

    pub fn indy_close_pool_ledger(
        command_handle: i32,
        pool_handle: i32,
        cb: Option<EmptyCallback>,
    ) -> i32;

    pub fn indy_set_runtime_config(config: *const c_char) -> i32;

    // Crypto
    pub fn indy_create_key(
        command_handle: i32,
        wallet_handle: i32,
        key_json: *const c_char,
        cb: Option<TextCallback>,
    ) -> i32;
}

/// Converts argument number `index` (1-based, counting the command handle)
/// to a C string.
pub(crate) fn c_string(value: &str, index: u32) -> IndyResult<CString> {
    CString::new(value).map_err(|e| {
        IndyError::with_message(
            ErrorKind::InvalidParameter { index },
            BOUNDARY_STATUS,
            format!("argument {index} contains an interior NUL byte at {}", e.nul_position()),
        )
    })
}
