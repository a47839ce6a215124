//! Wallet lifecycle calls against the linked libindy.
//!
//! `config` and `credentials` are the JSON strings libindy documents, e.g.
//! `{"id": "alice"}` and `{"key": "..."}`.

use std::ffi::CString;

use crate::call::PendingCall;
use crate::callbacks::{on_empty, on_handle, on_text};
use crate::error::IndyResult;
use crate::pending::Correlator;
use crate::sys;

fn config_args(config: &str, credentials: &str) -> IndyResult<(CString, CString)> {
    Ok((sys::c_string(config, 2)?, sys::c_string(credentials, 3)?))
}

/// Wallet operations. Completions are routed through the installed
/// [`Correlator`], which is installed with defaults on first use.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wallet;

impl Wallet {
    /// Creates a new wallet.
    pub fn create(config: &str, credentials: &str) -> PendingCall<()> {
        let (config, credentials) = match config_args(config, credentials) {
            Ok(args) => args,
            Err(err) => return PendingCall::ready(Err(err)),
        };
        Correlator::installed_or_default().issue("create_wallet", |handle| unsafe {
            sys::indy_create_wallet(
                handle.raw(),
                config.as_ptr(),
                credentials.as_ptr(),
                Some(on_empty),
            )
        })
    }

    /// Opens a wallet and resolves with its handle.
    pub fn open(config: &str, credentials: &str) -> PendingCall<i32> {
        let (config, credentials) = match config_args(config, credentials) {
            Ok(args) => args,
            Err(err) => return PendingCall::ready(Err(err)),
        };
        Correlator::installed_or_default().issue("open_wallet", |handle| unsafe {
            sys::indy_open_wallet(
                handle.raw(),
                config.as_ptr(),
                credentials.as_ptr(),
                Some(on_handle),
            )
        })
    }

    /// Closes an open wallet.
    pub fn close(wallet_handle: i32) -> PendingCall<()> {
        Correlator::installed_or_default().issue("close_wallet", |handle| unsafe {
            sys::indy_close_wallet(handle.raw(), wallet_handle, Some(on_empty))
        })
    }

    /// Deletes a closed wallet.
    pub fn delete(config: &str, credentials: &str) -> PendingCall<()> {
        let (config, credentials) = match config_args(config, credentials) {
            Ok(args) => args,
            Err(err) => return PendingCall::ready(Err(err)),
        };
        Correlator::installed_or_default().issue("delete_wallet", |handle| unsafe {
            sys::indy_delete_wallet(
                handle.raw(),
                config.as_ptr(),
                credentials.as_ptr(),
                Some(on_empty),
            )
        })
    }

    /// Creates a signing key in an open wallet and resolves with its verkey.
    pub fn create_key(wallet_handle: i32, key_json: &str) -> PendingCall<String> {
        let key_json = match sys::c_string(key_json, 3) {
            Ok(key_json) => key_json,
            Err(err) => return PendingCall::ready(Err(err)),
        };
        Correlator::installed_or_default().issue("create_key", |handle| unsafe {
            sys::indy_create_key(handle.raw(), wallet_handle, key_json.as_ptr(), Some(on_text))
        })
    }
}
