//! Pool ledger calls against the linked libindy.

use crate::call::PendingCall;
use crate::callbacks::{on_empty, on_handle};
use crate::code_table::CodeTable;
use crate::error::IndyResult;
use crate::pending::Correlator;
use crate::sys;

/// Pool ledger operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pool;

impl Pool {
    /// Registers a named pool ledger configuration.
    ///
    /// `config` is `{"genesis_txn": "<path>"}` or empty for the library
    /// default.
    pub fn create_ledger_config(name: &str, config: Option<&str>) -> PendingCall<()> {
        let name = match sys::c_string(name, 2) {
            Ok(name) => name,
            Err(err) => return PendingCall::ready(Err(err)),
        };
        let config = match config.map(|config| sys::c_string(config, 3)).transpose() {
            Ok(config) => config,
            Err(err) => return PendingCall::ready(Err(err)),
        };
        Correlator::installed_or_default().issue("create_pool_ledger_config", |handle| unsafe {
            sys::indy_create_pool_ledger_config(
                handle.raw(),
                name.as_ptr(),
                config.as_ref().map_or(std::ptr::null(), |config| config.as_ptr()),
                Some(on_empty),
            )
        })
    }

    /// Opens a pool ledger and resolves with its handle.
    pub fn open_ledger(name: &str, config: Option<&str>) -> PendingCall<i32> {
        let name = match sys::c_string(name, 2) {
            Ok(name) => name,
            Err(err) => return PendingCall::ready(Err(err)),
        };
        let config = match config.map(|config| sys::c_string(config, 3)).transpose() {
            Ok(config) => config,
            Err(err) => return PendingCall::ready(Err(err)),
        };
        Correlator::installed_or_default().issue("open_pool_ledger", |handle| unsafe {
            sys::indy_open_pool_ledger(
                handle.raw(),
                name.as_ptr(),
                config.as_ref().map_or(std::ptr::null(), |config| config.as_ptr()),
                Some(on_handle),
            )
        })
    }

    /// Closes an open pool ledger.
    pub fn close_ledger(pool_handle: i32) -> PendingCall<()> {
        Correlator::installed_or_default().issue("close_pool_ledger", |handle| unsafe {
            sys::indy_close_pool_ledger(handle.raw(), pool_handle, Some(on_empty))
        })
    }

    /// Applies libindy runtime settings such as `{"crypto_thread_pool_size": 4}`.
    ///
    /// # Errors
    ///
    /// Returns the translated error if libindy rejects the configuration.
    pub fn set_runtime_config(config: &str) -> IndyResult<()> {
        let config = sys::c_string(config, 1)?;
        let status = unsafe { sys::indy_set_runtime_config(config.as_ptr()) };
        Correlator::installed()
            .map_or_else(CodeTable::published, |correlator| correlator.code_table())
            .translate(status)
    }
}
