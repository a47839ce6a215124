//! Wallet storage plugin registration.
//!
//! A storage plugin is a shared library exporting `<name>_init`, which
//! registers its storage type with libindy and returns a status code.
//! Loading the library is left to the caller; this module only runs the
//! init symbol and translates its status.

use std::fmt;

use crate::code_table::CodeTable;
use crate::error::IndyResult;

/// Signature of a storage plugin's init symbol.
pub type PluginInit = unsafe extern "C" fn() -> i32;

/// A wallet storage plugin ready to be registered.
#[derive(Clone, Copy)]
pub struct StoragePlugin {
    name: &'static str,
    init: PluginInit,
}

impl StoragePlugin {
    /// Wraps the init symbol of the plugin called `name`.
    ///
    /// # Safety
    ///
    /// `init` must be safe to call from the registering thread, and the
    /// library exporting it must stay loaded while registration runs.
    #[must_use]
    pub const unsafe fn new(name: &'static str, init: PluginInit) -> Self {
        Self { name, init }
    }

    /// Name of the storage type the plugin registers.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the init symbol and translates its status with `codes`.
    ///
    /// # Errors
    ///
    /// Returns the translated error if the init symbol reports a failure,
    /// for example [`WalletTypeAlreadyRegistered`] when the plugin was
    /// already registered.
    ///
    /// [`WalletTypeAlreadyRegistered`]: crate::error::ErrorKind::WalletTypeAlreadyRegistered
    pub fn register(&self, codes: &CodeTable) -> IndyResult<()> {
        // SAFETY: upheld by the caller of `StoragePlugin::new`.
        let status = unsafe { (self.init)() };
        match codes.translate(status) {
            Ok(()) => {
                log::info!("registered wallet storage plugin {}", self.name);
                Ok(())
            }
            Err(err) => {
                log::error!(
                    "failed to register wallet storage plugin {}: {err}",
                    self.name
                );
                Err(err)
            }
        }
    }
}

impl fmt::Debug for StoragePlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoragePlugin")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
