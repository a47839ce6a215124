//! Status codes published by the native libindy library.
//!
//! The numeric values are part of the C ABI. They are grouped by subsystem in
//! hundreds (`1xx` common, `2xx` wallet, `3xx` pool and ledger, `4xx`
//! anoncreds, `5xx` crypto, `6xx` did, `7xx` payment). The grouping is only
//! used for display; translation is always an exact-code lookup.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, FromRepr};

/// A status code returned synchronously by a native entry point or delivered
/// through a completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, FromRepr)]
#[repr(i32)]
#[allow(missing_docs)]
pub enum ErrorCode {
    Success = 0,

    CommonInvalidParam1 = 100,
    CommonInvalidParam2 = 101,
    CommonInvalidParam3 = 102,
    CommonInvalidParam4 = 103,
    CommonInvalidParam5 = 104,
    CommonInvalidParam6 = 105,
    CommonInvalidParam7 = 106,
    CommonInvalidParam8 = 107,
    CommonInvalidParam9 = 108,
    CommonInvalidParam10 = 109,
    CommonInvalidParam11 = 110,
    CommonInvalidParam12 = 111,
    CommonInvalidState = 112,
    CommonInvalidStructure = 113,
    CommonIOError = 114,
    CommonInvalidParam13 = 115,
    CommonInvalidParam14 = 116,
    CommonInvalidParam15 = 117,
    CommonInvalidParam16 = 118,
    CommonInvalidParam17 = 119,
    CommonInvalidParam18 = 120,
    CommonInvalidParam19 = 121,
    CommonInvalidParam20 = 122,
    CommonInvalidParam21 = 123,
    CommonInvalidParam22 = 124,
    CommonInvalidParam23 = 125,
    CommonInvalidParam24 = 126,
    CommonInvalidParam25 = 127,
    CommonInvalidParam26 = 128,
    CommonInvalidParam27 = 129,

    WalletInvalidHandle = 200,
    WalletUnknownTypeError = 201,
    WalletTypeAlreadyRegisteredError = 202,
    WalletAlreadyExistsError = 203,
    WalletNotFoundError = 204,
    WalletIncompatiblePoolError = 205,
    WalletAlreadyOpenedError = 206,
    WalletAccessFailed = 207,
    WalletInputError = 208,
    WalletDecodingError = 209,
    WalletStorageError = 210,
    WalletEncryptionError = 211,
    WalletItemNotFound = 212,
    WalletItemAlreadyExists = 213,
    WalletQueryError = 214,

    PoolLedgerNotCreatedError = 300,
    PoolLedgerInvalidPoolHandle = 301,
    PoolLedgerTerminated = 302,
    LedgerNoConsensusError = 303,
    LedgerInvalidTransaction = 304,
    LedgerSecurityError = 305,
    PoolLedgerConfigAlreadyExistsError = 306,
    PoolLedgerTimeout = 307,
    PoolIncompatibleProtocolVersion = 308,
    LedgerNotFound = 309,

    AnoncredsRevocationRegistryFullError = 400,
    AnoncredsInvalidUserRevocId = 401,
    AnoncredsMasterSecretDuplicateNameError = 404,
    AnoncredsProofRejected = 405,
    AnoncredsCredentialRevoked = 406,
    AnoncredsCredDefAlreadyExistsError = 407,

    UnknownCryptoTypeError = 500,

    DidAlreadyExistsError = 600,

    PaymentUnknownMethodError = 700,
    PaymentIncompatibleMethodsError = 701,
    PaymentInsufficientFundsError = 702,
    PaymentSourceDoesNotExistError = 703,
    PaymentOperationNotSupportedError = 704,
    PaymentExtraFundsError = 705,
    TransactionNotAllowedError = 706,
}

impl ErrorCode {
    /// Returns the named code for `code`, if the native library publishes one.
    #[must_use]
    pub fn from_raw(code: i32) -> Option<Self> {
        Self::from_repr(code)
    }

    /// Returns the raw value passed across the C ABI.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self as i32
    }

    /// Returns `true` for [`ErrorCode::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns the subsystem this code belongs to.
    #[must_use]
    pub const fn subsystem(self) -> Subsystem {
        Subsystem::of(self.raw())
    }
}

/// Native subsystem a status code belongs to.
///
/// Derived from the hundreds digit of the code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    /// The success code.
    Success,
    /// Parameter validation, state and I/O errors shared by every API.
    Common,
    /// Wallet and wallet storage.
    Wallet,
    /// Pool connections and ledger requests.
    Ledger,
    /// Anonymous credentials.
    Anoncreds,
    /// Signing and encryption.
    Crypto,
    /// DID management.
    Did,
    /// Payment plugins.
    Payment,
    /// Outside every published range.
    Unknown,
}

impl Subsystem {
    /// Classifies a raw status code.
    #[must_use]
    pub const fn of(code: i32) -> Self {
        match code {
            0 => Self::Success,
            100..=199 => Self::Common,
            200..=299 => Self::Wallet,
            300..=399 => Self::Ledger,
            400..=499 => Self::Anoncreds,
            500..=599 => Self::Crypto,
            600..=699 => Self::Did,
            700..=799 => Self::Payment,
            _ => Self::Unknown,
        }
    }
}
