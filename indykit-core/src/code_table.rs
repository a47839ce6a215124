//! Status code → [`ErrorKind`] translation table.
//!
//! Lookup is a flat exact-match map. The "invalid parameter N" clusters are
//! described by [`ParameterRange`]s, which are expanded into individual
//! entries when the table is built, so overlapping subsystem ranges can
//! never make a lookup ambiguous.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::config::ConfigError;
use crate::error::{ErrorKind, IndyError, IndyResult};
use crate::error_code::ErrorCode;

/// A contiguous run of status codes that all mean "parameter N was invalid".
///
/// `first_code` reports parameter `first_index`, `first_code + 1` reports
/// `first_index + 1` and so on up to `last_code` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRange {
    /// First status code of the run.
    pub first_code: i32,
    /// Last status code of the run, inclusive.
    pub last_code: i32,
    /// Parameter index reported by `first_code`.
    pub first_index: u32,
}

impl ParameterRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(first_code: i32, last_code: i32, first_index: u32) -> Self {
        Self {
            first_code,
            last_code,
            first_index,
        }
    }

    /// Parameter index reported by `code`, if it falls inside the range.
    #[must_use]
    pub fn index_of(&self, code: i32) -> Option<u32> {
        if !(self.first_code..=self.last_code).contains(&code) {
            return None;
        }
        let offset = u32::try_from(i64::from(code) - i64::from(self.first_code)).ok()?;
        self.first_index.checked_add(offset)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let well_formed = self.first_code > 0
            && self.first_code <= self.last_code
            && self.first_index >= 1
            && self.index_of(self.last_code).is_some();
        if well_formed {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange { range: *self })
        }
    }
}

impl fmt::Display for ParameterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..={} (from parameter {})",
            self.first_code, self.last_code, self.first_index
        )
    }
}

/// Parameter runs published by libindy: `CommonInvalidParam1..=12` sit
/// before the state/structure/IO codes, `13..=27` after them.
pub const PUBLISHED_PARAMETER_RANGES: [ParameterRange; 2] = [
    ParameterRange::new(100, 111, 1),
    ParameterRange::new(115, 129, 13),
];

/// Kind for the named, non-parametric native codes.
const fn published_kind(code: ErrorCode) -> Option<ErrorKind> {
    let kind = match code {
        ErrorCode::CommonInvalidState => ErrorKind::InvalidState,
        ErrorCode::CommonInvalidStructure => ErrorKind::InvalidStructure,
        ErrorCode::CommonIOError => ErrorKind::IoFailure,
        ErrorCode::WalletInvalidHandle => ErrorKind::WalletInvalidHandle,
        ErrorCode::WalletUnknownTypeError => ErrorKind::WalletUnknownType,
        ErrorCode::WalletTypeAlreadyRegisteredError => ErrorKind::WalletTypeAlreadyRegistered,
        ErrorCode::WalletAlreadyExistsError => ErrorKind::WalletAlreadyExists,
        ErrorCode::WalletNotFoundError => ErrorKind::WalletNotFound,
        ErrorCode::WalletIncompatiblePoolError => ErrorKind::WalletIncompatiblePool,
        ErrorCode::WalletAlreadyOpenedError => ErrorKind::WalletAlreadyOpened,
        ErrorCode::WalletAccessFailed => ErrorKind::WalletAccessFailed,
        ErrorCode::WalletStorageError => ErrorKind::WalletStorageError,
        ErrorCode::WalletItemNotFound => ErrorKind::WalletItemNotFound,
        ErrorCode::WalletItemAlreadyExists => ErrorKind::WalletItemAlreadyExists,
        ErrorCode::WalletQueryError => ErrorKind::WalletInvalidQuery,
        ErrorCode::PoolLedgerNotCreatedError => ErrorKind::PoolConfigNotCreated,
        ErrorCode::PoolLedgerInvalidPoolHandle => ErrorKind::PoolInvalidHandle,
        ErrorCode::PoolLedgerTerminated => ErrorKind::PoolTerminated,
        ErrorCode::LedgerNoConsensusError => ErrorKind::LedgerNoConsensus,
        ErrorCode::LedgerInvalidTransaction => ErrorKind::LedgerInvalidTransaction,
        ErrorCode::LedgerSecurityError => ErrorKind::LedgerSecurityError,
        ErrorCode::PoolLedgerConfigAlreadyExistsError => ErrorKind::PoolConfigAlreadyExists,
        ErrorCode::AnoncredsRevocationRegistryFullError => ErrorKind::RevocationRegistryFull,
        ErrorCode::AnoncredsInvalidUserRevocId => ErrorKind::InvalidRevocationIndex,
        ErrorCode::AnoncredsMasterSecretDuplicateNameError => {
            ErrorKind::DuplicateMasterSecretName
        }
        ErrorCode::AnoncredsProofRejected => ErrorKind::ProofRejected,
        ErrorCode::AnoncredsCredentialRevoked => ErrorKind::CredentialRevoked,
        ErrorCode::AnoncredsCredDefAlreadyExistsError => {
            ErrorKind::CredentialDefinitionAlreadyExists
        }
        ErrorCode::UnknownCryptoTypeError => ErrorKind::UnknownCryptoError,
        ErrorCode::PaymentUnknownMethodError => ErrorKind::UnknownPaymentMethod,
        ErrorCode::PaymentIncompatibleMethodsError => ErrorKind::IncompatiblePayment,
        ErrorCode::PaymentInsufficientFundsError => ErrorKind::InsufficientFunds,
        ErrorCode::PaymentSourceDoesNotExistError => ErrorKind::PaymentSourceNotFound,
        ErrorCode::PaymentOperationNotSupportedError => ErrorKind::PaymentOperationNotSupported,
        ErrorCode::PaymentExtraFundsError => ErrorKind::ExtraFunds,
        _ => return None,
    };
    Some(kind)
}

static PUBLISHED: LazyLock<CodeTable> =
    LazyLock::new(|| CodeTable::build(&PUBLISHED_PARAMETER_RANGES));

/// Flat exact-match table from status code to [`ErrorKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    kinds: HashMap<i32, ErrorKind>,
}

impl CodeTable {
    /// The table matching libindy's published code list.
    #[must_use]
    pub fn published() -> &'static Self {
        &PUBLISHED
    }

    /// Builds the published named codes plus the given parameter runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRange`] for a malformed range and
    /// [`ConfigError::OverlappingRanges`] if two ranges share a code.
    pub fn with_parameter_ranges(ranges: &[ParameterRange]) -> Result<Self, ConfigError> {
        for range in ranges {
            range.validate()?;
        }
        let mut sorted = ranges.to_vec();
        sorted.sort_by_key(|range| range.first_code);
        for pair in sorted.windows(2) {
            if pair[1].first_code <= pair[0].last_code {
                return Err(ConfigError::OverlappingRanges {
                    first: pair[0],
                    second: pair[1],
                });
            }
        }
        Ok(Self::build(ranges))
    }

    fn build(ranges: &[ParameterRange]) -> Self {
        let mut kinds: HashMap<i32, ErrorKind> = ErrorCode::iter()
            .filter_map(|code| published_kind(code).map(|kind| (code.raw(), kind)))
            .collect();
        for range in ranges {
            for code in range.first_code..=range.last_code {
                if let Some(index) = range.index_of(code) {
                    kinds.insert(code, ErrorKind::InvalidParameter { index });
                }
            }
        }
        Self { kinds }
    }

    /// Pins `code` to `kind`, replacing whatever the table held.
    ///
    /// An [`ErrorKind::Unmapped`] override always records `code` itself.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SuccessOverride`] for code `0`.
    pub fn set_override(&mut self, code: i32, kind: ErrorKind) -> Result<(), ConfigError> {
        if code == ErrorCode::Success.raw() {
            return Err(ConfigError::SuccessOverride);
        }
        let kind = match kind {
            ErrorKind::Unmapped { .. } => ErrorKind::Unmapped { code },
            other => other,
        };
        self.kinds.insert(code, kind);
        Ok(())
    }

    /// Kind registered for `code`, if any.
    #[must_use]
    pub fn kind_of(&self, code: i32) -> Option<ErrorKind> {
        self.kinds.get(&code).copied()
    }

    /// Structured error for a non-success `code`.
    ///
    /// Codes absent from the table yield [`ErrorKind::Unmapped`].
    #[must_use]
    pub fn error_for(&self, code: i32) -> IndyError {
        match self.kind_of(code) {
            Some(ErrorKind::Unmapped { .. }) | None => IndyError::unmapped(code),
            Some(kind) => IndyError::new(kind, code),
        }
    }

    /// Translates a status code: `Ok(())` for success, the structured error
    /// otherwise. Never fails on its own.
    ///
    /// # Errors
    ///
    /// Returns the translated error for every non-zero `code`.
    pub fn translate(&self, code: i32) -> IndyResult<()> {
        if code == ErrorCode::Success.raw() {
            Ok(())
        } else {
            Err(self.error_for(code))
        }
    }

    /// Number of codes with an explicit entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::published().clone()
    }
}

/// Translates `code` with the published table.
///
/// # Errors
///
/// Returns the translated error for every non-zero `code`.
pub fn translate(code: i32) -> IndyResult<()> {
    CodeTable::published().translate(code)
}
