//! Structured errors produced at the native boundary.

use std::fmt;

use strum::{AsRefStr, EnumString};

use crate::error_code::{ErrorCode, Subsystem};
use crate::handle::CommandHandle;

/// Status carried by errors the boundary raises on its own, without a native
/// status code behind them (timeouts, shutdown). The native library never
/// publishes negative codes.
pub const BOUNDARY_STATUS: i32 = -1;

/// Discriminant of an [`IndyError`].
///
/// This is a closed set: callers implement recovery by matching on it.
/// The snake case names are the forms accepted in configuration overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// One of the call arguments was rejected. `index` is the 1-based
    /// position of the argument, or `0` when it is not known.
    InvalidParameter {
        /// 1-based argument position.
        index: u32,
    },
    /// The library is in a state where the call is not allowed.
    InvalidState,
    /// A JSON or binary structure could not be parsed.
    InvalidStructure,
    /// An I/O operation inside the library failed.
    IoFailure,
    /// The wallet handle is not open.
    WalletInvalidHandle,
    /// The wallet storage type has not been registered.
    WalletUnknownType,
    /// A wallet storage type with the same name was already registered.
    WalletTypeAlreadyRegistered,
    /// A wallet with the same name already exists.
    WalletAlreadyExists,
    /// No wallet with the given name exists.
    WalletNotFound,
    /// The wallet was created for another pool.
    WalletIncompatiblePool,
    /// The wallet is already open.
    WalletAlreadyOpened,
    /// The wallet credentials were rejected.
    WalletAccessFailed,
    /// The requested wallet record does not exist.
    WalletItemNotFound,
    /// A wallet record with the same id already exists.
    WalletItemAlreadyExists,
    /// The wallet search query is malformed.
    WalletInvalidQuery,
    /// The wallet storage backend failed.
    WalletStorageError,
    /// No pool ledger configuration with the given name exists.
    PoolConfigNotCreated,
    /// The pool handle is not open.
    PoolInvalidHandle,
    /// The pool connection was terminated.
    PoolTerminated,
    /// A pool ledger configuration with the same name already exists.
    PoolConfigAlreadyExists,
    /// The ledger nodes did not reach consensus.
    LedgerNoConsensus,
    /// The ledger rejected the transaction.
    LedgerInvalidTransaction,
    /// The submitter is not allowed to write the transaction.
    LedgerSecurityError,
    /// The revocation registry has no free indices left.
    RevocationRegistryFull,
    /// The revocation index is out of range.
    InvalidRevocationIndex,
    /// A master secret with the same name already exists.
    DuplicateMasterSecretName,
    /// The proof did not verify.
    ProofRejected,
    /// The credential has been revoked.
    CredentialRevoked,
    /// A credential definition for the schema and issuer already exists.
    CredentialDefinitionAlreadyExists,
    /// The crypto type is not supported.
    UnknownCryptoError,
    /// The payment inputs exceed the outputs plus fees.
    ExtraFunds,
    /// The payment addresses belong to different payment methods.
    IncompatiblePayment,
    /// The payment inputs do not cover the outputs plus fees.
    InsufficientFunds,
    /// The payment method does not support the operation.
    PaymentOperationNotSupported,
    /// A payment source does not exist on the ledger.
    PaymentSourceNotFound,
    /// No payment method with the given name was registered.
    UnknownPaymentMethod,
    /// A completion arrived for a handle with no pending operation. This is a
    /// breach of the calling convention by the native layer, not an ordinary
    /// operation failure.
    DanglingCompletion,
    /// The caller stopped waiting before the completion arrived.
    Timeout,
    /// The correlator was shut down while the operation was pending.
    ShutDown,
    /// A status code the table does not know.
    Unmapped {
        /// The raw status code.
        code: i32,
    },
}

impl ErrorKind {
    /// Returns `true` for kinds that indicate a protocol breach by the native
    /// layer and must be escalated rather than recovered from.
    #[must_use]
    pub const fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::DanglingCompletion)
    }

    /// Short human-readable description of the kind.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => "A parameter passed to the SDK was invalid.",
            Self::InvalidState => "The SDK library experienced an unexpected internal error.",
            Self::InvalidStructure => "A value being processed is not valid.",
            Self::IoFailure => "An IO error occurred.",
            Self::WalletInvalidHandle => "The wallet handle is invalid.",
            Self::WalletUnknownType => "The wallet type is not registered.",
            Self::WalletTypeAlreadyRegistered => {
                "A wallet type with the same name is already registered."
            }
            Self::WalletAlreadyExists => "A wallet with the same name already exists.",
            Self::WalletNotFound => "The wallet was not found.",
            Self::WalletIncompatiblePool => "The wallet is not compatible with the pool.",
            Self::WalletAlreadyOpened => "The wallet is already open.",
            Self::WalletAccessFailed => "Access to the wallet was denied.",
            Self::WalletItemNotFound => "The requested wallet item was not found.",
            Self::WalletItemAlreadyExists => "A wallet item with the same id already exists.",
            Self::WalletInvalidQuery => "The wallet query is invalid.",
            Self::WalletStorageError => "The wallet storage backend failed.",
            Self::PoolConfigNotCreated => "The pool ledger configuration was not created.",
            Self::PoolInvalidHandle => "The pool handle is invalid.",
            Self::PoolTerminated => "The pool ledger was terminated.",
            Self::PoolConfigAlreadyExists => {
                "A pool ledger configuration with the same name already exists."
            }
            Self::LedgerNoConsensus => "No consensus was reached during the ledger operation.",
            Self::LedgerInvalidTransaction => "The ledger rejected the transaction.",
            Self::LedgerSecurityError => "The transaction was not permitted by the ledger.",
            Self::RevocationRegistryFull => "The revocation registry is full.",
            Self::InvalidRevocationIndex => "The user revocation index is invalid.",
            Self::DuplicateMasterSecretName => "A master secret with the same name already exists.",
            Self::ProofRejected => "The proof was rejected.",
            Self::CredentialRevoked => "The credential has been revoked.",
            Self::CredentialDefinitionAlreadyExists => {
                "A credential definition already exists for the issuer and schema."
            }
            Self::UnknownCryptoError => "An unknown crypto format was used.",
            Self::ExtraFunds => "The payment inputs exceed the outputs plus fees.",
            Self::IncompatiblePayment => "The payment methods are incompatible.",
            Self::InsufficientFunds => "There are insufficient funds for the payment.",
            Self::PaymentOperationNotSupported => {
                "The payment method does not support the operation."
            }
            Self::PaymentSourceNotFound => "The payment source does not exist.",
            Self::UnknownPaymentMethod => "The payment method is not registered.",
            Self::DanglingCompletion => "A completion arrived for a handle that is not pending.",
            Self::Timeout => "The operation timed out before the SDK completed it.",
            Self::ShutDown => "The operation was abandoned because the correlator shut down.",
            Self::Unmapped { .. } => "An unmapped error was returned by the SDK.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { index } => write!(f, "invalid_parameter({index})"),
            Self::Unmapped { code } => write!(f, "unmapped({code})"),
            other => f.write_str(other.as_ref()),
        }
    }
}

/// Error returned by the native boundary.
///
/// Carries the translated [`ErrorKind`], the raw status code it was
/// translated from and an optional message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndyError {
    kind: ErrorKind,
    code: i32,
    message: Option<String>,
}

impl IndyError {
    /// Creates an error with the default description of `kind`.
    #[must_use]
    pub const fn new(kind: ErrorKind, code: i32) -> Self {
        Self {
            kind,
            code,
            message: None,
        }
    }

    /// Creates an error with a custom message.
    #[must_use]
    pub fn with_message(kind: ErrorKind, code: i32, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: Some(message.into()),
        }
    }

    /// Error for a status code absent from the code table.
    #[must_use]
    pub fn unmapped(code: i32) -> Self {
        Self::with_message(
            ErrorKind::Unmapped { code },
            code,
            format!("An unmapped error with the code '{code}' was returned by the SDK."),
        )
    }

    /// Error for a completion delivered to a handle that is not pending.
    #[must_use]
    pub fn dangling(handle: CommandHandle, status: i32) -> Self {
        Self::with_message(
            ErrorKind::DanglingCompletion,
            status,
            format!("completion with status {status} arrived for unknown command handle {handle}"),
        )
    }

    /// Error resolved into a pending operation the caller stopped waiting on.
    #[must_use]
    pub fn timeout(handle: CommandHandle) -> Self {
        Self::with_message(
            ErrorKind::Timeout,
            BOUNDARY_STATUS,
            format!("command {handle} timed out waiting for its completion"),
        )
    }

    /// Error resolved into operations still pending at shutdown.
    #[must_use]
    pub fn shut_down(handle: CommandHandle) -> Self {
        Self::with_message(
            ErrorKind::ShutDown,
            BOUNDARY_STATUS,
            format!("command {handle} was pending when the correlator shut down"),
        )
    }

    /// The translated kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The raw status code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// The message, falling back to the kind's description.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.description())
    }

    /// The named native code, if the raw code is a published one.
    #[must_use]
    pub fn native_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_raw(self.code)
    }

    /// Subsystem of the raw status code.
    #[must_use]
    pub const fn subsystem(&self) -> Subsystem {
        Subsystem::of(self.code)
    }
}

impl fmt::Display for IndyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {}): {}", self.kind, self.code, self.message())
    }
}

impl std::error::Error for IndyError {}

/// Result type for boundary operations.
pub type IndyResult<T> = Result<T, IndyError>;
