use std::fmt;

use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Machine-readable codes surfaced alongside every error. Callers branch
/// on these to show field-level or banner-level messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    RequiredField,
    MaxLength,
    InvalidType,
    InvalidStatus,
    InvalidAmount,
    InvalidDate,
    FutureDate,
    DuplicateName,
    NotFound,
    SameAccount,
    InvalidDirection,
    InsufficientBalance,
    AccountActive,
    HasTransactions,
    RecurringPaused,
    StorageError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::RequiredField => "REQUIRED_FIELD",
            ErrorCode::MaxLength => "MAX_LENGTH",
            ErrorCode::InvalidType => "INVALID_TYPE",
            ErrorCode::InvalidStatus => "INVALID_STATUS",
            ErrorCode::InvalidAmount => "INVALID_AMOUNT",
            ErrorCode::InvalidDate => "INVALID_DATE",
            ErrorCode::FutureDate => "FUTURE_DATE",
            ErrorCode::DuplicateName => "DUPLICATE_NAME",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::SameAccount => "SAME_ACCOUNT",
            ErrorCode::InvalidDirection => "INVALID_DIRECTION",
            ErrorCode::InsufficientBalance => "INSUFFICIENT_BALANCE",
            ErrorCode::AccountActive => "ACCOUNT_ACTIVE",
            ErrorCode::HasTransactions => "HAS_TRANSACTIONS",
            ErrorCode::RecurringPaused => "RECURRING_PAUSED",
            ErrorCode::StorageError => "STORAGE_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the registry, ledger, recurring, and storage
/// layers. Expected failures are always returned, never panicked.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed input caught before touching storage, tagged with the
    /// offending field.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        code: ErrorCode,
        message: String,
    },
    /// A referenced entity id does not exist. `field` names the input
    /// that carried the id.
    #[error("{entity} not found: {id}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        id: Uuid,
    },
    /// A domain invariant was violated. Never produced by the store
    /// layer.
    #[error("{message}")]
    BusinessRule { code: ErrorCode, message: String },
    /// The underlying store failed to read, write, or parse.
    #[error("storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn validation(field: &'static str, code: ErrorCode, message: impl Into<String>) -> Self {
        LedgerError::Validation {
            field,
            code,
            message: message.into(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::validation(field, ErrorCode::RequiredField, format!("{field} is required"))
    }

    pub fn max_length(field: &'static str, max: usize) -> Self {
        Self::validation(
            field,
            ErrorCode::MaxLength,
            format!("{field} exceeds the maximum length of {max}"),
        )
    }

    pub fn not_found(entity: &'static str, field: &'static str, id: Uuid) -> Self {
        LedgerError::NotFound { entity, field, id }
    }

    pub fn rule(code: ErrorCode, message: impl Into<String>) -> Self {
        LedgerError::BusinessRule {
            code,
            message: message.into(),
        }
    }

    /// The machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            LedgerError::Validation { code, .. } | LedgerError::BusinessRule { code, .. } => *code,
            LedgerError::NotFound { .. } => ErrorCode::NotFound,
            LedgerError::Storage(_) => ErrorCode::StorageError,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}
