//! # API Error Type
//!
//! Unified error type for back-office commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Back-Office                        │
//! │                                                                         │
//! │  UI action (pay_salary)                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation? ──── ValidationError ───────────────┐              │  │
//! │  │         │                                        │              │  │
//! │  │         ▼                                        ▼              │  │
//! │  │  Business rule? ─ CoreError::DuplicatePayment ─ ApiError ──────►│  │
//! │  │         │                                        ▲              │  │
//! │  │         ▼                                        │              │  │
//! │  │  Storage? ─────── DbError::QueryFailed ──────────┘              │  │
//! │  │         │         (details logged, message generic)             │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  UI receives { "code": "DUPLICATE_PAYMENT",                            │
//! │                "message": "Salary for user ... was already paid" }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use barberia_core::{CoreError, ValidationError};
use barberia_db::DbError;

use crate::state::ConfigError;

/// Error returned from back-office commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "ALREADY_CLOSED",
///   "message": "Cashbox for 2024-06-08 is already closed"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
///
/// ## Usage in Frontend
/// ```typescript
/// switch (e.code) {
///   case 'VALIDATION_ERROR':  highlightForm(e.message); break;
///   case 'DUPLICATE_PAYMENT': refreshPayrollTable();    break;
///   case 'STORAGE_ERROR':     showRetryDialog();        break;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input the user can fix
    ValidationError,

    /// Entity does not exist
    NotFound,

    /// The week was already paid to this user
    DuplicatePayment,

    /// The day's cashbox was already closed
    AlreadyClosed,

    /// The user's payment plan cannot produce a salary
    UndefinedPaymentType,

    /// No one is logged in
    NotLoggedIn,

    /// The action needs an admin session
    Forbidden,

    /// Any other business rule refused the write
    BusinessRule,

    /// Database failure; details are in the log
    StorageError,

    /// Configuration or startup failure
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
///
/// UNIQUE violations are told apart by table; commands that know the user
/// and week (or date) translate them into the richer `CoreError` first.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            e @ DbError::UniqueViolation { .. } if e.is_unique_on("salaries") => {
                ApiError::new(ErrorCode::DuplicatePayment, "Salary for this week was already paid")
            }
            e @ DbError::UniqueViolation { .. } if e.is_unique_on("cashbox_days") => {
                ApiError::new(ErrorCode::AlreadyClosed, "Cashbox for this date is already closed")
            }
            e @ DbError::UniqueViolation { .. } if e.is_unique_on("users") => {
                ApiError::validation("PIN is already used by another user")
            }
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::Conflict(message) => ApiError::new(ErrorCode::BusinessRule, message),
            DbError::InvalidRow { entity, source } => {
                tracing::error!(entity = %entity, "Invalid stored row: {}", source);
                ApiError::from(source)
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database transaction failed")
            }
            DbError::BackupFailed(e) => {
                tracing::error!("Backup failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database backup failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::StorageError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::UndefinedPaymentType { .. } => {
                ApiError::new(ErrorCode::UndefinedPaymentType, message)
            }
            CoreError::DuplicatePayment { .. } => ApiError::new(ErrorCode::DuplicatePayment, message),
            CoreError::AlreadyClosed { .. } => ApiError::new(ErrorCode::AlreadyClosed, message),
            CoreError::UserNotFound(id) => ApiError::not_found("User", &id),
            CoreError::NotLoggedIn => ApiError::new(ErrorCode::NotLoggedIn, message),
            CoreError::Forbidden { .. } => ApiError::new(ErrorCode::Forbidden, message),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Configuration error: {}", err);
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
