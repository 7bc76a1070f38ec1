//! # Error Types
//!
//! Domain-specific error types for barberia-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  barberia-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - User-fixable input failures                    │
//! │                                                                         │
//! │  barberia-db errors (separate crate)                                   │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  Back-office API errors (in app)                                       │
//! │  └── ApiError         - What the desktop UI sees (code + message)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError                          │
//! │        sqlx::Error → DbError ────────► ApiError                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A user's payment plan cannot produce a salary.
    ///
    /// ## When This Occurs
    /// - A stored `payment_type` code is outside 0..=4
    /// - A payment is attempted for a user whose plan is still `Undefined`
    ///
    /// Previews never raise this; they show a zero gross instead.
    #[error("Undefined payment type {code} for user {user_id}")]
    UndefinedPaymentType { user_id: String, code: i64 },

    /// The week was already paid to this user.
    ///
    /// ## User Workflow
    /// ```text
    /// Payroll table → "Pagar" on Juan (week 2024-06-03)
    ///      │
    ///      ▼
    /// Salary exists for (Juan, 2024-06-03)?
    ///      │ yes
    ///      ▼
    /// DuplicatePayment → UI: "Juan was already paid for this week"
    /// ```
    #[error("Salary for user {user_id} in week starting {week_start} was already paid")]
    DuplicatePayment { user_id: String, week_start: NaiveDate },

    /// The cashbox for this date was already closed.
    #[error("Cashbox for {date} is already closed")]
    AlreadyClosed { date: NaiveDate },

    /// User cannot be found (by id or PIN).
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// No one is logged in.
    #[error("No active session")]
    NotLoggedIn,

    /// The logged-in user lacks the role required for the action.
    #[error("{action} requires an administrator")]
    Forbidden { action: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are always user-fixable: the UI names the offending field and the
/// operation is aborted before anything is written.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, PIN with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., PIN already used by another user).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::MustBePositive`].
    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive {
            field: field.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::Duplicate { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
