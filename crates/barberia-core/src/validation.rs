//! # Validation Module
//!
//! Input checks run by the back-office before anything is written.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Desktop form                                                 │
//! │  └── empty fields, numeric inputs                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Back-office command                                          │
//! │  └── THIS MODULE: PINs, amounts, expense types, ticket items           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── CHECK (amount_gs > 0)                                             │
//! │  ├── UNIQUE (pin), UNIQUE (date), UNIQUE (user_id, week_start)        │
//! │  └── FOREIGN KEY constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use barberia_core::validation::{validate_pin, validate_amount};
//!
//! validate_pin("0427").unwrap();
//! validate_amount("amount", 35_000).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::ExpenseType;
use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_SERVICE_ITEMS, PIN_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a login PIN.
///
/// ## Rules
/// - Exactly four characters
/// - ASCII digits only ("0427" is fine, "12a4" is not)
///
/// ```rust
/// use barberia_core::validation::validate_pin;
///
/// assert!(validate_pin("0427").is_ok());
/// assert!(validate_pin("427").is_err());
/// assert!(validate_pin("12a4").is_err());
/// ```
pub fn validate_pin(pin: &str) -> ValidationResult<()> {
    if pin.is_empty() {
        return Err(ValidationError::required("pin"));
    }

    if pin.len() != PIN_LENGTH || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "pin".to_string(),
            reason: format!("must be exactly {PIN_LENGTH} digits"),
        });
    }

    Ok(())
}

/// Validates a person's display name. Returns it trimmed.
pub fn validate_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates an expense description. Returns it trimmed.
pub fn validate_description(description: &str) -> ValidationResult<String> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::required("description"));
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(description.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a money amount entered in a form (guaraníes, > 0).
pub fn validate_amount(field: &str, gs: i64) -> ValidationResult<()> {
    if gs <= 0 {
        return Err(ValidationError::must_be_positive(field));
    }
    Ok(())
}

/// Validates the line items of a service ticket.
///
/// ## Rules
/// - At least one item, at most `MAX_SERVICE_ITEMS`
/// - Every item has a kind and a positive price
///
/// ## User Workflow
/// ```text
/// Ticket form: Ana, cash
///   + corte  50.000
///   + barba  30.000
///       │
///       ▼
/// validate_service_items ← THIS FUNCTION
///       │
///       ├── no items?        → "items is required"
///       ├── price ≤ 0?       → "price must be positive"
///       └── OK → total = 80.000, header + items in one transaction
/// ```
pub fn validate_service_items(items: &[(String, i64)]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::required("items"));
    }

    if items.len() > MAX_SERVICE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SERVICE_ITEMS as i64,
        });
    }

    for (kind, price) in items {
        if kind.trim().is_empty() {
            return Err(ValidationError::required("service type"));
        }
        validate_amount("price", *price)?;
    }

    Ok(())
}

// =============================================================================
// Enum Validators
// =============================================================================

/// Rejects the payroll-only expense types for hand-entered expenses.
pub fn validate_user_expense_type(expense_type: ExpenseType) -> ValidationResult<()> {
    if expense_type.is_system_generated() {
        return Err(ValidationError::NotAllowed {
            field: "expense type".to_string(),
            allowed: ExpenseType::USER_SELECTABLE
                .iter()
                .map(|t| t.to_string())
                .collect(),
        });
    }
    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ```rust
/// use barberia_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
