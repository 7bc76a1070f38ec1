//! # barberia-core: Pure Business Logic for the Barbershop Back-Office
//!
//! Payroll and cash-register rules as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Barbershop Back-Office                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Desktop forms / console driver                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 Back-office commands (apps/backoffice)          │   │
//! │  │    login, record_service, pay_salary, close_day, ...            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ barberia-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  money   │ │   plan   │ │ payroll  │ │     cashbox      │  │   │
//! │  │   │  Money   │ │ Payment  │ │ preview  │ │  compute_close   │  │   │
//! │  │   │  Rate    │ │  Plan    │ │ settle   │ │  summarize_week  │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │   week · production · session · validation · types · error    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 barberia-db (SQLite repositories)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (User, Service, Expense, Advance, Salary, CashboxDay)
//! - [`money`] - Integer guaraníes and basis-point rates
//! - [`plan`] - Payment plans and the gross-pay formulas
//! - [`week`] - Salary and cashbox week ranges
//! - [`production`] - Service revenue aggregation
//! - [`payroll`] - Salary preview and settlement
//! - [`cashbox`] - Daily close with carry-forward
//! - [`session`] - Logged-in user and role checks
//! - [`validation`] - Input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use barberia_core::money::{Money, Rate};
//! use barberia_core::plan::PaymentPlan;
//!
//! let plan = PaymentPlan::BasePlusCommission {
//!     base: Money::from_gs(20_000),
//!     rate: Rate::from_bps(1000), // 10%
//! };
//! assert_eq!(plan.gross(Money::from_gs(100_000)).to_string(), "Gs 30.000");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cashbox;
pub mod error;
pub mod money;
pub mod payroll;
pub mod plan;
pub mod production;
pub mod session;
pub mod types;
pub mod validation;
pub mod week;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Rate};
pub use plan::PaymentPlan;
pub use session::Session;
pub use types::*;
pub use week::{DateRange, WeekDefinition};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Digits in a login PIN.
pub const PIN_LENGTH: usize = 4;

/// Maximum characters in a user name.
pub const MAX_NAME_LEN: usize = 80;

/// Maximum characters in an expense description.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Maximum line items on one service ticket.
pub const MAX_SERVICE_ITEMS: usize = 20;

/// Currency symbol used when printing amounts.
pub const CURRENCY_SYMBOL: &str = "Gs";
