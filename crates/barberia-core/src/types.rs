//! # Domain Types
//!
//! Core domain types used throughout the back-office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │     Service     │   │     Expense     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  user_id (FK)   │   │  expense_type   │       │
//! │  │  pin (4 digits) │   │  date, method   │   │  amount_gs      │       │
//! │  │  plan           │   │  total_gs       │   │  method         │       │
//! │  └─────────────────┘   │  items[]        │   └────────▲────────┘       │
//! │           ▲            └─────────────────┘            │ expense_id     │
//! │           │                                  ┌────────┴────────┐       │
//! │           └──────────────────────────────────│ Advance, Salary │       │
//! │                                               └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   CashboxDay    │   │  PaymentMethod  │   │   ExpenseType   │       │
//! │  │  balance  (Σ)   │   │  Cash           │   │  Supply ...     │       │
//! │  │  cash     (Σ)   │   │  Transfer       │   │  Salary  (sys)  │       │
//! │  │  transfer (Σ)   │   │  Pos            │   │  Advance (sys)  │       │
//! │  │  pos  (daily)   │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are stored as `*_gs: i64` columns and exposed as [`Money`]
//! through accessor methods.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::plan::PaymentPlan;

// =============================================================================
// Role
// =============================================================================

/// What a logged-in user may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Owner/manager: user management, deletes, corrections.
    Admin,
    /// Barber or cashier.
    #[default]
    User,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How money moved in or out of the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash in the register.
    Cash,
    /// Bank transfer.
    Transfer,
    /// Card payment on the POS terminal (settles externally each day).
    Pos,
}

impl PaymentMethod {
    /// All methods, in display order.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Transfer,
        PaymentMethod::Pos,
    ];

    /// Stable lowercase name (matches the stored value).
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Pos => "pos",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "efectivo" => Ok(PaymentMethod::Cash),
            "transfer" | "transferencia" => Ok(PaymentMethod::Transfer),
            "pos" | "card" | "tarjeta" => Ok(PaymentMethod::Pos),
            "" => Err(crate::error::ValidationError::required("payment method")),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Expense Type
// =============================================================================

/// Category of an expense.
///
/// `Salary` and `Advance` are generated by payroll only; they keep a single
/// expense ledger that reconciles with the salary and advance tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    Supply,
    Service,
    Purchase,
    Tax,
    Other,
    Salary,
    Advance,
}

impl ExpenseType {
    /// Types a user may pick in the expense form.
    pub const USER_SELECTABLE: [ExpenseType; 5] = [
        ExpenseType::Supply,
        ExpenseType::Service,
        ExpenseType::Purchase,
        ExpenseType::Tax,
        ExpenseType::Other,
    ];

    /// True for the payroll-generated types.
    pub fn is_system_generated(&self) -> bool {
        matches!(self, ExpenseType::Salary | ExpenseType::Advance)
    }

    /// Stable lowercase name (matches the stored value).
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::Supply => "supply",
            ExpenseType::Service => "service",
            ExpenseType::Purchase => "purchase",
            ExpenseType::Tax => "tax",
            ExpenseType::Other => "other",
            ExpenseType::Salary => "salary",
            ExpenseType::Advance => "advance",
        }
    }
}

impl std::fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// User
// =============================================================================

/// A barber or administrator.
///
/// The payment plan decides how the weekly salary is computed. It is stored
/// as a code plus two parameters and decoded into [`PaymentPlan`] when the
/// row is read, so an unknown code never reaches the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    pub role: Role,

    /// Exactly four digits, unique across users. Sole login credential.
    pub pin: String,

    /// Salary formula.
    pub plan: PaymentPlan,

    /// Inactive users keep their history but leave the payroll table.
    pub active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// True when the user has the admin role.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// Service (ticket)
// =============================================================================

/// A performed service: one ticket, possibly several line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Service {
    pub id: String,

    /// Barber credited with the production.
    pub user_id: String,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub payment_method: PaymentMethod,

    /// Sum of item prices, in guaraníes.
    pub total_gs: i64,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Service {
    /// Returns the ticket total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_gs(self.total_gs)
    }
}

/// A line item on a service ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ServiceItem {
    pub id: String,
    pub service_id: String,
    /// Kind of service ("corte", "barba", ...).
    pub service_type: String,
    pub price_gs: i64,
}

impl ServiceItem {
    /// Returns the item price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_gs(self.price_gs)
    }
}

// =============================================================================
// Expense
// =============================================================================

/// Money leaving the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount_gs: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub expense_type: ExpenseType,
    pub payment_method: PaymentMethod,
    /// Employee the expense was paid to (salary/advance only).
    pub user_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Returns the expense amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_gs(self.amount_gs)
    }
}

// =============================================================================
// Advance
// =============================================================================

/// Where an advance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceOrigin {
    /// Money handed to the employee; paired with an `advance` expense.
    Cash,
    /// Salary deficit moved to the next week; no money changed hands.
    Carryover,
}

/// Money owed by an employee, deducted from the week it falls in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Advance {
    pub id: String,
    pub user_id: String,
    pub amount_gs: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// `None` for carry-overs.
    pub payment_method: Option<PaymentMethod>,
    pub origin: AdvanceOrigin,
    /// Linked `advance` expense; always set for cash advances.
    pub expense_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Advance {
    /// Returns the advance amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_gs(self.amount_gs)
    }
}

// =============================================================================
// Salary
// =============================================================================

/// A paid weekly salary.
///
/// Production, gross, advances and the plan code are snapshots taken at pay
/// time, so the row stays correct if the user's plan changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Salary {
    pub id: String,
    pub user_id: String,
    #[ts(as = "String")]
    pub week_start: NaiveDate,
    #[ts(as = "String")]
    pub week_end: NaiveDate,
    pub total_production_gs: i64,
    pub gross_gs: i64,
    pub advances_gs: i64,
    pub bonus_gs: i64,
    /// Final net paid (never negative).
    pub amount_paid_gs: i64,
    /// `payment_type` code of the plan used.
    pub pay_type_snapshot: i64,
    #[ts(as = "Option<String>")]
    pub pay_date: Option<DateTime<Utc>>,
    pub payment_method: Option<PaymentMethod>,
    /// Linked `salary` expense; `None` when nothing was paid out.
    pub expense_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Salary {
    /// Returns the amount paid as Money.
    #[inline]
    pub fn amount_paid(&self) -> Money {
        Money::from_gs(self.amount_paid_gs)
    }

    /// Returns the production snapshot as Money.
    #[inline]
    pub fn total_production(&self) -> Money {
        Money::from_gs(self.total_production_gs)
    }
}

// =============================================================================
// Cashbox Day
// =============================================================================

/// One closed day of the cash register.
///
/// `balance_gs`, `cash_gs` and `transfer_gs` are cumulative across days;
/// `pos_gs` is that day's POS income only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CashboxDay {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub income_total_gs: i64,
    pub expense_total_gs: i64,
    pub balance_gs: i64,
    pub cash_gs: i64,
    pub transfer_gs: i64,
    pub pos_gs: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CashboxDay {
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_gs(self.balance_gs)
    }

    #[inline]
    pub fn cash(&self) -> Money {
        Money::from_gs(self.cash_gs)
    }

    #[inline]
    pub fn transfer(&self) -> Money {
        Money::from_gs(self.transfer_gs)
    }

    #[inline]
    pub fn pos(&self) -> Money {
        Money::from_gs(self.pos_gs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
