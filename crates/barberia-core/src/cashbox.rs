//! # Cashbox (Caja) Close
//!
//! Closing the day turns the day's services and expenses into one
//! [`CashboxDay`] row, carrying the previous close forward.
//!
//! ```text
//!                 prior close (latest date < today)
//!                 ┌──────────────────────────────┐
//!                 │ balance  cash  transfer  pos │
//!                 └────┬──────┬──────┬───────────┘
//!                      │      │      │       (pos is not carried)
//!  today income  ──►   +      +      +       pos = income_pos
//!  today expense ──►   −      −      −
//!                      ▼      ▼      ▼
//!                 ┌──────────────────────────────┐
//!                 │ balance  cash  transfer  pos │  today's close
//!                 └──────────────────────────────┘
//! ```
//!
//! POS card payments settle outside the register every day, so the pos
//! column only ever shows that day's card income.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::production::MethodTotals;
use crate::types::{CashboxDay, Expense, Service};
use crate::week::DateRange;

/// A computed, unsaved close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashboxClose {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub income: MethodTotals,
    pub expenses: MethodTotals,
    /// Date of the close this one carries forward from.
    #[ts(as = "Option<String>")]
    pub prior_date: Option<NaiveDate>,
    pub balance: Money,
    pub cash: Money,
    pub transfer: Money,
    pub pos: Money,
}

impl CashboxClose {
    pub fn income_total(&self) -> Money {
        self.income.total()
    }

    pub fn expense_total(&self) -> Money {
        self.expenses.total()
    }

    /// Builds the row to persist.
    pub fn into_day(self, id: String, created_at: DateTime<Utc>) -> CashboxDay {
        CashboxDay {
            id,
            date: self.date,
            income_total_gs: self.income_total().gs(),
            expense_total_gs: self.expense_total().gs(),
            balance_gs: self.balance.gs(),
            cash_gs: self.cash.gs(),
            transfer_gs: self.transfer.gs(),
            pos_gs: self.pos.gs(),
            created_at,
        }
    }
}

/// Computes the close for `date`.
///
/// Rows dated on other days are ignored, so callers may pass a wider slice.
/// `prior` must be the latest close strictly before `date`, if any.
pub fn compute_close(
    date: NaiveDate,
    services: &[Service],
    expenses: &[Expense],
    prior: Option<&CashboxDay>,
) -> CashboxClose {
    let income: MethodTotals = services
        .iter()
        .filter(|s| s.date == date)
        .map(|s| (s.payment_method, s.total()))
        .collect();
    let spent: MethodTotals = expenses
        .iter()
        .filter(|e| e.date == date)
        .map(|e| (e.payment_method, e.amount()))
        .collect();

    let (prior_balance, prior_cash, prior_transfer) = prior
        .map(|p| (p.balance(), p.cash(), p.transfer()))
        .unwrap_or_default();

    CashboxClose {
        date,
        income,
        expenses: spent,
        prior_date: prior.map(|p| p.date),
        balance: income.total() - spent.total() + prior_balance,
        cash: income.cash - spent.cash + prior_cash,
        transfer: income.transfer - spent.transfer + prior_transfer,
        pos: income.pos,
    }
}

// =============================================================================
// Week View
// =============================================================================

/// Closes within one cashbox week, with totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashboxWeek {
    pub range: DateRange,
    pub days: Vec<CashboxDay>,
    pub income_total: Money,
    pub expense_total: Money,
    pub pos_total: Money,
    /// Balance of the last close in the week.
    pub closing_balance: Option<Money>,
}

/// Summarizes the closes inside `range`, ordered by date.
pub fn summarize_week(range: DateRange, days: &[CashboxDay]) -> CashboxWeek {
    let mut days: Vec<CashboxDay> = days
        .iter()
        .filter(|d| range.contains(d.date))
        .cloned()
        .collect();
    days.sort_by_key(|d| d.date);

    CashboxWeek {
        range,
        income_total: days.iter().map(|d| Money::from_gs(d.income_total_gs)).sum(),
        expense_total: days.iter().map(|d| Money::from_gs(d.expense_total_gs)).sum(),
        pos_total: days.iter().map(CashboxDay::pos).sum(),
        closing_balance: days.last().map(CashboxDay::balance),
        days,
    }
}
