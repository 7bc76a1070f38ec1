//! # Payroll
//!
//! Weekly salary computation. Two entry points share one formula:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  preview_salary   display only                                         │
//! │    Undefined plan → gross 0                                            │
//! │    negative net shown as is, nothing else happens                      │
//! │                                                                         │
//! │  settle_salary    payment path                                         │
//! │    user must be valid + active                                         │
//! │    Undefined plan → UndefinedPaymentType                               │
//! │    net < 0 → paid 0 + CarryoverAdvance(|net|) dated next Monday        │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//!   gross = plan.gross(production)
//!   net   = gross + bonus − advances
//! ```
//!
//! Production and advances are looked up by the caller for the week range
//! and passed in; nothing here touches storage or the clock.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::plan::PaymentPlan;
use crate::types::{Advance, AdvanceOrigin, PaymentMethod, Salary, User};
use crate::validation::validate_uuid;
use crate::week::DateRange;

/// What the payroll table shows for one user before paying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalaryPreview {
    pub user_id: String,
    pub week: DateRange,
    pub plan: PaymentPlan,
    pub production: Money,
    pub gross: Money,
    pub advances: Money,
    pub bonus: Money,
    /// `gross + bonus − advances`; may be negative.
    pub net: Money,
}

/// Computes a salary for display. Never fails.
pub fn preview_salary(
    user: &User,
    week: DateRange,
    production: Money,
    advances: Money,
    bonus: Money,
) -> SalaryPreview {
    let gross = user.plan.gross(production);
    SalaryPreview {
        user_id: user.id.clone(),
        week,
        plan: user.plan,
        production,
        gross,
        advances,
        bonus,
        net: gross + bonus - advances,
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// An unsaved salary: everything except ids, pay date and method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalaryDraft {
    pub user_id: String,
    pub week: DateRange,
    pub total_production: Money,
    pub gross: Money,
    pub advances: Money,
    pub bonus: Money,
    /// Never negative.
    pub amount_paid: Money,
    pub pay_type_snapshot: i64,
}

impl SalaryDraft {
    /// Adds a bonus decided at the moment of paying.
    ///
    /// The regular flow already passes the bonus to [`settle_salary`] and
    /// tops up with zero.
    pub fn top_up(mut self, bonus: Money) -> CoreResult<Self> {
        if bonus.is_negative() {
            return Err(ValidationError::OutOfRange {
                field: "bonus".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }
        self.bonus += bonus;
        self.amount_paid += bonus;
        Ok(self)
    }

    /// Builds the row to persist. `expense_id` is filled in by the writer.
    pub fn into_salary(
        self,
        id: String,
        payment_method: PaymentMethod,
        paid_at: DateTime<Utc>,
    ) -> Salary {
        Salary {
            id,
            user_id: self.user_id,
            week_start: self.week.start,
            week_end: self.week.end,
            total_production_gs: self.total_production.gs(),
            gross_gs: self.gross.gs(),
            advances_gs: self.advances.gs(),
            bonus_gs: self.bonus.gs(),
            amount_paid_gs: self.amount_paid.gs(),
            pay_type_snapshot: self.pay_type_snapshot,
            pay_date: Some(paid_at),
            payment_method: Some(payment_method),
            expense_id: None,
            created_at: paid_at,
        }
    }
}

/// A salary deficit moved into the following week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CarryoverAdvance {
    pub user_id: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub date: NaiveDate,
}

impl CarryoverAdvance {
    pub fn into_advance(self, id: String, created_at: DateTime<Utc>) -> Advance {
        Advance {
            id,
            user_id: self.user_id,
            amount_gs: self.amount.gs(),
            date: self.date,
            payment_method: None,
            origin: AdvanceOrigin::Carryover,
            expense_id: None,
            created_at,
        }
    }
}

/// Result of [`settle_salary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settlement {
    pub salary: SalaryDraft,
    pub carryover: Option<CarryoverAdvance>,
}

/// Computes the salary to pay.
///
/// ## Errors
/// - `Validation` if the user id is not a UUID, the user is inactive or the
///   bonus is negative
/// - `UndefinedPaymentType` if the user has no plan yet
///
/// ## Example
/// ```rust
/// use barberia_core::money::{Money, Rate};
/// use barberia_core::payroll::settle_salary;
/// use barberia_core::plan::PaymentPlan;
/// use barberia_core::types::{Role, User};
/// use barberia_core::week::WeekDefinition;
/// use chrono::{NaiveDate, Utc};
///
/// let user = User {
///     id: "550e8400-e29b-41d4-a716-446655440000".into(),
///     name: "Ana".into(),
///     role: Role::User,
///     pin: "1234".into(),
///     plan: PaymentPlan::Commission { rate: Rate::from_bps(10_000) },
///     active: true,
///     created_at: Utc::now(),
/// };
/// let week = WeekDefinition::MondayToSaturday
///     .range_containing(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
///
/// let s = settle_salary(&user, week, Money::from_gs(10_000), Money::from_gs(50_000), Money::zero())
///     .unwrap();
/// assert_eq!(s.salary.amount_paid, Money::zero());
/// assert_eq!(s.carryover.unwrap().amount, Money::from_gs(40_000));
/// ```
pub fn settle_salary(
    user: &User,
    week: DateRange,
    production: Money,
    advances: Money,
    bonus: Money,
) -> CoreResult<Settlement> {
    validate_uuid(&user.id)?;
    if !user.active {
        return Err(ValidationError::NotAllowed {
            field: "user".to_string(),
            allowed: vec!["active users".to_string()],
        }
        .into());
    }
    if bonus.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "bonus".to_string(),
            min: 0,
            max: i64::MAX,
        }
        .into());
    }
    if user.plan.is_undefined() {
        return Err(CoreError::UndefinedPaymentType {
            user_id: user.id.clone(),
            code: user.plan.code(),
        });
    }

    let gross = user.plan.gross(production);
    let net = gross + bonus - advances;

    let carryover = net.is_negative().then(|| CarryoverAdvance {
        user_id: user.id.clone(),
        amount: net.abs(),
        date: week.next_week_start(),
    });

    Ok(Settlement {
        salary: SalaryDraft {
            user_id: user.id.clone(),
            week,
            total_production: production,
            gross,
            advances,
            bonus,
            amount_paid: net.clamp_non_negative(),
            pay_type_snapshot: user.plan.code(),
        },
        carryover,
    })
}

// =============================================================================
// Weekly Table
// =============================================================================

/// One row of the weekly payroll table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeeklySalaryRow {
    pub user_id: String,
    pub user_name: String,
    pub plan_label: String,
    pub production: Money,
    pub advances: Money,
    pub gross: Money,
    pub net_preview: Money,
    pub paid: bool,
    pub salary_id: Option<String>,
    pub amount_paid: Option<Money>,
}

impl WeeklySalaryRow {
    pub fn new(user: &User, preview: &SalaryPreview, existing: Option<&Salary>) -> Self {
        WeeklySalaryRow {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            plan_label: user.plan.label().to_string(),
            production: preview.production,
            advances: preview.advances,
            gross: preview.gross,
            net_preview: preview.net,
            paid: existing.is_some(),
            salary_id: existing.map(|s| s.id.clone()),
            amount_paid: existing.map(Salary::amount_paid),
        }
    }
}

/// Orders rows by user name, case-insensitively.
pub fn sort_weekly_rows(rows: &mut [WeeklySalaryRow]) {
    rows.sort_by(|a, b| {
        a.user_name
            .to_lowercase()
            .cmp(&b.user_name.to_lowercase())
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Rate;
    use crate::types::Role;
    use crate::week::WeekDefinition;

    const USER_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn user(plan: PaymentPlan) -> User {
        User {
            id: USER_ID.to_string(),
            name: "Ana".to_string(),
            role: Role::User,
            pin: "1234".to_string(),
            plan,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn week() -> DateRange {
        WeekDefinition::MondayToSaturday
            .range_containing(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap())
    }

    fn gs(v: i64) -> Money {
        Money::from_gs(v)
    }

    fn settle(plan: PaymentPlan, production: i64, advances: i64, bonus: i64) -> Settlement {
        settle_salary(&user(plan), week(), gs(production), gs(advances), gs(bonus)).unwrap()
    }

    #[test]
    fn test_formula_per_plan() {
        let s = settle(PaymentPlan::Commission { rate: Rate::from_bps(5000) }, 100_000, 0, 0);
        assert_eq!(s.salary.amount_paid, gs(50_000));

        let s = settle(
            PaymentPlan::BasePlusCommission { base: gs(20_000), rate: Rate::from_bps(1000) },
            100_000,
            0,
            0,
        );
        assert_eq!(s.salary.amount_paid, gs(30_000));

        let s = settle(PaymentPlan::FixedWeekly { amount: gs(150_000) }, 0, 0, 0);
        assert_eq!(s.salary.amount_paid, gs(150_000));

        let min_or_pct = PaymentPlan::MinimumOrPercentage {
            minimum: gs(50_000),
            rate: Rate::from_bps(2000),
        };
        assert_eq!(settle(min_or_pct, 30_000, 0, 0).salary.amount_paid, gs(50_000));
        assert_eq!(settle(min_or_pct, 300_000, 0, 0).salary.amount_paid, gs(60_000));
    }

    #[test]
    fn test_deficit_becomes_carryover_advance() {
        let s = settle(
            PaymentPlan::Commission { rate: Rate::from_bps(10_000) },
            10_000,
            50_000,
            0,
        );
        assert_eq!(s.salary.amount_paid, Money::zero());
        assert_eq!(s.salary.gross, gs(10_000));
        let carry = s.carryover.unwrap();
        assert_eq!(carry.amount, gs(40_000));
        assert_eq!(carry.user_id, USER_ID);
        // deducted in the following week
        assert_eq!(carry.date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert!(!week().contains(carry.date));
    }

    #[test]
    fn test_exact_zero_has_no_carryover() {
        let s = settle(PaymentPlan::FixedWeekly { amount: gs(50_000) }, 0, 50_000, 0);
        assert_eq!(s.salary.amount_paid, Money::zero());
        assert!(s.carryover.is_none());
    }

    #[test]
    fn test_bonus_and_advances() {
        let s = settle(PaymentPlan::FixedWeekly { amount: gs(100_000) }, 0, 30_000, 10_000);
        assert_eq!(s.salary.amount_paid, gs(80_000));
        assert_eq!(s.salary.advances, gs(30_000));
        assert_eq!(s.salary.bonus, gs(10_000));
        assert_eq!(s.salary.pay_type_snapshot, 3);
    }

    #[test]
    fn test_settle_rejects_undefined_plan() {
        let err = settle_salary(&user(PaymentPlan::Undefined), week(), gs(1), gs(0), gs(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::UndefinedPaymentType { code: 0, .. }));
    }

    #[test]
    fn test_settle_rejects_invalid_or_inactive_user() {
        let mut u = user(PaymentPlan::FixedWeekly { amount: gs(1) });
        u.id = String::new();
        assert!(matches!(
            settle_salary(&u, week(), gs(0), gs(0), gs(0)),
            Err(CoreError::Validation(_))
        ));

        let mut u = user(PaymentPlan::FixedWeekly { amount: gs(1) });
        u.active = false;
        assert!(matches!(
            settle_salary(&u, week(), gs(0), gs(0), gs(0)),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_preview_tolerates_undefined_plan() {
        let p = preview_salary(&user(PaymentPlan::Undefined), week(), gs(80_000), gs(5_000), gs(0));
        assert_eq!(p.gross, Money::zero());
        assert_eq!(p.net, gs(-5_000));
    }

    #[test]
    fn test_preview_matches_settle_when_positive() {
        let plan = PaymentPlan::Commission { rate: Rate::from_bps(4000) };
        let p = preview_salary(&user(plan), week(), gs(200_000), gs(10_000), gs(0));
        let s = settle(plan, 200_000, 10_000, 0);
        assert_eq!(p.net, s.salary.amount_paid);
    }

    #[test]
    fn test_top_up() {
        let s = settle(PaymentPlan::FixedWeekly { amount: gs(100_000) }, 0, 0, 0);
        let draft = s.salary.top_up(gs(5_000)).unwrap();
        assert_eq!(draft.amount_paid, gs(105_000));
        assert_eq!(draft.bonus, gs(5_000));
        assert!(draft.top_up(gs(-1)).is_err());
    }

    #[test]
    fn test_into_rows() {
        let now = Utc::now();
        let s = settle(PaymentPlan::FixedWeekly { amount: gs(100_000) }, 0, 0, 0);
        let salary = s.salary.into_salary("s-1".into(), PaymentMethod::Cash, now);
        assert_eq!(salary.week_start, week().start);
        assert_eq!(salary.week_end, week().end);
        assert_eq!(salary.pay_date, Some(now));
        assert_eq!(salary.expense_id, None);

        let carry = CarryoverAdvance {
            user_id: USER_ID.into(),
            amount: gs(40_000),
            date: week().next_week_start(),
        };
        let advance = carry.into_advance("a-1".into(), now);
        assert_eq!(advance.origin, AdvanceOrigin::Carryover);
        assert_eq!(advance.payment_method, None);
        assert_eq!(advance.amount_gs, 40_000);
    }

    #[test]
    fn test_weekly_rows_sorted_by_name() {
        let plan = PaymentPlan::FixedWeekly { amount: gs(1_000) };
        let mut rows: Vec<WeeklySalaryRow> = ["zoe", "Ana", "beto"]
            .iter()
            .map(|name| {
                let mut u = user(plan);
                u.name = name.to_string();
                let p = preview_salary(&u, week(), gs(0), gs(0), gs(0));
                WeeklySalaryRow::new(&u, &p, None)
            })
            .collect();
        sort_weekly_rows(&mut rows);
        let names: Vec<_> = rows.iter().map(|r| r.user_name.as_str()).collect();
        assert_eq!(names, ["Ana", "beto", "zoe"]);
        assert!(!rows[0].paid);
        assert_eq!(rows[0].net_preview, gs(1_000));
    }
}
