//! # Payroll Commands
//!
//! The weekly salary table and the "Pagar" button behind it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    pay_salary                                           │
//! │                                                                         │
//! │  week = config.salary_week.range_containing(date)                      │
//! │         │                                                               │
//! │         ├── services.weekly_total(user, week)     production           │
//! │         ├── advances.total_for_user_in_range      advances             │
//! │         ▼                                                               │
//! │  settle_salary(user, week, production, advances, bonus)                │
//! │         │                                                               │
//! │         ├── salary draft (amount_paid ≥ 0)                             │
//! │         └── carry-over advance when net < 0 (dated next Monday)        │
//! │         ▼                                                               │
//! │  salaries.record_payment   salary + expense + carry-over, one tx       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Previews never write and never fail on an undefined plan; they show a
//! zero gross so the table can still be drawn.

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::commands::ledger::active_user;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SessionState};
use barberia_core::payroll::{
    preview_salary as compute_preview, settle_salary, sort_weekly_rows, SalaryPreview,
    WeeklySalaryRow,
};
use barberia_core::validation::validate_uuid;
use barberia_core::{Advance, CoreError, DateRange, Money, PaymentMethod, Salary, User};

// =============================================================================
// Requests / Responses
// =============================================================================

/// The payroll table for one salary week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPayroll {
    pub week: DateRange,
    pub rows: Vec<WeeklySalaryRow>,
    /// Sum of `amount_paid` over the rows already paid.
    pub total_paid: Money,
    pub pending: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaySalaryRequest {
    pub user_id: String,
    /// Any day inside the week being paid
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    /// Guaraníes, zero when there is none
    #[serde(default)]
    pub bonus: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaySalaryResponse {
    pub salary: Salary,
    pub carryover: Option<Advance>,
}

// =============================================================================
// Commands
// =============================================================================

/// One row per active user for the salary week containing `date`.
pub async fn weekly_salary_rows(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
    date: NaiveDate,
) -> Result<WeeklyPayroll, ApiError> {
    session.require()?;
    let week = config.salary_week.range_containing(date);

    let users = db.inner().users().list(false).await?;
    let mut rows = Vec::with_capacity(users.len());
    for user in &users {
        let preview = preview_for(db, user, week, Money::zero()).await?;
        let existing = db
            .inner()
            .salaries()
            .find_for_user_and_week(&user.id, week.start)
            .await?;
        rows.push(WeeklySalaryRow::new(user, &preview, existing.as_ref()));
    }
    sort_weekly_rows(&mut rows);

    let total_paid = rows.iter().filter_map(|r| r.amount_paid).sum();
    let pending = rows.iter().filter(|r| !r.paid).count() as u32;

    Ok(WeeklyPayroll {
        week,
        rows,
        total_paid,
        pending,
    })
}

/// What paying `user_id` now would look like. Writes nothing.
pub async fn preview_salary(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
    user_id: &str,
    date: NaiveDate,
    bonus: i64,
) -> Result<SalaryPreview, ApiError> {
    session.require()?;
    let user = active_user(db, user_id).await?;
    let week = config.salary_week.range_containing(date);
    preview_for(db, &user, week, Money::from_gs(bonus)).await
}

/// Pays one user's salary for the week containing `request.date`.
///
/// ## Errors
/// - `DUPLICATE_PAYMENT` when the week was already paid
/// - `UNDEFINED_PAYMENT_TYPE` when the user has no plan yet
/// - `VALIDATION_ERROR` for a negative bonus or an inactive user
pub async fn pay_salary(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
    request: PaySalaryRequest,
) -> Result<PaySalaryResponse, ApiError> {
    let by = session.require()?;
    let user = active_user(db, &request.user_id).await?;
    let week = config.salary_week.range_containing(request.date);

    let production = db
        .inner()
        .services()
        .weekly_total(&user.id, week.start, week.end)
        .await?;
    let advances = db
        .inner()
        .advances()
        .total_for_user_in_range(&user.id, week.start, week.end)
        .await?;

    let settlement = settle_salary(
        &user,
        week,
        production,
        advances,
        Money::from_gs(request.bonus),
    )?;

    let now = Utc::now();
    let salary = settlement
        .salary
        .top_up(Money::zero())?
        .into_salary(Uuid::new_v4().to_string(), request.payment_method, now);
    let carryover = settlement
        .carryover
        .map(|c| c.into_advance(Uuid::new_v4().to_string(), now));

    let paid_on = Local::now().date_naive();
    let salary = db
        .inner()
        .salaries()
        .record_payment(salary, paid_on, carryover.clone())
        .await
        .map_err(|e| -> ApiError {
            if e.is_unique_on("salaries") {
                CoreError::DuplicatePayment {
                    user_id: user.id.clone(),
                    week_start: week.start,
                }
                .into()
            } else {
                e.into()
            }
        })?;

    info!(
        by = %by.user_id,
        user_id = %user.id,
        week = %week,
        amount = salary.amount_paid_gs,
        method = %request.payment_method,
        carryover = carryover.as_ref().map(|c| c.amount_gs).unwrap_or(0),
        "Salary paid"
    );

    if salary.amount_paid_gs > 0 && db.inner().cashbox().find_by_date(paid_on).await?.is_some() {
        warn!(
            date = %paid_on,
            "Salary expense dated on a day whose cashbox is already closed"
        );
    }

    Ok(PaySalaryResponse { salary, carryover })
}

/// Deletes a salary and its expense. Admin only.
///
/// A carry-over advance it produced stays; delete it separately if the
/// payment is redone.
pub async fn delete_salary(
    db: &DbState,
    session: &SessionState,
    id: &str,
) -> Result<Salary, ApiError> {
    let admin = session.require_admin("delete salary")?;
    let salary = db.inner().salaries().delete(id).await?;
    info!(
        by = %admin.user_id,
        salary_id = %id,
        user_id = %salary.user_id,
        week_start = %salary.week_start,
        amount = salary.amount_paid_gs,
        "Salary deleted"
    );
    Ok(salary)
}

/// Salaries paid to one user, newest week first.
pub async fn salary_history(
    db: &DbState,
    session: &SessionState,
    user_id: &str,
) -> Result<Vec<Salary>, ApiError> {
    session.require()?;
    validate_uuid(user_id)?;
    Ok(db.inner().salaries().list_for_user(user_id).await?)
}

async fn preview_for(
    db: &DbState,
    user: &User,
    week: DateRange,
    bonus: Money,
) -> Result<SalaryPreview, ApiError> {
    let production = db
        .inner()
        .services()
        .weekly_total(&user.id, week.start, week.end)
        .await?;
    let advances = db
        .inner()
        .advances()
        .total_for_user_in_range(&user.id, week.start, week.end)
        .await?;
    Ok(compute_preview(user, week, production, advances, bonus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ledger::{register_advance, RegisterAdvanceRequest};
    use crate::commands::session::login;
    use crate::commands::test_support::{ctx, d, gs, login_admin, seed_user, sell};
    use crate::error::ErrorCode;
    use barberia_core::{AdvanceOrigin, ExpenseType, PaymentPlan, Rate, Role};

    fn pay(user_id: &str, bonus: i64) -> PaySalaryRequest {
        PaySalaryRequest {
            user_id: user_id.to_string(),
            date: d(2024, 6, 5),
            payment_method: PaymentMethod::Cash,
            bonus,
        }
    }

    async fn salary_expenses(db: &DbState) -> usize {
        db.inner()
            .expenses()
            .list_in_range(d(2000, 1, 1), d(2100, 1, 1))
            .await
            .unwrap()
            .iter()
            .filter(|e| e.expense_type == ExpenseType::Salary)
            .count()
    }

    #[tokio::test]
    async fn test_plans_through_the_table() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let plans = [
            ("Ana", "1111", PaymentPlan::Commission { rate: Rate::from_bps(5_000) }),
            ("Beto", "2222", PaymentPlan::FixedWeekly { amount: gs(700_000) }),
            ("Caro", "3333", PaymentPlan::Undefined),
        ];
        for (name, pin, plan) in plans {
            let u = seed_user(&ctx, name, pin, Role::User, plan).await;
            sell(&ctx, &u.id, d(2024, 6, 4), PaymentMethod::Cash, 1_000_000).await;
            sell(&ctx, &u.id, d(2024, 6, 4), PaymentMethod::Pos, 400_000).await;
        }

        let table = weekly_salary_rows(&ctx.db, &ctx.session, &ctx.config, d(2024, 6, 5))
            .await
            .unwrap();
        assert_eq!(table.week.start, d(2024, 6, 3));
        assert_eq!(table.week.end, d(2024, 6, 8));

        // an undefined plan still gets a row, with a zero gross
        let caro = table.rows.iter().find(|r| r.user_name == "Caro").unwrap();
        assert_eq!(caro.production, gs(1_400_000));
        assert_eq!(caro.gross, Money::zero());

        let ana = table.rows.iter().find(|r| r.user_name == "Ana").unwrap();
        assert_eq!(ana.gross, gs(700_000));
        assert!(!ana.paid);

        let names: Vec<_> = table.rows.iter().map(|r| r.user_name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Beto", "Caro", "Dueño"]);
        assert_eq!(table.pending, 4);
    }

    #[tokio::test]
    async fn test_plan_gross_values() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let cases = [
            (PaymentPlan::Commission { rate: Rate::from_bps(5_000) }, 500_000),
            (
                PaymentPlan::BasePlusCommission { base: gs(300_000), rate: Rate::from_bps(3_000) },
                600_000,
            ),
            (PaymentPlan::FixedWeekly { amount: gs(700_000) }, 700_000),
            (
                PaymentPlan::MinimumOrPercentage { minimum: gs(500_000), rate: Rate::from_bps(4_500) },
                450_000,
            ),
        ];

        for (i, (plan, expected)) in cases.into_iter().enumerate() {
            let pin = format!("{}", 1000 + i);
            let u = seed_user(&ctx, &format!("U{i}"), &pin, Role::User, plan).await;
            sell(&ctx, &u.id, d(2024, 6, 4), PaymentMethod::Cash, 1_000_000).await;

            let preview = preview_salary(&ctx.db, &ctx.session, &ctx.config, &u.id, d(2024, 6, 5), 0)
                .await
                .unwrap();
            assert_eq!(preview.gross, gs(expected), "{plan:?}");
        }
    }

    #[tokio::test]
    async fn test_sunday_is_not_in_the_salary_week() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let ana = seed_user(
            &ctx,
            "Ana",
            "1111",
            Role::User,
            PaymentPlan::Commission { rate: Rate::from_bps(10_000) },
        )
        .await;
        sell(&ctx, &ana.id, d(2024, 6, 8), PaymentMethod::Cash, 10_000).await;
        sell(&ctx, &ana.id, d(2024, 6, 9), PaymentMethod::Cash, 90_000).await;

        let preview = preview_salary(&ctx.db, &ctx.session, &ctx.config, &ana.id, d(2024, 6, 3), 0)
            .await
            .unwrap();
        assert_eq!(preview.production, gs(10_000));
    }

    #[tokio::test]
    async fn test_deficit_becomes_next_week_advance() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let ana = seed_user(
            &ctx,
            "Ana",
            "1111",
            Role::User,
            PaymentPlan::Commission { rate: Rate::from_bps(10_000) },
        )
        .await;
        sell(&ctx, &ana.id, d(2024, 6, 4), PaymentMethod::Cash, 10_000).await;
        register_advance(
            &ctx.db,
            &ctx.session,
            &ctx.config,
            RegisterAdvanceRequest {
                user_id: ana.id.clone(),
                amount: 50_000,
                date: d(2024, 6, 4),
                payment_method: PaymentMethod::Cash,
            },
        )
        .await
        .unwrap();

        let paid = pay_salary(&ctx.db, &ctx.session, &ctx.config, pay(&ana.id, 0))
            .await
            .unwrap();
        assert_eq!(paid.salary.amount_paid_gs, 0);
        assert_eq!(paid.salary.expense_id, None);

        let carry = paid.carryover.unwrap();
        assert_eq!(carry.amount_gs, 40_000);
        assert_eq!(carry.date, d(2024, 6, 10));
        assert_eq!(carry.origin, AdvanceOrigin::Carryover);

        // next week starts 40,000 in the red
        let next = preview_salary(&ctx.db, &ctx.session, &ctx.config, &ana.id, d(2024, 6, 12), 0)
            .await
            .unwrap();
        assert_eq!(next.advances, gs(40_000));
        assert_eq!(salary_expenses(&ctx.db).await, 0);
    }

    #[tokio::test]
    async fn test_second_payment_is_rejected() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let ana = seed_user(
            &ctx,
            "Ana",
            "1111",
            Role::User,
            PaymentPlan::FixedWeekly { amount: gs(700_000) },
        )
        .await;

        let first = pay_salary(&ctx.db, &ctx.session, &ctx.config, pay(&ana.id, 50_000))
            .await
            .unwrap();
        assert_eq!(first.salary.amount_paid_gs, 750_000);
        assert_eq!(first.salary.bonus_gs, 50_000);
        assert!(first.salary.expense_id.is_some());

        let err = pay_salary(&ctx.db, &ctx.session, &ctx.config, pay(&ana.id, 0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicatePayment);

        assert_eq!(ctx.db.inner().salaries().list_for_user(&ana.id).await.unwrap().len(), 1);
        assert_eq!(salary_expenses(&ctx.db).await, 1);

        let table = weekly_salary_rows(&ctx.db, &ctx.session, &ctx.config, d(2024, 6, 7))
            .await
            .unwrap();
        let row = table.rows.iter().find(|r| r.user_id == ana.id).unwrap();
        assert!(row.paid);
        assert_eq!(row.amount_paid, Some(gs(750_000)));
        assert_eq!(table.total_paid, gs(750_000));
    }

    #[tokio::test]
    async fn test_undefined_plan_cannot_be_paid() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let ana = seed_user(&ctx, "Ana", "1111", Role::User, PaymentPlan::Undefined).await;

        let err = pay_salary(&ctx.db, &ctx.session, &ctx.config, pay(&ana.id, 0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UndefinedPaymentType);

        let err = pay_salary(&ctx.db, &ctx.session, &ctx.config, pay(&ana.id, -1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_delete_salary_is_admin_only_and_allows_repayment() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let ana = seed_user(
            &ctx,
            "Ana",
            "1111",
            Role::User,
            PaymentPlan::FixedWeekly { amount: gs(700_000) },
        )
        .await;
        let paid = pay_salary(&ctx.db, &ctx.session, &ctx.config, pay(&ana.id, 0))
            .await
            .unwrap();

        login(&ctx.db, &ctx.session, "1111").await.unwrap();
        let err = delete_salary(&ctx.db, &ctx.session, &paid.salary.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        login(&ctx.db, &ctx.session, "0000").await.unwrap();
        delete_salary(&ctx.db, &ctx.session, &paid.salary.id).await.unwrap();
        assert_eq!(salary_expenses(&ctx.db).await, 0);

        pay_salary(&ctx.db, &ctx.session, &ctx.config, pay(&ana.id, 0))
            .await
            .unwrap();
        let history = salary_history(&ctx.db, &ctx.session, &ana.id).await.unwrap();
        assert_eq!(history.len(), 1);
    }
}
