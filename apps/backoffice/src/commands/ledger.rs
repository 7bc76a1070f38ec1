//! # Ledger Commands
//!
//! Day-to-day bookkeeping: service tickets, expenses and cash advances, plus
//! the production reports built on them.
//!
//! ```text
//!   record_service   ──► services + service_items      (one transaction)
//!   record_expense   ──► expenses                      (hand-entered types)
//!   register_advance ──► advances + expenses(advance)  (one transaction)
//!
//!   delete_*         ──► admin only; advance deletes its expense too
//! ```
//!
//! Nothing is written on a day whose cashbox is already closed: the close
//! is final and the next one only reads its own date.
//!
//! Every successful write logs one `info!` audit line naming who did it.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SessionState};
use barberia_core::production::{production_by_user, MethodTotals};
use barberia_core::validation::{
    validate_amount, validate_description, validate_service_items, validate_user_expense_type,
    validate_uuid,
};
use barberia_core::{
    Advance, CoreError, DateRange, Expense, ExpenseType, Money, PaymentMethod, Service,
    ServiceItem, User, ValidationError, MAX_DESCRIPTION_LEN,
};

// =============================================================================
// Requests / Responses
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItemInput {
    pub service_type: String,
    /// Guaraníes
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordServiceRequest {
    /// Barber credited with the production
    pub user_id: String,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub items: Vec<ServiceItemInput>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordServiceResponse {
    pub service: Service,
    pub items: Vec<ServiceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordExpenseRequest {
    pub description: String,
    /// Guaraníes
    pub amount: i64,
    pub date: NaiveDate,
    pub expense_type: ExpenseType,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdvanceRequest {
    pub user_id: String,
    /// Guaraníes
    pub amount: i64,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
}

/// One line of the shop-wide production table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRow {
    pub user_id: String,
    pub user_name: String,
    pub service_count: u32,
    pub total: Money,
}

// =============================================================================
// Services
// =============================================================================

/// Records a ticket and its items.
///
/// The total is the sum of the item prices; the form never sends it.
///
/// ## Errors
/// `ALREADY_CLOSED` when the cashbox for `request.date` is closed.
pub async fn record_service(
    db: &DbState,
    session: &SessionState,
    request: RecordServiceRequest,
) -> Result<RecordServiceResponse, ApiError> {
    let by = session.require()?;
    let barber = active_user(db, &request.user_id).await?;

    let pairs: Vec<(String, i64)> = request
        .items
        .iter()
        .map(|i| (i.service_type.clone(), i.price))
        .collect();
    validate_service_items(&pairs)?;
    let notes = clean_notes(request.notes)?;
    ensure_open(db, request.date).await?;

    let id = Uuid::new_v4().to_string();
    let items: Vec<ServiceItem> = request
        .items
        .iter()
        .map(|i| ServiceItem {
            id: Uuid::new_v4().to_string(),
            service_id: id.clone(),
            service_type: i.service_type.trim().to_string(),
            price_gs: i.price,
        })
        .collect();

    let service = Service {
        id,
        user_id: barber.id.clone(),
        date: request.date,
        payment_method: request.payment_method,
        total_gs: items.iter().map(|i| i.price_gs).sum(),
        notes,
        created_at: Utc::now(),
    };

    db.inner().services().insert(&service, &items).await?;

    info!(
        by = %by.user_id,
        service_id = %service.id,
        user_id = %barber.id,
        amount = service.total_gs,
        method = %service.payment_method,
        date = %service.date,
        "Service recorded"
    );
    Ok(RecordServiceResponse { service, items })
}

/// Deletes a ticket. Admin only.
pub async fn delete_service(db: &DbState, session: &SessionState, id: &str) -> Result<(), ApiError> {
    let admin = session.require_admin("delete service")?;
    db.inner().services().delete(id).await?;
    info!(by = %admin.user_id, service_id = %id, "Service deleted");
    Ok(())
}

/// Tickets dated exactly `date`.
pub async fn list_services(
    db: &DbState,
    session: &SessionState,
    date: NaiveDate,
) -> Result<Vec<Service>, ApiError> {
    session.require()?;
    Ok(db.inner().services().list_by_date(date).await?)
}

// =============================================================================
// Expenses
// =============================================================================

/// Records a hand-entered expense.
///
/// ## Errors
/// - `VALIDATION_ERROR` for `salary` / `advance`; payroll writes those
/// - `ALREADY_CLOSED` when the cashbox for `request.date` is closed
pub async fn record_expense(
    db: &DbState,
    session: &SessionState,
    request: RecordExpenseRequest,
) -> Result<Expense, ApiError> {
    let by = session.require()?;

    let description = validate_description(&request.description)?;
    validate_amount("amount", request.amount)?;
    validate_user_expense_type(request.expense_type)?;
    ensure_open(db, request.date).await?;

    let expense = Expense {
        id: Uuid::new_v4().to_string(),
        description,
        amount_gs: request.amount,
        date: request.date,
        expense_type: request.expense_type,
        payment_method: request.payment_method,
        user_id: None,
        created_at: Utc::now(),
    };
    db.inner().expenses().insert(&expense).await?;

    info!(
        by = %by.user_id,
        expense_id = %expense.id,
        expense_type = %expense.expense_type,
        amount = expense.amount_gs,
        method = %expense.payment_method,
        date = %expense.date,
        "Expense recorded"
    );
    Ok(expense)
}

/// Deletes a hand-entered expense. Admin only.
pub async fn delete_expense(db: &DbState, session: &SessionState, id: &str) -> Result<(), ApiError> {
    let admin = session.require_admin("delete expense")?;
    db.inner().expenses().delete(id).await?;
    info!(by = %admin.user_id, expense_id = %id, "Expense deleted");
    Ok(())
}

/// Expenses dated exactly `date`, payroll ones included.
pub async fn list_expenses(
    db: &DbState,
    session: &SessionState,
    date: NaiveDate,
) -> Result<Vec<Expense>, ApiError> {
    session.require()?;
    Ok(db.inner().expenses().list_by_date(date).await?)
}

// =============================================================================
// Advances
// =============================================================================

/// Hands money to a user ahead of payday.
///
/// Writes the advance and its `advance` expense together. The expense is
/// dated `request.date`; the advance is deducted from the first unpaid
/// salary week at or after it.
///
/// ## Errors
/// `ALREADY_CLOSED` when the cashbox for `request.date` is closed.
pub async fn register_advance(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
    request: RegisterAdvanceRequest,
) -> Result<Advance, ApiError> {
    let by = session.require()?;
    validate_amount("amount", request.amount)?;
    let user = active_user(db, &request.user_id).await?;
    ensure_open(db, request.date).await?;

    let deduct_on = deduction_date(db, config, &user.id, request.date).await?;
    let advance = db
        .inner()
        .advances()
        .record_cash_advance(
            &user.id,
            Money::from_gs(request.amount),
            request.payment_method,
            request.date,
            deduct_on,
        )
        .await?;

    info!(
        by = %by.user_id,
        advance_id = %advance.id,
        user_id = %user.id,
        amount = advance.amount_gs,
        method = %request.payment_method,
        date = %request.date,
        deduct_on = %advance.date,
        "Advance registered"
    );
    Ok(advance)
}

/// Deletes an advance and its expense. Admin only.
pub async fn delete_advance(
    db: &DbState,
    session: &SessionState,
    id: &str,
) -> Result<Advance, ApiError> {
    let admin = session.require_admin("delete advance")?;
    let advance = db.inner().advances().delete(id).await?;
    info!(
        by = %admin.user_id,
        advance_id = %id,
        user_id = %advance.user_id,
        amount = advance.amount_gs,
        "Advance deleted"
    );
    Ok(advance)
}

// =============================================================================
// Production Reports
// =============================================================================

/// Income for `[from, to]` split by payment method, for one barber or the
/// whole shop.
pub async fn production_by_method(
    db: &DbState,
    session: &SessionState,
    from: NaiveDate,
    to: NaiveDate,
    user_id: Option<&str>,
) -> Result<MethodTotals, ApiError> {
    session.require()?;
    check_range(from, to)?;
    Ok(db.inner().services().totals_by_method(from, to, user_id).await?)
}

/// Per-barber production for `[from, to]`, ordered by name.
pub async fn production_report(
    db: &DbState,
    session: &SessionState,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ProductionRow>, ApiError> {
    session.require()?;
    check_range(from, to)?;

    let services = db.inner().services().list_in_range(from, to, None).await?;
    let users = db.inner().users().list(true).await?;

    let mut rows: Vec<ProductionRow> = production_by_user(&services, DateRange::new(from, to))
        .into_iter()
        .map(|p| ProductionRow {
            user_name: users
                .iter()
                .find(|u| u.id == p.user_id)
                .map(|u| u.name.clone())
                .unwrap_or_default(),
            user_id: p.user_id,
            service_count: p.service_count,
            total: p.total,
        })
        .collect();
    rows.sort_by_key(|r| r.user_name.to_lowercase());
    Ok(rows)
}

// =============================================================================
// Helpers
// =============================================================================

/// Loads a user that may receive production or advances.
pub(crate) async fn active_user(db: &DbState, user_id: &str) -> Result<User, ApiError> {
    validate_uuid(user_id)?;
    let user = db
        .inner()
        .users()
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| CoreError::UserNotFound(user_id.to_string()))?;

    if !user.active {
        return Err(ValidationError::NotAllowed {
            field: "user".to_string(),
            allowed: vec!["active users".to_string()],
        }
        .into());
    }
    Ok(user)
}

/// The date an advance handed out on `date` is deducted on.
///
/// `date` itself when it lies inside a salary week not yet paid. A day
/// outside every salary week (Sunday under Monday to Saturday) or inside a
/// paid week moves to the next week's start, repeated until a week is
/// still open.
///
/// ```text
///   Fri 06-07 (week paid) ──► Mon 06-10
///   Sun 06-09             ──► Mon 06-10
///   Wed 06-12 (unpaid)    ──► Wed 06-12
/// ```
async fn deduction_date(
    db: &DbState,
    config: &ConfigState,
    user_id: &str,
    date: NaiveDate,
) -> Result<NaiveDate, ApiError> {
    let mut on = date;
    loop {
        let week = config.salary_week.range_containing(on);
        if !week.contains(on) {
            on = week.next_week_start();
            continue;
        }
        let paid = db
            .inner()
            .salaries()
            .find_for_user_and_week(user_id, week.start)
            .await?;
        if paid.is_none() {
            return Ok(on);
        }
        on = week.next_week_start();
    }
}

/// Refuses writes dated on a closed day.
async fn ensure_open(db: &DbState, date: NaiveDate) -> Result<(), ApiError> {
    if db.inner().cashbox().find_by_date(date).await?.is_some() {
        return Err(CoreError::AlreadyClosed { date }.into());
    }
    Ok(())
}

fn clean_notes(notes: Option<String>) -> Result<Option<String>, ApiError> {
    let Some(notes) = notes else {
        return Ok(None);
    };
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_DESCRIPTION_LEN,
        }
        .into());
    }
    Ok(Some(trimmed.to_string()))
}

fn check_range(from: NaiveDate, to: NaiveDate) -> Result<(), ApiError> {
    if from > to {
        return Err(ApiError::validation(format!("{from} is after {to}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cashbox::close_day;
    use crate::commands::payroll::{pay_salary, preview_salary, PaySalaryRequest};
    use crate::commands::session::login;
    use crate::commands::test_support::{ctx, d, gs, login_admin, seed_user, sell, Ctx};
    use crate::error::ErrorCode;
    use barberia_core::{PaymentPlan, Role};

    fn expense_request(expense_type: ExpenseType, amount: i64) -> RecordExpenseRequest {
        RecordExpenseRequest {
            description: "Navajas".to_string(),
            amount,
            date: d(2024, 6, 5),
            expense_type,
            payment_method: PaymentMethod::Cash,
        }
    }

    async fn give_advance(
        ctx: &Ctx,
        user_id: &str,
        amount: i64,
        date: NaiveDate,
    ) -> Result<Advance, ApiError> {
        register_advance(
            &ctx.db,
            &ctx.session,
            &ctx.config,
            RegisterAdvanceRequest {
                user_id: user_id.to_string(),
                amount,
                date,
                payment_method: PaymentMethod::Cash,
            },
        )
        .await
    }

    #[tokio::test]
    async fn test_record_service_sums_items() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let ana = seed_user(&ctx, "Ana", "1111", Role::User, PaymentPlan::Undefined).await;

        let response = record_service(
            &ctx.db,
            &ctx.session,
            RecordServiceRequest {
                user_id: ana.id.clone(),
                date: d(2024, 6, 5),
                payment_method: PaymentMethod::Pos,
                items: vec![
                    ServiceItemInput { service_type: "corte".into(), price: 50_000 },
                    ServiceItemInput { service_type: " barba ".into(), price: 30_000 },
                ],
                notes: Some("   ".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.service.total_gs, 80_000);
        assert_eq!(response.service.notes, None);
        assert_eq!(response.items[1].service_type, "barba");

        let stored = ctx.db.inner().services().items(&response.service.id).await.unwrap();
        assert_eq!(stored, response.items);
    }

    #[tokio::test]
    async fn test_record_service_rejects_bad_tickets() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let ana = seed_user(&ctx, "Ana", "1111", Role::User, PaymentPlan::Undefined).await;

        let mut request = RecordServiceRequest {
            user_id: ana.id.clone(),
            date: d(2024, 6, 5),
            payment_method: PaymentMethod::Cash,
            items: vec![],
            notes: None,
        };
        let err = record_service(&ctx.db, &ctx.session, request.clone()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        request.items = vec![ServiceItemInput { service_type: "corte".into(), price: 0 }];
        let err = record_service(&ctx.db, &ctx.session, request.clone()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        request.items = vec![ServiceItemInput { service_type: "corte".into(), price: 1 }];
        request.user_id = Uuid::new_v4().to_string();
        let err = record_service(&ctx.db, &ctx.session, request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_expense_types() {
        let ctx = ctx().await;
        login_admin(&ctx).await;

        let e = record_expense(&ctx.db, &ctx.session, expense_request(ExpenseType::Supply, 25_000))
            .await
            .unwrap();
        assert_eq!(list_expenses(&ctx.db, &ctx.session, d(2024, 6, 5)).await.unwrap(), vec![e]);

        for t in [ExpenseType::Salary, ExpenseType::Advance] {
            let err = record_expense(&ctx.db, &ctx.session, expense_request(t, 1_000))
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }

        let err = record_expense(&ctx.db, &ctx.session, expense_request(ExpenseType::Other, -5))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_advance_and_delete() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let ana = seed_user(&ctx, "Ana", "1111", Role::User, PaymentPlan::Undefined).await;

        let advance = give_advance(&ctx, &ana.id, 20_000, d(2024, 6, 5)).await.unwrap();
        assert_eq!(advance.date, d(2024, 6, 5));

        let day = list_expenses(&ctx.db, &ctx.session, d(2024, 6, 5)).await.unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].expense_type, ExpenseType::Advance);

        // the expense goes with its advance, not on its own
        let err = delete_expense(&ctx.db, &ctx.session, &day[0].id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessRule);

        delete_advance(&ctx.db, &ctx.session, &advance.id).await.unwrap();
        assert!(list_expenses(&ctx.db, &ctx.session, d(2024, 6, 5)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deletes_are_admin_only() {
        let ctx = ctx().await;
        let ana = seed_user(&ctx, "Ana", "1111", Role::User, PaymentPlan::Undefined).await;
        login(&ctx.db, &ctx.session, "1111").await.unwrap();
        sell(&ctx, &ana.id, d(2024, 6, 5), PaymentMethod::Cash, 40_000).await;

        let services = list_services(&ctx.db, &ctx.session, d(2024, 6, 5)).await.unwrap();
        let err = delete_service(&ctx.db, &ctx.session, &services[0].id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = delete_advance(&ctx.db, &ctx.session, "x").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        seed_user(&ctx, "Dueño", "0000", Role::Admin, PaymentPlan::Undefined).await;
        login(&ctx.db, &ctx.session, "0000").await.unwrap();
        delete_service(&ctx.db, &ctx.session, &services[0].id).await.unwrap();
        assert!(list_services(&ctx.db, &ctx.session, d(2024, 6, 5)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nothing_without_session() {
        let ctx = ctx().await;
        let err = list_services(&ctx.db, &ctx.session, d(2024, 6, 5)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotLoggedIn);
    }

    #[tokio::test]
    async fn test_production_reports() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let beto = seed_user(&ctx, "beto", "2222", Role::User, PaymentPlan::Undefined).await;
        let ana = seed_user(&ctx, "Ana", "1111", Role::User, PaymentPlan::Undefined).await;

        sell(&ctx, &ana.id, d(2024, 6, 3), PaymentMethod::Cash, 40_000).await;
        sell(&ctx, &ana.id, d(2024, 6, 8), PaymentMethod::Pos, 60_000).await;
        sell(&ctx, &beto.id, d(2024, 6, 4), PaymentMethod::Transfer, 25_000).await;
        // Sunday, outside the salary week
        sell(&ctx, &beto.id, d(2024, 6, 9), PaymentMethod::Cash, 99_000).await;

        let shop = production_by_method(&ctx.db, &ctx.session, d(2024, 6, 3), d(2024, 6, 8), None)
            .await
            .unwrap();
        assert_eq!(shop.cash, gs(40_000));
        assert_eq!(shop.transfer, gs(25_000));
        assert_eq!(shop.pos, gs(60_000));

        let ana_only = production_by_method(
            &ctx.db,
            &ctx.session,
            d(2024, 6, 3),
            d(2024, 6, 8),
            Some(&ana.id),
        )
        .await
        .unwrap();
        assert_eq!(ana_only.total(), gs(100_000));

        let report = production_report(&ctx.db, &ctx.session, d(2024, 6, 3), d(2024, 6, 8))
            .await
            .unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].user_name, "Ana");
        assert_eq!(report[0].service_count, 2);
        assert_eq!(report[0].total, gs(100_000));
        assert_eq!(report[1].user_name, "beto");
        assert_eq!(report[1].total, gs(25_000));

        let err = production_report(&ctx.db, &ctx.session, d(2024, 6, 8), d(2024, 6, 3))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_advance_in_a_paid_week_moves_to_the_next_one() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let ana = seed_user(
            &ctx,
            "Ana",
            "1111",
            Role::User,
            PaymentPlan::FixedWeekly { amount: gs(100_000) },
        )
        .await;
        pay_salary(
            &ctx.db,
            &ctx.session,
            &ctx.config,
            PaySalaryRequest {
                user_id: ana.id.clone(),
                date: d(2024, 6, 5),
                payment_method: PaymentMethod::Cash,
                bonus: 0,
            },
        )
        .await
        .unwrap();

        let friday = give_advance(&ctx, &ana.id, 30_000, d(2024, 6, 7)).await.unwrap();
        assert_eq!(friday.date, d(2024, 6, 10));

        // the cash still left the register on Friday
        let day = list_expenses(&ctx.db, &ctx.session, d(2024, 6, 7)).await.unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].amount_gs, 30_000);

        let next = preview_salary(&ctx.db, &ctx.session, &ctx.config, &ana.id, d(2024, 6, 12), 0)
            .await
            .unwrap();
        assert_eq!(next.advances, gs(30_000));
        assert_eq!(next.net, gs(70_000));
    }

    #[tokio::test]
    async fn test_sunday_advance_is_deducted_next_week() {
        let ctx = ctx().await;
        login_admin(&ctx).await;
        let ana = seed_user(
            &ctx,
            "Ana",
            "1111",
            Role::User,
            PaymentPlan::FixedWeekly { amount: gs(100_000) },
        )
        .await;

        let sunday = give_advance(&ctx, &ana.id, 30_000, d(2024, 6, 9)).await.unwrap();
        assert_eq!(sunday.date, d(2024, 6, 10));

        let this_week = preview_salary(&ctx.db, &ctx.session, &ctx.config, &ana.id, d(2024, 6, 5), 0)
            .await
            .unwrap();
        assert_eq!(this_week.advances, Money::zero());

        let next = preview_salary(&ctx.db, &ctx.session, &ctx.config, &ana.id, d(2024, 6, 12), 0)
            .await
            .unwrap();
        assert_eq!(next.advances, gs(30_000));
    }

    #[tokio::test]
    async fn test_closed_day_takes_no_more_entries() {
        let ctx = ctx().await;
        let admin = login_admin(&ctx).await;
        sell(&ctx, &admin.id, d(2024, 6, 5), PaymentMethod::Cash, 10_000).await;
        close_day(&ctx.db, &ctx.session, &ctx.config, d(2024, 6, 5))
            .await
            .unwrap();

        let err = record_service(
            &ctx.db,
            &ctx.session,
            RecordServiceRequest {
                user_id: admin.id.clone(),
                date: d(2024, 6, 5),
                payment_method: PaymentMethod::Cash,
                items: vec![ServiceItemInput { service_type: "corte".into(), price: 5_000 }],
                notes: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyClosed);

        let err = record_expense(&ctx.db, &ctx.session, expense_request(ExpenseType::Supply, 1_000))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyClosed);

        let err = give_advance(&ctx, &admin.id, 1_000, d(2024, 6, 5)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyClosed);

        assert_eq!(list_services(&ctx.db, &ctx.session, d(2024, 6, 5)).await.unwrap().len(), 1);
        assert!(list_expenses(&ctx.db, &ctx.session, d(2024, 6, 5)).await.unwrap().is_empty());

        // the next day is still open
        sell(&ctx, &admin.id, d(2024, 6, 6), PaymentMethod::Cash, 5_000).await;
    }
}
