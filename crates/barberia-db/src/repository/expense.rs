//! # Expense Repository
//!
//! Every guaraní leaving the shop is an expense row, including salaries and
//! advances, so the cashbox needs only one table to find the day's outflow.
//!
//! ```text
//!   hand-entered      supply · service · purchase · tax · other
//!   payroll-only      salary  ◄── salaries.expense_id
//!                     advance ◄── advances.expense_id
//! ```
//!
//! Payroll-linked rows are written through the transaction-scoped helpers
//! [`ExpenseRepository::record_salary_expense`] and
//! [`ExpenseRepository::record_advance_expense`], and can only be removed
//! together with the salary or advance that owns them.

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use barberia_core::production::MethodTotals;
use barberia_core::{Expense, ExpenseType, Money, PaymentMethod};

const SELECT_EXPENSE: &str = r#"
    SELECT id, description, amount_gs, date, expense_type, payment_method, user_id, created_at
    FROM expenses
"#;

/// Repository for expenses.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Inserts a hand-entered expense.
    ///
    /// ## Errors
    /// `Conflict` for the payroll-only types; those come from
    /// `record_salary_expense` / `record_advance_expense`.
    pub async fn insert(&self, expense: &Expense) -> DbResult<()> {
        if expense.expense_type.is_system_generated() {
            return Err(DbError::Conflict(format!(
                "{} expenses are created by payroll",
                expense.expense_type
            )));
        }

        let mut conn = self.pool.acquire().await?;
        insert_row(&mut conn, expense).await
    }

    /// Writes the `salary` expense for a payment inside the caller's
    /// transaction and returns its id.
    pub async fn record_salary_expense(
        conn: &mut SqliteConnection,
        user_id: &str,
        amount: Money,
        method: PaymentMethod,
        date: NaiveDate,
        week_start: NaiveDate,
    ) -> DbResult<String> {
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            description: format!("Salary, week of {week_start}"),
            amount_gs: amount.gs(),
            date,
            expense_type: ExpenseType::Salary,
            payment_method: method,
            user_id: Some(user_id.to_string()),
            created_at: Utc::now(),
        };
        insert_row(conn, &expense).await?;
        Ok(expense.id)
    }

    /// Writes the `advance` expense for a cash advance inside the caller's
    /// transaction and returns its id.
    pub async fn record_advance_expense(
        conn: &mut SqliteConnection,
        user_id: &str,
        amount: Money,
        method: PaymentMethod,
        date: NaiveDate,
    ) -> DbResult<String> {
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            description: "Advance".to_string(),
            amount_gs: amount.gs(),
            date,
            expense_type: ExpenseType::Advance,
            payment_method: method,
            user_id: Some(user_id.to_string()),
            created_at: Utc::now(),
        };
        insert_row(conn, &expense).await?;
        Ok(expense.id)
    }

    /// Gets an expense by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Expense>> {
        let expense = sqlx::query_as(&format!("{SELECT_EXPENSE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(expense)
    }

    /// Expenses dated exactly `date`.
    pub async fn list_by_date(&self, date: NaiveDate) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as(&format!(
            "{SELECT_EXPENSE} WHERE date = ?1 ORDER BY created_at, id"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }

    /// Expenses with `date ∈ [from, to]`.
    pub async fn list_in_range(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as(&format!(
            "{SELECT_EXPENSE} WHERE date BETWEEN ?1 AND ?2 ORDER BY date, created_at, id"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }

    /// Outflow for `date ∈ [from, to]` split by payment method.
    pub async fn totals_by_method(&self, from: NaiveDate, to: NaiveDate) -> DbResult<MethodTotals> {
        let rows: Vec<(PaymentMethod, i64)> = sqlx::query_as(
            r#"
            SELECT payment_method, SUM(amount_gs)
            FROM expenses
            WHERE date BETWEEN ?1 AND ?2
            GROUP BY payment_method
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(method, gs)| (method, Money::from_gs(gs)))
            .collect())
    }

    /// Deletes a hand-entered expense.
    ///
    /// ## Errors
    /// `Conflict` when a salary or advance still points at it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting expense");

        let mut tx = self.pool.begin().await?;

        let linked: i64 = sqlx::query_scalar(
            r#"
            SELECT (SELECT COUNT(*) FROM salaries WHERE expense_id = ?1)
                 + (SELECT COUNT(*) FROM advances WHERE expense_id = ?1)
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if linked > 0 {
            return Err(DbError::Conflict(format!(
                "expense {id} belongs to a salary or advance; delete that instead"
            )));
        }

        delete_row(&mut tx, id).await?;
        tx.commit().await?;
        Ok(())
    }
}

/// Inserts one expense row on the given connection.
async fn insert_row(conn: &mut SqliteConnection, expense: &Expense) -> DbResult<()> {
    debug!(
        id = %expense.id,
        expense_type = %expense.expense_type,
        amount = expense.amount_gs,
        method = %expense.payment_method,
        date = %expense.date,
        "Inserting expense"
    );

    sqlx::query(
        r#"
        INSERT INTO expenses (
            id, description, amount_gs, date,
            expense_type, payment_method, user_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&expense.id)
    .bind(&expense.description)
    .bind(expense.amount_gs)
    .bind(expense.date)
    .bind(expense.expense_type)
    .bind(expense.payment_method)
    .bind(&expense.user_id)
    .bind(expense.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Deletes one expense row on the given connection.
pub(crate) async fn delete_row(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Expense", id));
    }
    Ok(())
}
