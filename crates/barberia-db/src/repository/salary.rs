//! # Salary Repository
//!
//! Paid weekly salaries. A payment is a single transaction:
//!
//! ```text
//!   BEGIN
//!   ├── SELECT salaries WHERE (user_id, week_start)  ── found ──► UniqueViolation
//!   ├── amount_paid > 0 ?  INSERT expenses (type salary)
//!   ├── INSERT salaries (expense_id = ↑ or NULL)
//!   ├── carry-over?        INSERT advances (origin carryover)
//!   COMMIT
//! ```
//!
//! The `UNIQUE (user_id, week_start)` index backs the lookup up and fails
//! with the same `UniqueViolation`.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::advance;
use crate::repository::expense::{self, ExpenseRepository};
use barberia_core::{Advance, AdvanceOrigin, Salary};

const SELECT_SALARY: &str = r#"
    SELECT id, user_id, week_start, week_end,
           total_production_gs, gross_gs, advances_gs, bonus_gs, amount_paid_gs,
           pay_type_snapshot, pay_date, payment_method, expense_id, created_at
    FROM salaries
"#;

/// Repository for paid salaries.
#[derive(Debug, Clone)]
pub struct SalaryRepository {
    pool: SqlitePool,
}

impl SalaryRepository {
    /// Creates a new SalaryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalaryRepository { pool }
    }

    /// The salary paid to `user_id` for the week starting `week_start`.
    pub async fn find_for_user_and_week(
        &self,
        user_id: &str,
        week_start: NaiveDate,
    ) -> DbResult<Option<Salary>> {
        let salary = sqlx::query_as(&format!(
            "{SELECT_SALARY} WHERE user_id = ?1 AND week_start = ?2"
        ))
        .bind(user_id)
        .bind(week_start)
        .fetch_optional(&self.pool)
        .await?;
        Ok(salary)
    }

    /// Gets a salary by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Salary>> {
        let salary = sqlx::query_as(&format!("{SELECT_SALARY} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(salary)
    }

    /// All salaries paid for the week starting `week_start`.
    pub async fn list_for_week(&self, week_start: NaiveDate) -> DbResult<Vec<Salary>> {
        let salaries = sqlx::query_as(&format!(
            "{SELECT_SALARY} WHERE week_start = ?1 ORDER BY created_at"
        ))
        .bind(week_start)
        .fetch_all(&self.pool)
        .await?;
        Ok(salaries)
    }

    /// Salary history of one user, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Salary>> {
        let salaries = sqlx::query_as(&format!(
            "{SELECT_SALARY} WHERE user_id = ?1 ORDER BY week_start DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(salaries)
    }

    /// Persists a payment, its `salary` expense and the optional carry-over.
    ///
    /// `salary.expense_id` is ignored and set here. The expense is dated
    /// `paid_on`, the day the money leaves the register, and is skipped when
    /// nothing is paid out.
    ///
    /// ## Errors
    /// - `UniqueViolation` on `salaries` when the week was already paid
    /// - `Conflict` when money is paid without a payment method, or the
    ///   carry-over is not a carry-over for the same user
    pub async fn record_payment(
        &self,
        mut salary: Salary,
        paid_on: NaiveDate,
        carryover: Option<Advance>,
    ) -> DbResult<Salary> {
        if let Some(carry) = &carryover {
            if carry.origin != AdvanceOrigin::Carryover || carry.user_id != salary.user_id {
                return Err(DbError::Conflict(
                    "carry-over advance does not match the salary".to_string(),
                ));
            }
        }

        let mut tx = self.pool.begin().await?;

        let existing: Option<String> = sqlx::query_scalar(
            "SELECT id FROM salaries WHERE user_id = ?1 AND week_start = ?2",
        )
        .bind(&salary.user_id)
        .bind(salary.week_start)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            return Err(DbError::duplicate(
                "salaries.user_id, salaries.week_start",
                format!("{} / {}", salary.user_id, salary.week_start),
            ));
        }

        salary.expense_id = if salary.amount_paid_gs > 0 {
            let method = salary.payment_method.ok_or_else(|| {
                DbError::Conflict("a paid salary needs a payment method".to_string())
            })?;
            let id = ExpenseRepository::record_salary_expense(
                &mut tx,
                &salary.user_id,
                salary.amount_paid(),
                method,
                paid_on,
                salary.week_start,
            )
            .await?;
            Some(id)
        } else {
            None
        };

        debug!(
            id = %salary.id,
            user_id = %salary.user_id,
            week_start = %salary.week_start,
            amount_paid = salary.amount_paid_gs,
            "Inserting salary"
        );

        sqlx::query(
            r#"
            INSERT INTO salaries (
                id, user_id, week_start, week_end,
                total_production_gs, gross_gs, advances_gs, bonus_gs, amount_paid_gs,
                pay_type_snapshot, pay_date, payment_method, expense_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&salary.id)
        .bind(&salary.user_id)
        .bind(salary.week_start)
        .bind(salary.week_end)
        .bind(salary.total_production_gs)
        .bind(salary.gross_gs)
        .bind(salary.advances_gs)
        .bind(salary.bonus_gs)
        .bind(salary.amount_paid_gs)
        .bind(salary.pay_type_snapshot)
        .bind(salary.pay_date)
        .bind(salary.payment_method)
        .bind(&salary.expense_id)
        .bind(salary.created_at)
        .execute(&mut *tx)
        .await?;

        if let Some(carry) = &carryover {
            advance::insert_row(&mut tx, carry).await?;
        }

        tx.commit().await?;
        Ok(salary)
    }

    /// Deletes a salary together with its expense.
    ///
    /// A carry-over advance produced by the payment is kept; it is a debt
    /// of its own and can be deleted separately.
    pub async fn delete(&self, id: &str) -> DbResult<Salary> {
        debug!(id = %id, "Deleting salary");

        let mut tx = self.pool.begin().await?;

        let salary = sqlx::query_as::<_, Salary>(&format!("{SELECT_SALARY} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Salary", id))?;

        sqlx::query("DELETE FROM salaries WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if let Some(expense_id) = &salary.expense_id {
            expense::delete_row(&mut tx, expense_id).await?;
        }

        tx.commit().await?;
        Ok(salary)
    }
}
