//! # Advance Repository
//!
//! Money owed by an employee and deducted from the week it is dated in.
//!
//! ```text
//!   record_cash_advance                  carry-over (from record_payment)
//!   BEGIN                                 ┌────────────────────────────┐
//!   ├── INSERT expenses (type advance)    │ origin    = carryover      │
//!   ├── INSERT advances (origin cash,     │ method    = NULL           │
//!   │            expense_id = ↑)          │ expense   = NULL           │
//!   COMMIT                                │ date      = next Monday    │
//!                                         └────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::expense::{self, ExpenseRepository};
use barberia_core::{Advance, AdvanceOrigin, Money, PaymentMethod};

const SELECT_ADVANCE: &str = r#"
    SELECT id, user_id, amount_gs, date, payment_method, origin, expense_id, created_at
    FROM advances
"#;

/// Repository for advances.
#[derive(Debug, Clone)]
pub struct AdvanceRepository {
    pool: SqlitePool,
}

impl AdvanceRepository {
    /// Creates a new AdvanceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AdvanceRepository { pool }
    }

    /// Hands `amount` to a user: advance + `advance` expense, atomically.
    ///
    /// The expense is dated `paid_on`, the day the money left the register.
    /// The advance is dated `deduct_on`, which picks the salary week it is
    /// deducted from; the two differ when `paid_on` falls outside an unpaid
    /// salary week.
    pub async fn record_cash_advance(
        &self,
        user_id: &str,
        amount: Money,
        method: PaymentMethod,
        paid_on: NaiveDate,
        deduct_on: NaiveDate,
    ) -> DbResult<Advance> {
        let mut tx = self.pool.begin().await?;

        let expense_id =
            ExpenseRepository::record_advance_expense(&mut tx, user_id, amount, method, paid_on)
                .await?;

        let advance = Advance {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            amount_gs: amount.gs(),
            date: deduct_on,
            payment_method: Some(method),
            origin: AdvanceOrigin::Cash,
            expense_id: Some(expense_id),
            created_at: Utc::now(),
        };
        insert_row(&mut tx, &advance).await?;

        tx.commit().await?;
        Ok(advance)
    }

    /// Gets an advance by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Advance>> {
        let advance = sqlx::query_as(&format!("{SELECT_ADVANCE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(advance)
    }

    /// Advances of one user dated in `[from, to]`.
    pub async fn list_for_user_in_range(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<Advance>> {
        let advances = sqlx::query_as(&format!(
            "{SELECT_ADVANCE} WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3 ORDER BY date, created_at"
        ))
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(advances)
    }

    /// Sum of one user's advances dated in `[from, to]`. Zero when empty.
    pub async fn total_for_user_in_range(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Money> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount_gs), 0)
            FROM advances
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_gs(total))
    }

    /// Deletes an advance together with its expense.
    pub async fn delete(&self, id: &str) -> DbResult<Advance> {
        debug!(id = %id, "Deleting advance");

        let mut tx = self.pool.begin().await?;

        let advance = sqlx::query_as::<_, Advance>(&format!("{SELECT_ADVANCE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Advance", id))?;

        sqlx::query("DELETE FROM advances WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if let Some(expense_id) = &advance.expense_id {
            expense::delete_row(&mut tx, expense_id).await?;
        }

        tx.commit().await?;
        Ok(advance)
    }
}

/// Inserts one advance row on the given connection.
pub(crate) async fn insert_row(conn: &mut SqliteConnection, advance: &Advance) -> DbResult<()> {
    debug!(
        id = %advance.id,
        user_id = %advance.user_id,
        amount = advance.amount_gs,
        date = %advance.date,
        origin = ?advance.origin,
        "Inserting advance"
    );

    sqlx::query(
        r#"
        INSERT INTO advances (
            id, user_id, amount_gs, date,
            payment_method, origin, expense_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&advance.id)
    .bind(&advance.user_id)
    .bind(advance.amount_gs)
    .bind(advance.date)
    .bind(advance.payment_method)
    .bind(advance.origin)
    .bind(&advance.expense_id)
    .bind(advance.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{d, db, insert_user};
    use barberia_core::{ExpenseType, PaymentPlan};

    #[tokio::test]
    async fn test_cash_advance_writes_linked_expense() {
        let db = db().await;
        let ana = insert_user(&db, "Ana", "1111", PaymentPlan::Undefined).await;

        let advance = db
            .advances()
            .record_cash_advance(
                &ana.id,
                Money::from_gs(20_000),
                PaymentMethod::Cash,
                d(2024, 6, 5),
                d(2024, 6, 5),
            )
            .await
            .unwrap();

        assert_eq!(db.advances().get_by_id(&advance.id).await.unwrap().unwrap(), advance);
        assert_eq!(advance.origin, AdvanceOrigin::Cash);

        let expense_id = advance.expense_id.as_deref().unwrap();
        let expense = db.expenses().get_by_id(expense_id).await.unwrap().unwrap();
        assert_eq!(expense.expense_type, ExpenseType::Advance);
        assert_eq!(expense.amount_gs, 20_000);
        assert_eq!(expense.user_id.as_deref(), Some(ana.id.as_str()));
        assert_eq!(expense.date, d(2024, 6, 5));
    }

    #[tokio::test]
    async fn test_deduction_date_can_differ_from_payout() {
        let db = db().await;
        let ana = insert_user(&db, "Ana", "1111", PaymentPlan::Undefined).await;

        // handed out on a Sunday, deducted from the week after
        let advance = db
            .advances()
            .record_cash_advance(
                &ana.id,
                Money::from_gs(30_000),
                PaymentMethod::Cash,
                d(2024, 6, 9),
                d(2024, 6, 10),
            )
            .await
            .unwrap();
        assert_eq!(advance.date, d(2024, 6, 10));

        let expense_id = advance.expense_id.as_deref().unwrap();
        let expense = db.expenses().get_by_id(expense_id).await.unwrap().unwrap();
        assert_eq!(expense.date, d(2024, 6, 9));
    }

    #[tokio::test]
    async fn test_unknown_user_leaves_no_expense() {
        let db = db().await;

        let err = db
            .advances()
            .record_cash_advance(
                "ghost",
                Money::from_gs(1_000),
                PaymentMethod::Cash,
                d(2024, 6, 5),
                d(2024, 6, 5),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let expenses = db.expenses().list_by_date(d(2024, 6, 5)).await.unwrap();
        assert!(expenses.is_empty());
    }

    #[tokio::test]
    async fn test_total_for_user_in_range() {
        let db = db().await;
        let ana = insert_user(&db, "Ana", "1111", PaymentPlan::Undefined).await;
        let beto = insert_user(&db, "Beto", "2222", PaymentPlan::Undefined).await;
        let repo = db.advances();

        repo.record_cash_advance(
            &ana.id,
            Money::from_gs(10_000),
            PaymentMethod::Cash,
            d(2024, 6, 3),
            d(2024, 6, 3),
        )
            .await
            .unwrap();
        repo.record_cash_advance(
            &ana.id,
            Money::from_gs(5_000),
            PaymentMethod::Transfer,
            d(2024, 6, 8),
            d(2024, 6, 8),
        )
            .await
            .unwrap();
        repo.record_cash_advance(
            &ana.id,
            Money::from_gs(7_000),
            PaymentMethod::Cash,
            d(2024, 6, 10),
            d(2024, 6, 10),
        )
            .await
            .unwrap();
        repo.record_cash_advance(
            &beto.id,
            Money::from_gs(99_000),
            PaymentMethod::Cash,
            d(2024, 6, 4),
            d(2024, 6, 4),
        )
            .await
            .unwrap();

        let total = repo
            .total_for_user_in_range(&ana.id, d(2024, 6, 3), d(2024, 6, 8))
            .await
            .unwrap();
        assert_eq!(total, Money::from_gs(15_000));

        let listed = repo
            .list_for_user_in_range(&ana.id, d(2024, 6, 3), d(2024, 6, 8))
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);

        let none = repo
            .total_for_user_in_range(&ana.id, d(2024, 7, 1), d(2024, 7, 6))
            .await
            .unwrap();
        assert_eq!(none, Money::zero());
    }

    #[tokio::test]
    async fn test_delete_removes_expense_too() {
        let db = db().await;
        let ana = insert_user(&db, "Ana", "1111", PaymentPlan::Undefined).await;
        let advance = db
            .advances()
            .record_cash_advance(
                &ana.id,
                Money::from_gs(20_000),
                PaymentMethod::Cash,
                d(2024, 6, 5),
                d(2024, 6, 5),
            )
            .await
            .unwrap();

        let deleted = db.advances().delete(&advance.id).await.unwrap();
        assert_eq!(deleted.id, advance.id);
        assert!(db.advances().get_by_id(&advance.id).await.unwrap().is_none());
        let expense_id = advance.expense_id.as_deref().unwrap();
        assert!(db.expenses().get_by_id(expense_id).await.unwrap().is_none());

        assert!(matches!(
            db.advances().delete(&advance.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
