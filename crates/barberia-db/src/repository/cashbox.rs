//! # Cashbox Repository
//!
//! Saved daily closes. A close is written once per date and never updated:
//! the next close reads the latest earlier row as its starting point, so
//! rewriting history would silently shift every balance after it.
//!
//! ```text
//!   save(day)
//!   BEGIN
//!   ├── SELECT cashbox_days WHERE date = day.date  ── found ──► UniqueViolation
//!   ├── SELECT COUNT(*) WHERE date > day.date      ── > 0 ────► Conflict
//!   ├── INSERT cashbox_days
//!   COMMIT                        (UNIQUE(date) backs the lookup up)
//! ```
//!
//! Corrections go through [`CashboxRepository::delete`], which only removes
//! the most recent close.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use barberia_core::CashboxDay;

const SELECT_DAY: &str = r#"
    SELECT id, date, income_total_gs, expense_total_gs,
           balance_gs, cash_gs, transfer_gs, pos_gs, created_at
    FROM cashbox_days
"#;

/// Repository for daily cashbox closes.
#[derive(Debug, Clone)]
pub struct CashboxRepository {
    pool: SqlitePool,
}

impl CashboxRepository {
    /// Creates a new CashboxRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CashboxRepository { pool }
    }

    /// The close saved for `date`, if any.
    pub async fn find_by_date(&self, date: NaiveDate) -> DbResult<Option<CashboxDay>> {
        let day = sqlx::query_as(&format!("{SELECT_DAY} WHERE date = ?1"))
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(day)
    }

    /// The latest close strictly before `date`.
    ///
    /// Gaps are fine: a shop closed on Sunday carries Saturday into Monday.
    pub async fn find_latest_before(&self, date: NaiveDate) -> DbResult<Option<CashboxDay>> {
        let day = sqlx::query_as(&format!(
            "{SELECT_DAY} WHERE date < ?1 ORDER BY date DESC LIMIT 1"
        ))
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(day)
    }

    /// Closes with `date ∈ [from, to]`, oldest first.
    pub async fn list_in_range(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<CashboxDay>> {
        let days = sqlx::query_as(&format!(
            "{SELECT_DAY} WHERE date BETWEEN ?1 AND ?2 ORDER BY date"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(days)
    }

    /// Saves a computed close.
    ///
    /// ## Errors
    /// - `UniqueViolation` on `cashbox_days` when the date is already closed;
    ///   the stored row is left untouched.
    /// - `Conflict` when a later date is already closed. Its balances were
    ///   carried from before `day.date` and would skip this close.
    pub async fn save(&self, day: &CashboxDay) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<String> =
            sqlx::query_scalar("SELECT id FROM cashbox_days WHERE date = ?1")
                .bind(day.date)
                .fetch_optional(&mut *tx)
                .await?;

        if existing.is_some() {
            return Err(DbError::duplicate("cashbox_days.date", day.date.to_string()));
        }

        let later: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cashbox_days WHERE date > ?1")
            .bind(day.date)
            .fetch_one(&mut *tx)
            .await?;

        if later > 0 {
            return Err(DbError::Conflict(format!(
                "{} is before {later} existing close(s); close days in order",
                day.date
            )));
        }

        debug!(
            id = %day.id,
            date = %day.date,
            balance = day.balance_gs,
            cash = day.cash_gs,
            transfer = day.transfer_gs,
            pos = day.pos_gs,
            "Inserting cashbox close"
        );

        sqlx::query(
            r#"
            INSERT INTO cashbox_days (
                id, date, income_total_gs, expense_total_gs,
                balance_gs, cash_gs, transfer_gs, pos_gs, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&day.id)
        .bind(day.date)
        .bind(day.income_total_gs)
        .bind(day.expense_total_gs)
        .bind(day.balance_gs)
        .bind(day.cash_gs)
        .bind(day.transfer_gs)
        .bind(day.pos_gs)
        .bind(day.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Deletes the close for `date` so it can be redone.
    ///
    /// ## Errors
    /// - `NotFound` when the date was never closed
    /// - `Conflict` when a later close already carries this one forward
    pub async fn delete(&self, date: NaiveDate) -> DbResult<CashboxDay> {
        let mut tx = self.pool.begin().await?;

        let day = sqlx::query_as::<_, CashboxDay>(&format!("{SELECT_DAY} WHERE date = ?1"))
            .bind(date)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("CashboxDay", date.to_string()))?;

        let later: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cashbox_days WHERE date > ?1")
            .bind(date)
            .fetch_one(&mut *tx)
            .await?;

        if later > 0 {
            return Err(DbError::Conflict(format!(
                "the close for {date} is carried by {later} later close(s); delete those first"
            )));
        }

        sqlx::query("DELETE FROM cashbox_days WHERE id = ?1")
            .bind(&day.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(date = %date, "Cashbox close deleted");
        Ok(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{d, db};
    use chrono::Utc;

    fn day(date: NaiveDate, balance: i64) -> CashboxDay {
        CashboxDay {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            income_total_gs: balance,
            expense_total_gs: 0,
            balance_gs: balance,
            cash_gs: balance,
            transfer_gs: 0,
            pos_gs: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let db = db().await;
        let close = day(d(2024, 6, 5), 100_000);
        db.cashbox().save(&close).await.unwrap();

        assert_eq!(db.cashbox().find_by_date(d(2024, 6, 5)).await.unwrap(), Some(close));
        assert_eq!(db.cashbox().find_by_date(d(2024, 6, 6)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_second_close_is_rejected_and_first_kept() {
        let db = db().await;
        let first = day(d(2024, 6, 5), 100_000);
        db.cashbox().save(&first).await.unwrap();

        let err = db.cashbox().save(&day(d(2024, 6, 5), 1)).await.unwrap_err();
        assert!(err.is_unique_on("cashbox_days"));

        let stored = db.cashbox().find_by_date(d(2024, 6, 5)).await.unwrap().unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn test_latest_before_skips_gaps() {
        let db = db().await;
        db.cashbox().save(&day(d(2024, 6, 7), 1)).await.unwrap();
        db.cashbox().save(&day(d(2024, 6, 8), 2)).await.unwrap();

        // Sunday not closed; Monday starts from Saturday
        let prior = db.cashbox().find_latest_before(d(2024, 6, 10)).await.unwrap().unwrap();
        assert_eq!(prior.date, d(2024, 6, 8));

        let prior = db.cashbox().find_latest_before(d(2024, 6, 8)).await.unwrap().unwrap();
        assert_eq!(prior.date, d(2024, 6, 7));

        assert!(db.cashbox().find_latest_before(d(2024, 6, 7)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_in_range_is_ordered() {
        let db = db().await;
        for day_of_month in [3, 5, 9] {
            db.cashbox().save(&day(d(2024, 6, day_of_month), 1)).await.unwrap();
        }
        db.cashbox().save(&day(d(2024, 6, 10), 1)).await.unwrap();

        let week = db.cashbox().list_in_range(d(2024, 6, 3), d(2024, 6, 9)).await.unwrap();
        let dates: Vec<_> = week.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![d(2024, 6, 3), d(2024, 6, 5), d(2024, 6, 9)]);
    }

    #[tokio::test]
    async fn test_back_dated_close_is_rejected() {
        let db = db().await;
        db.cashbox().save(&day(d(2024, 6, 3), 1)).await.unwrap();
        db.cashbox().save(&day(d(2024, 6, 5), 2)).await.unwrap();

        assert!(matches!(
            db.cashbox().save(&day(d(2024, 6, 4), 3)).await,
            Err(DbError::Conflict(_))
        ));
        assert!(db.cashbox().find_by_date(d(2024, 6, 4)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_only_latest() {
        let db = db().await;
        db.cashbox().save(&day(d(2024, 6, 5), 1)).await.unwrap();
        db.cashbox().save(&day(d(2024, 6, 6), 2)).await.unwrap();

        assert!(matches!(
            db.cashbox().delete(d(2024, 6, 5)).await,
            Err(DbError::Conflict(_))
        ));

        let removed = db.cashbox().delete(d(2024, 6, 6)).await.unwrap();
        assert_eq!(removed.balance_gs, 2);
        assert!(db.cashbox().find_by_date(d(2024, 6, 6)).await.unwrap().is_none());

        // now the 5th is the latest and may be redone
        db.cashbox().delete(d(2024, 6, 5)).await.unwrap();
        assert!(matches!(
            db.cashbox().delete(d(2024, 6, 5)).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
