//! # Service Repository
//!
//! Service tickets (header + line items) and the production sums payroll
//! and the cashbox are built on.
//!
//! ```text
//!  services                         service_items
//!  ┌──────────────────────────┐     ┌──────────────────────────────┐
//!  │ id, user_id, date        │◄────│ service_id  corte   50.000   │
//!  │ payment_method, total_gs │     │ service_id  barba   30.000   │
//!  └──────────────────────────┘     └──────────────────────────────┘
//!        total_gs == Σ price_gs, written in one transaction
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use barberia_core::production::MethodTotals;
use barberia_core::{Money, PaymentMethod, Service, ServiceItem};

const SELECT_SERVICE: &str = r#"
    SELECT id, user_id, date, payment_method, total_gs, notes, created_at
    FROM services
"#;

/// Repository for service tickets.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    /// Creates a new ServiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ServiceRepository { pool }
    }

    /// Inserts a ticket and its items atomically.
    ///
    /// ## Errors
    /// - `Conflict` if there are no items, an item belongs to another
    ///   ticket, or the header total is not the sum of the items
    /// - `ForeignKeyViolation` for an unknown user
    pub async fn insert(&self, service: &Service, items: &[ServiceItem]) -> DbResult<()> {
        if items.is_empty() {
            return Err(DbError::Conflict("a service needs at least one item".to_string()));
        }
        if items.iter().any(|i| i.service_id != service.id) {
            return Err(DbError::Conflict(
                "service item belongs to a different service".to_string(),
            ));
        }
        let sum: i64 = items.iter().map(|i| i.price_gs).sum();
        if sum != service.total_gs {
            return Err(DbError::Conflict(format!(
                "service total {} does not match items {}",
                service.total(),
                Money::from_gs(sum)
            )));
        }

        debug!(
            id = %service.id,
            user_id = %service.user_id,
            date = %service.date,
            total = service.total_gs,
            items = items.len(),
            "Inserting service"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO services (
                id, user_id, date, payment_method, total_gs, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&service.id)
        .bind(&service.user_id)
        .bind(service.date)
        .bind(service.payment_method)
        .bind(service.total_gs)
        .bind(&service.notes)
        .bind(service.created_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO service_items (id, service_id, service_type, price_gs)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(&item.id)
            .bind(&item.service_id)
            .bind(&item.service_type)
            .bind(item.price_gs)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets a ticket header by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Service>> {
        let service = sqlx::query_as(&format!("{SELECT_SERVICE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(service)
    }

    /// Gets the items of a ticket.
    pub async fn items(&self, service_id: &str) -> DbResult<Vec<ServiceItem>> {
        let items = sqlx::query_as(
            r#"
            SELECT id, service_id, service_type, price_gs
            FROM service_items
            WHERE service_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Tickets dated exactly `date`.
    pub async fn list_by_date(&self, date: NaiveDate) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as(&format!(
            "{SELECT_SERVICE} WHERE date = ?1 ORDER BY created_at, id"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(services)
    }

    /// Tickets with `date ∈ [from, to]`, optionally for one user.
    pub async fn list_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        user_id: Option<&str>,
    ) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as(&format!(
            "{SELECT_SERVICE} WHERE date BETWEEN ?1 AND ?2 AND (?3 IS NULL OR user_id = ?3) \
             ORDER BY date, created_at, id"
        ))
        .bind(from)
        .bind(to)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(services)
    }

    /// Production of `user_id` for `date ∈ [from, to]`. Zero when empty.
    pub async fn weekly_total(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Money> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_gs), 0)
            FROM services
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        debug!(user_id = %user_id, %from, %to, total, "Weekly production");
        Ok(Money::from_gs(total))
    }

    /// Production for `date ∈ [from, to]` split by payment method.
    pub async fn totals_by_method(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        user_id: Option<&str>,
    ) -> DbResult<MethodTotals> {
        let rows: Vec<(PaymentMethod, i64)> = sqlx::query_as(
            r#"
            SELECT payment_method, SUM(total_gs)
            FROM services
            WHERE date BETWEEN ?1 AND ?2 AND (?3 IS NULL OR user_id = ?3)
            GROUP BY payment_method
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(method, gs)| (method, Money::from_gs(gs)))
            .collect())
    }

    /// Deletes a ticket; its items go with it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting service");

        let result = sqlx::query("DELETE FROM services WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{d, db, insert_ticket, insert_user, ticket};
    use barberia_core::production::production_in_range;
    use barberia_core::{PaymentPlan, WeekDefinition};

    #[tokio::test]
    async fn test_round_trip_with_items() {
        let db = db().await;
        let ana = insert_user(&db, "Ana", "1111", PaymentPlan::Undefined).await;

        let (mut service, mut items) = ticket(&ana.id, d(2024, 6, 5), PaymentMethod::Cash, 50_000);
        items.push(ServiceItem {
            id: uuid::Uuid::new_v4().to_string(),
            service_id: service.id.clone(),
            service_type: "barba".to_string(),
            price_gs: 30_000,
        });
        service.total_gs = 80_000;
        service.notes = Some("cliente nuevo".to_string());
        db.services().insert(&service, &items).await.unwrap();

        assert_eq!(db.services().get_by_id(&service.id).await.unwrap().unwrap(), service);
        assert_eq!(db.services().items(&service.id).await.unwrap(), items);
    }

    #[tokio::test]
    async fn test_total_must_match_items() {
        let db = db().await;
        let ana = insert_user(&db, "Ana", "1111", PaymentPlan::Undefined).await;

        let (mut service, items) = ticket(&ana.id, d(2024, 6, 5), PaymentMethod::Cash, 50_000);
        service.total_gs = 49_000;
        let err = db.services().insert(&service, &items).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
        assert!(db.services().get_by_id(&service.id).await.unwrap().is_none());

        let err = db.services().insert(&service, &[]).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_failed_item_rolls_back_header() {
        let db = db().await;
        let ana = insert_user(&db, "Ana", "1111", PaymentPlan::Undefined).await;

        let (service, mut items) = ticket(&ana.id, d(2024, 6, 5), PaymentMethod::Cash, 50_000);
        // duplicate item id violates the primary key on the second insert
        let mut dup = items[0].clone();
        dup.price_gs = 10_000;
        items[0].price_gs = 40_000;
        items.push(dup);
        items[1].id = items[0].id.clone();

        assert!(db.services().insert(&service, &items).await.is_err());
        assert!(db.services().get_by_id(&service.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_weekly_total_excludes_sunday() {
        let db = db().await;
        let ana = insert_user(&db, "Ana", "1111", PaymentPlan::Undefined).await;
        let beto = insert_user(&db, "Beto", "2222", PaymentPlan::Undefined).await;

        let mut all = Vec::new();
        for (date, price) in [
            (d(2024, 6, 2), 1_000), // previous Sunday
            (d(2024, 6, 3), 10_000),
            (d(2024, 6, 8), 20_000),
            (d(2024, 6, 9), 40_000), // Sunday
        ] {
            all.push(insert_ticket(&db, &ana.id, date, PaymentMethod::Cash, price).await);
        }
        all.push(insert_ticket(&db, &beto.id, d(2024, 6, 5), PaymentMethod::Pos, 80_000).await);

        let week = WeekDefinition::MondayToSaturday.range_containing(d(2024, 6, 5));
        let sql = db.services().weekly_total(&ana.id, week.start, week.end).await.unwrap();

        assert_eq!(sql, Money::from_gs(30_000));
        assert_eq!(sql, production_in_range(&all, &ana.id, week));

        let nobody = db.services().weekly_total("nobody", week.start, week.end).await.unwrap();
        assert_eq!(nobody, Money::zero());
    }

    #[tokio::test]
    async fn test_totals_by_method_and_listing() {
        let db = db().await;
        let ana = insert_user(&db, "Ana", "1111", PaymentPlan::Undefined).await;
        let beto = insert_user(&db, "Beto", "2222", PaymentPlan::Undefined).await;
        insert_ticket(&db, &ana.id, d(2024, 6, 5), PaymentMethod::Cash, 10_000).await;
        insert_ticket(&db, &ana.id, d(2024, 6, 5), PaymentMethod::Transfer, 15_000).await;
        insert_ticket(&db, &beto.id, d(2024, 6, 6), PaymentMethod::Pos, 30_000).await;

        let shop = db
            .services()
            .totals_by_method(d(2024, 6, 3), d(2024, 6, 8), None)
            .await
            .unwrap();
        assert_eq!(shop.cash, Money::from_gs(10_000));
        assert_eq!(shop.transfer, Money::from_gs(15_000));
        assert_eq!(shop.pos, Money::from_gs(30_000));

        let ana_only = db
            .services()
            .totals_by_method(d(2024, 6, 3), d(2024, 6, 8), Some(&ana.id))
            .await
            .unwrap();
        assert_eq!(ana_only.pos, Money::zero());

        assert_eq!(db.services().list_by_date(d(2024, 6, 5)).await.unwrap().len(), 2);
        let beto_week = db
            .services()
            .list_in_range(d(2024, 6, 3), d(2024, 6, 8), Some(&beto.id))
            .await
            .unwrap();
        assert_eq!(beto_week.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_cascades_items() {
        let db = db().await;
        let ana = insert_user(&db, "Ana", "1111", PaymentPlan::Undefined).await;
        let s = insert_ticket(&db, &ana.id, d(2024, 6, 5), PaymentMethod::Cash, 10_000).await;

        db.services().delete(&s.id).await.unwrap();
        assert!(db.services().items(&s.id).await.unwrap().is_empty());
        assert!(matches!(
            db.services().delete(&s.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
