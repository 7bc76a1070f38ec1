//! # User Repository
//!
//! Barbers and administrators, including their payment plan.
//!
//! The plan is stored as three integers and decoded on read:
//!
//! ```text
//!   users row                               User
//!   ┌──────────────┬────────┬────────┐      ┌───────────────────────────────┐
//!   │ payment_type │ param1 │ param2 │ ───► │ plan: PaymentPlan::Commission │
//!   │      1       │  5000  │   0    │      │        { rate: 50% }          │
//!   └──────────────┴────────┴────────┘      └───────────────────────────────┘
//!   unknown code ──► DbError::InvalidRow(UndefinedPaymentType)
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use barberia_core::{PaymentPlan, Role, User};

/// Raw `users` row before the plan is decoded.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    role: Role,
    pin: String,
    payment_type: i64,
    param1: i64,
    param2: i64,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> DbResult<Self> {
        let plan = PaymentPlan::from_parts(&row.id, row.payment_type, row.param1, row.param2)
            .map_err(|e| DbError::invalid_row("User", e))?;
        Ok(User {
            id: row.id,
            name: row.name,
            role: row.role,
            pin: row.pin,
            plan,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

const SELECT_USER: &str = r#"
    SELECT id, name, role, pin, payment_type, param1, param2, active, created_at
    FROM users
"#;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user.
    ///
    /// ## Errors
    /// `UniqueViolation` on `users.pin` when the PIN is taken.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, name = %user.name, plan = user.plan.label(), "Inserting user");

        let (payment_type, param1, param2) = user.plan.to_parts();

        sqlx::query(
            r#"
            INSERT INTO users (
                id, name, role, pin,
                payment_type, param1, param2,
                active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(user.role)
        .bind(&user.pin)
        .bind(payment_type)
        .bind(param1)
        .bind(param2)
        .bind(user.active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Looks a user up by login PIN (active or not).
    pub async fn find_by_pin(&self, pin: &str) -> DbResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE pin = ?1"))
            .bind(pin)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Lists users ordered by name.
    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "{SELECT_USER} WHERE active = 1 OR ?1 ORDER BY name COLLATE NOCASE, id"
        ))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Updates name, role, PIN, plan and active flag.
    pub async fn update(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, plan = user.plan.label(), active = user.active, "Updating user");

        let (payment_type, param1, param2) = user.plan.to_parts();

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = ?2,
                role = ?3,
                pin = ?4,
                payment_type = ?5,
                param1 = ?6,
                param2 = ?7,
                active = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(user.role)
        .bind(&user.pin)
        .bind(payment_type)
        .bind(param1)
        .bind(param2)
        .bind(user.active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", &user.id));
        }

        Ok(())
    }

    /// Counts users (for the seed binary and first-run checks).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
