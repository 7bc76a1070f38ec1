//! # Commands Module
//!
//! One async function per back-office action. A desktop shell registers
//! them as IPC handlers; the `barberia` console binary calls them directly.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── session.rs  ◄─── PIN login, logout
//! ├── users.rs    ◄─── User management (admin)
//! ├── ledger.rs   ◄─── Services, expenses, advances, production reports
//! ├── payroll.rs  ◄─── Weekly salary table, preview, payment
//! ├── cashbox.rs  ◄─── Day summary, close, week view, backups
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  pay_salary(db, session, config, request)                              │
//! │         │                                                               │
//! │         ├── session.require()           ◄── NotLoggedIn / Forbidden    │
//! │         ├── repository reads            ◄── production, advances       │
//! │         ├── barberia_core::payroll      ◄── pure computation           │
//! │         ├── repository write            ◄── one transaction            │
//! │         └── info!(audit line)                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<PaySalaryResponse, ApiError>  (serde-serializable both ways)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs session
//! pub fn logout(session: &SessionState) -> Option<Session>
//!
//! // Needs database and session
//! pub async fn record_expense(db: &DbState, session: &SessionState, ...)
//!
//! // Needs the configured week definition too
//! pub async fn pay_salary(db: &DbState, session: &SessionState, config: &ConfigState, ...)
//! ```

pub mod cashbox;
pub mod config;
pub mod ledger;
pub mod payroll;
pub mod session;
pub mod users;

/// Fixtures shared by the command tests.
#[cfg(test)]
pub(crate) mod test_support {
    use barberia_core::{Money, PaymentMethod, PaymentPlan, Role, User};
    use chrono::{NaiveDate, Utc};

    use crate::state::{ConfigState, DbState, SessionState};

    pub struct Ctx {
        pub db: DbState,
        pub session: SessionState,
        pub config: ConfigState,
    }

    /// In-memory database, nobody logged in, backups disabled.
    pub async fn ctx() -> Ctx {
        Ctx {
            db: DbState::in_memory().await.unwrap(),
            session: SessionState::new(),
            config: ConfigState {
                backup_on_close: false,
                ..ConfigState::default()
            },
        }
    }

    pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Inserts a user directly, bypassing the admin-only command.
    pub async fn seed_user(ctx: &Ctx, name: &str, pin: &str, role: Role, plan: PaymentPlan) -> User {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            role,
            pin: pin.to_string(),
            plan,
            active: true,
            created_at: Utc::now(),
        };
        ctx.db.inner().users().insert(&user).await.unwrap();
        user
    }

    /// Seeds an admin (PIN 0000) and logs in as them.
    pub async fn login_admin(ctx: &Ctx) -> User {
        let admin = seed_user(ctx, "Dueño", "0000", Role::Admin, PaymentPlan::Undefined).await;
        super::session::login(&ctx.db, &ctx.session, "0000").await.unwrap();
        admin
    }

    /// Records a one-item ticket through the command.
    pub async fn sell(ctx: &Ctx, user_id: &str, date: NaiveDate, method: PaymentMethod, gs: i64) {
        let request = super::ledger::RecordServiceRequest {
            user_id: user_id.to_string(),
            date,
            payment_method: method,
            items: vec![super::ledger::ServiceItemInput {
                service_type: "corte".to_string(),
                price: gs,
            }],
            notes: None,
        };
        super::ledger::record_service(&ctx.db, &ctx.session, request)
            .await
            .unwrap();
    }

    pub fn gs(v: i64) -> Money {
        Money::from_gs(v)
    }
}
