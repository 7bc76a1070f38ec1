//! # barberia-db: Database Layer for the Barbershop Back-Office
//!
//! This crate provides database access for the back-office.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Back-Office Data Flow                             │
//! │                                                                         │
//! │  Back-office command (pay_salary)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   barberia-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   │ SqlitePool    │    │ ServiceRepo   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ ExpenseRepo   │    │              │  │   │
//! │  │   │ Management    │    │ AdvanceRepo   │    └──────────────┘  │   │
//! │  │   │               │    │ SalaryRepo    │    ┌──────────────┐  │   │
//! │  │   │ VACUUM INTO ──┼───►│ CashboxRepo   │    │   Backups    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/barberia/barberia.db                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`backup`] - `VACUUM INTO` snapshots
//! - [`repository`] - Repository implementations (user, service, salary, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use barberia_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/barberia.db")).await?;
//!
//! let week = WeekDefinition::MondayToSaturday.range_containing(today);
//! let production = db.services().weekly_total(&user.id, week.start, week.end).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use backup::BackupInfo;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::advance::AdvanceRepository;
pub use repository::cashbox::CashboxRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::salary::SalaryRepository;
pub use repository::service::ServiceRepository;
pub use repository::user::UserRepository;
