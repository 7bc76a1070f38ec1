//! # Barbería Back-Office Library
//!
//! Application layer of the barbershop back-office: configuration, logging,
//! state objects and one command per user action. A desktop shell and the
//! `barberia` console binary both drive it.
//!
//! ## Module Organization
//! ```text
//! barberia_backoffice/
//! ├── lib.rs          ◄─── You are here (startup & tracing)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── session.rs  ◄─── Logged-in user
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── session.rs  ◄─── PIN login / logout
//! │   ├── users.rs    ◄─── User management
//! │   ├── ledger.rs   ◄─── Services, expenses, advances, production
//! │   ├── payroll.rs  ◄─── Weekly salaries
//! │   ├── cashbox.rs  ◄─── Day close, week view, backups
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management (Multiple State Types)
//! Instead of a single `AppState` struct, [`BackOffice`] owns one focused
//! state object per concern and each command borrows only what it needs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │    DbState       │ │   SessionState   │ │    ConfigState       │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  • Database pool │ │  • Who is logged │ │  • Shop name         │   │
//! │  │  • Repositories  │ │    in, and role  │ │  • Week definitions  │   │
//! │  │                  │ │                  │ │  • Backup settings   │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use barberia_db::{Database, DbConfig};
use error::ApiError;
use state::{ConfigState, DbState, SessionState};

/// Everything a front end needs to run commands.
#[derive(Debug, Clone)]
pub struct BackOffice {
    pub db: DbState,
    pub session: SessionState,
    pub config: ConfigState,
}

impl BackOffice {
    /// Opens the configured database and starts with nobody logged in.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  1. Resolve database path ──────────────────────────────────────►  │
    /// │     • config.database_path, or BARBERIA_DB_PATH                    │
    /// │     • otherwise the platform data directory                        │
    /// │       (Linux: ~/.local/share/backoffice/barberia.db)               │
    /// │                                                                     │
    /// │  2. Connect ────────────────────────────────────────────────────►  │
    /// │     • SQLite with WAL mode, foreign keys on                        │
    /// │     • Run pending migrations                                        │
    /// │                                                                     │
    /// │  3. Initialize state objects ──────────────────────────────────►   │
    /// │     • DbState wraps the pool                                        │
    /// │     • SessionState starts empty                                     │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn open(config: ConfigState) -> Result<Self, ApiError> {
        let db_path = config.database_path()?;
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::internal(format!("Cannot create {}: {e}", parent.display()))
            })?;
        }
        info!(?db_path, "Database path determined");

        let db = Database::new(DbConfig::new(db_path)).await?;
        info!("Database connected and migrations applied");

        Ok(BackOffice {
            db: DbState::new(db),
            session: SessionState::new(),
            config,
        })
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=barberia=trace` - Show trace for barberia crates only
/// - Default: INFO, DEBUG for barberia crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,barberia=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}
