//! # Database State
//!
//! Wraps the `Database` connection for use in commands.
//!
//! ## Thread Safety
//! The `Database` struct from `barberia-db` contains a `SqlitePool` which
//! is inherently thread-safe. Multiple commands can execute queries
//! concurrently without explicit locking.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_users(db: &DbState, session: &SessionState) -> Result<Vec<UserDto>, ApiError> {
//!     session.require()?;
//!     let users = db.inner().users().list(false).await?;
//!     Ok(users.iter().map(UserDto::from).collect())
//! }
//! ```

use barberia_db::{Database, DbConfig};

use crate::error::ApiError;

/// Wrapper around `Database` handed to every command.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Fresh in-memory database with migrations applied.
    pub async fn in_memory() -> Result<Self, ApiError> {
        Ok(DbState::new(Database::new(DbConfig::in_memory()).await?))
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
