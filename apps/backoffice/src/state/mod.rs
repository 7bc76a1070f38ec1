//! # State Module
//!
//! Application state for the back-office.
//!
//! Instead of a single `AppState` struct containing everything, each
//! concern has its own state type and every command takes exactly the ones
//! it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      BackOffice (lib.rs)                        │   │
//! │  │  owns one of each; a desktop shell would `manage()` them        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │   DbState    │  │ SessionState │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Database    │  │  Arc<Mutex<  │  │  shop name       │              │
//! │  │  (SQLite     │  │   Option<    │  │  week defs       │              │
//! │  │   pool)      │  │   Session>>> │  │  backup dir      │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • SessionState: Arc<Mutex<T>>, held only to copy the session          │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod session;

pub use config::{default_config_path, ConfigError, ConfigState, CONFIG_FILE_NAME};
pub use db::DbState;
pub use session::SessionState;
