//! # Session
//!
//! Who is operating the back-office right now. A `Session` begins when a PIN
//! matches an active user and ends at logout; the application keeps at most
//! one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Role, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    pub user_id: String,
    pub user_name: String,
    pub role: Role,
    #[ts(as = "String")]
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn begin(user: &User, now: DateTime<Utc>) -> Self {
        Session {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            role: user.role,
            started_at: now,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails with `Forbidden` unless the session belongs to an admin.
    pub fn require_admin(&self, action: &str) -> CoreResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Forbidden {
                action: action.to_string(),
            })
        }
    }
}

/// Turns "maybe logged in" into a session or `NotLoggedIn`.
pub fn require_session(session: Option<&Session>) -> CoreResult<&Session> {
    session.ok_or(CoreError::NotLoggedIn)
}
