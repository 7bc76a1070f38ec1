//! # Session Commands
//!
//! PIN login and logout. The PIN is the only credential; it identifies the
//! user and starts the session in one step.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{ApiError, ErrorCode};
use crate::state::{DbState, SessionState};
use barberia_core::validation::validate_pin;
use barberia_core::Session;

/// Starts a session for the active user owning `pin`.
///
/// ## Errors
/// - `VALIDATION_ERROR` when the PIN is not four digits
/// - `NOT_FOUND` when no active user has it
pub async fn login(db: &DbState, session: &SessionState, pin: &str) -> Result<Session, ApiError> {
    validate_pin(pin)?;

    let user = match db.inner().users().find_by_pin(pin).await? {
        Some(user) if user.active => user,
        Some(user) => {
            warn!(user_id = %user.id, "Login refused: user is inactive");
            return Err(ApiError::new(ErrorCode::NotFound, "No active user with that PIN"));
        }
        None => {
            warn!("Login refused: unknown PIN");
            return Err(ApiError::new(ErrorCode::NotFound, "No active user with that PIN"));
        }
    };

    let started = Session::begin(&user, Utc::now());
    session.begin(started.clone());

    info!(user_id = %user.id, name = %user.name, role = ?user.role, "Logged in");
    Ok(started)
}

/// Ends the current session, if any.
pub fn logout(session: &SessionState) -> Option<Session> {
    let ended = session.end();
    if let Some(s) = &ended {
        info!(user_id = %s.user_id, "Logged out");
    }
    ended
}

/// The current session, if any.
pub fn current_session(session: &SessionState) -> Option<Session> {
    session.current()
}
