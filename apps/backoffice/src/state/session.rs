//! # Session State
//!
//! The one logged-in user of this back-office instance.
//!
//! ```text
//!   login(pin) ──► SessionState::begin(Session)   ─┐
//!                                                  │  commands call
//!   any command ─► require() / require_admin() ◄───┘  these first
//!                                                  │
//!   logout() ────► SessionState::end()            ─┘
//! ```
//!
//! Wrapped in `Arc<Mutex<T>>` so the desktop shell and background tasks can
//! share one instance. The lock is only held to copy the session out.

use std::sync::{Arc, Mutex};

use barberia_core::session::require_session;
use barberia_core::{CoreResult, Session};

/// Holds the current session, if any.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    current: Arc<Mutex<Option<Session>>>,
}

impl SessionState {
    /// No one logged in.
    pub fn new() -> Self {
        SessionState::default()
    }

    /// Replaces whatever session was active.
    pub fn begin(&self, session: Session) {
        *self.current.lock().expect("Session mutex poisoned") = Some(session);
    }

    /// Ends the session; returns the one that was active.
    pub fn end(&self) -> Option<Session> {
        self.current.lock().expect("Session mutex poisoned").take()
    }

    /// A copy of the active session.
    pub fn current(&self) -> Option<Session> {
        self.current.lock().expect("Session mutex poisoned").clone()
    }

    /// The active session, or `NotLoggedIn`.
    pub fn require(&self) -> CoreResult<Session> {
        let current = self.current();
        require_session(current.as_ref()).cloned()
    }

    /// The active session if it is an admin's, else `NotLoggedIn` / `Forbidden`.
    pub fn require_admin(&self, action: &str) -> CoreResult<Session> {
        let session = self.require()?;
        session.require_admin(action)?;
        Ok(session)
    }
}
