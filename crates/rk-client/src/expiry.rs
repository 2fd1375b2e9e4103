// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session-expired handling.
//!
//! When several in-flight requests fail with 401/403 at once, the user must
//! see a single "session expired" prompt and the session must be torn down
//! once. [`AuthFailureGate`] admits one flow at a time; the permit it hands
//! out releases the gate when dropped, including on early return.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{LogoutReason, SessionEvent, SessionEvents};
use crate::state::SessionCell;

// =============================================================================
// AuthFailureGate
// =============================================================================

/// Admits at most one session-expired flow at a time.
#[derive(Debug, Default)]
pub struct AuthFailureGate {
    busy: AtomicBool,
}

impl AuthFailureGate {
    /// Creates an open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tries to enter the gate. Returns `None` if a flow is already running.
    pub fn try_acquire(self: &Arc<Self>) -> Option<AuthFailurePermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| AuthFailurePermit {
                gate: Arc::clone(self),
            })
    }

    /// Returns `true` while a flow holds the gate.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the gate on drop.
#[derive(Debug)]
pub struct AuthFailurePermit {
    gate: Arc<AuthFailureGate>,
}

impl Drop for AuthFailurePermit {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

// =============================================================================
// SessionExpiredPrompt
// =============================================================================

/// Tells the user their session has ended.
///
/// The returned future completes when the user has acknowledged the prompt.
#[async_trait]
pub trait SessionExpiredPrompt: Send + Sync {
    /// Shows the prompt.
    async fn session_expired(&self, message: &str);
}

/// A prompt that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPrompt;

#[async_trait]
impl SessionExpiredPrompt for LogPrompt {
    async fn session_expired(&self, message: &str) {
        warn!(prompt = message, "Session expired");
    }
}

// =============================================================================
// SessionExpiry
// =============================================================================

/// Runs the session-expired flow.
pub struct SessionExpiry {
    gate: Arc<AuthFailureGate>,
    prompt: Arc<dyn SessionExpiredPrompt>,
    cell: Arc<SessionCell>,
    events: SessionEvents,
    message: String,
}

impl std::fmt::Debug for SessionExpiry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionExpiry")
            .field("gate", &self.gate)
            .finish()
    }
}

impl SessionExpiry {
    /// Creates the flow handler.
    pub fn new(
        cell: Arc<SessionCell>,
        events: SessionEvents,
        prompt: Arc<dyn SessionExpiredPrompt>,
    ) -> Self {
        Self {
            gate: Arc::new(AuthFailureGate::new()),
            prompt,
            cell,
            events,
            message: "Your session has expired, please sign in again".to_string(),
        }
    }

    /// Sets the prompt message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns the gate.
    pub fn gate(&self) -> &Arc<AuthFailureGate> {
        &self.gate
    }

    /// Handles an authentication failure.
    ///
    /// Returns `true` if this call ran the flow. Calls that arrive while the
    /// flow is running, or after the session is already gone, do nothing.
    pub async fn handle(&self, status: u16) -> bool {
        let Some(_permit) = self.gate.try_acquire() else {
            debug!(status, "Session-expired flow already running");
            return false;
        };

        if !self.cell.is_authenticated() {
            debug!(status, "Authentication failure without a session");
            return false;
        }

        self.prompt.session_expired(&self.message).await;

        if self.cell.take().is_some() {
            info!(status, "Session cleared after authentication failure");
            self.events.emit(SessionEvent::LoggedOut {
                reason: LogoutReason::SessionExpired,
            });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySessionStorage;
    use rk_core::{Session, SessionTokens, UserProfile};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct CountingPrompt {
        count: AtomicUsize,
    }

    #[async_trait]
    impl SessionExpiredPrompt for CountingPrompt {
        async fn session_expired(&self, _message: &str) {
            self.count.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    fn logged_in_cell() -> Arc<SessionCell> {
        let cell = Arc::new(SessionCell::new(Arc::new(MemorySessionStorage::new())));
        cell.replace(Session::new(
            SessionTokens {
                access_token: "a".to_string(),
                refresh_token: "r".to_string(),
                access_expires_at: None,
                refresh_expires_at: None,
            },
            UserProfile {
                id: 1,
                username: "alice".to_string(),
                name: None,
                nick_name: None,
                department_id: None,
                role_id_list: Vec::new(),
                admin: None,
            },
        ));
        cell
    }

    #[test]
    fn test_gate_permit_releases_on_drop() {
        let gate = Arc::new(AuthFailureGate::new());
        let permit = gate.try_acquire().unwrap();
        assert!(gate.is_busy());
        assert!(gate.try_acquire().is_none());
        drop(permit);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_failures_prompt_once() {
        let cell = logged_in_cell();
        let events = SessionEvents::default();
        let mut rx = events.subscribe();
        let prompt = Arc::new(CountingPrompt::default());
        let expiry = Arc::new(SessionExpiry::new(cell.clone(), events, prompt.clone()));

        let (a, b, c) = tokio::join!(expiry.handle(401), expiry.handle(401), expiry.handle(403));

        assert_eq!([a, b, c].iter().filter(|ran| **ran).count(), 1);
        assert_eq!(prompt.count.load(Ordering::SeqCst), 1);
        assert!(!cell.is_authenticated());
        assert!(!expiry.gate().is_busy());
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::LoggedOut {
                reason: LogoutReason::SessionExpired
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_no_session_no_prompt() {
        let cell = Arc::new(SessionCell::new(Arc::new(MemorySessionStorage::new())));
        let prompt = Arc::new(CountingPrompt::default());
        let expiry = SessionExpiry::new(cell, SessionEvents::default(), prompt.clone());

        assert!(!expiry.handle(401).await);
        assert_eq!(prompt.count.load(Ordering::SeqCst), 0);
    }
}
