// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session lifecycle events.

use tokio::sync::broadcast;
use tracing::trace;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The user asked to sign out.
    UserRequested,
    /// The server rejected the session (401/403).
    SessionExpired,
    /// The refresh token was rejected.
    RefreshFailed,
    /// Loading profile, permissions or menus failed.
    HydrationFailed,
}

impl LogoutReason {
    /// Returns the reason as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserRequested => "user_requested",
            Self::SessionExpired => "session_expired",
            Self::RefreshFailed => "refresh_failed",
            Self::HydrationFailed => "hydration_failed",
        }
    }
}

impl std::fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A session lifecycle event.
///
/// `LoggedOut` is the signal to navigate to the login page and tear down
/// session-scoped state such as synthesized routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login succeeded.
    LoggedIn {
        /// User id.
        user_id: i64,
        /// Account name.
        username: String,
    },
    /// The token pair was refreshed.
    Refreshed,
    /// The session was destroyed.
    LoggedOut {
        /// Why.
        reason: LogoutReason,
    },
}

/// Broadcast channel for [`SessionEvent`]s.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(64)
    }
}

impl SessionEvents {
    /// Creates a channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event. Having no subscribers is not an error.
    pub fn emit(&self, event: SessionEvent) {
        if self.sender.send(event).is_err() {
            trace!("Session event dropped, no subscribers");
        }
    }
}
