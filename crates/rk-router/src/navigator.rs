// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Navigation driver.
//!
//! [`Navigator`] follows guard redirects to a final page, remembers where
//! the user is, and tears session routes down when a
//! [`SessionEvent::LoggedOut`] arrives.

use std::sync::Arc;

use parking_lot::RwLock;
use rk_client::SessionEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{RouterError, RouterResult};
use crate::guard::{GuardState, NavigationGuard, NavigationOutcome, RedirectReason};
use crate::location::Location;
use crate::route::RouteDescriptor;

/// Default redirect hop limit.
pub const DEFAULT_MAX_REDIRECTS: usize = 4;

/// A completed navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    /// What was asked for.
    pub requested: Location,
    /// Where the user ended up.
    pub location: Location,
    /// Final guard state.
    pub state: GuardState,
    /// The route rendered, if any.
    pub route: Option<RouteDescriptor>,
    /// Redirects taken on the way.
    pub redirects: Vec<(Location, RedirectReason)>,
}

impl Navigation {
    /// Returns `true` if the user ended up where they asked to go.
    pub fn reached_target(&self) -> bool {
        self.redirects.is_empty()
    }

    /// Returns the first redirect reason, if redirected.
    pub fn redirect_reason(&self) -> Option<RedirectReason> {
        self.redirects.first().map(|(_, reason)| *reason)
    }
}

/// Follows redirects and tracks the current location.
#[derive(Debug)]
pub struct Navigator {
    guard: Arc<NavigationGuard>,
    current: RwLock<Option<Location>>,
    max_redirects: usize,
}

impl Navigator {
    /// Creates a navigator.
    pub fn new(guard: Arc<NavigationGuard>) -> Self {
        Self {
            guard,
            current: RwLock::new(None),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Sets the redirect hop limit.
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects.max(1);
        self
    }

    /// Returns the guard.
    pub fn guard(&self) -> &Arc<NavigationGuard> {
        &self.guard
    }

    /// Returns the current location.
    pub fn current(&self) -> Option<Location> {
        self.current.read().clone()
    }

    /// Navigates to `target`, following redirects.
    pub async fn navigate(&self, target: &str) -> RouterResult<Navigation> {
        let requested = Location::parse(target);
        let mut location = requested.clone();
        let mut redirects = Vec::new();

        loop {
            match self.guard.dispatch(&location).await {
                NavigationOutcome::Allow { state, location, route, .. } => {
                    debug!(path = %location, state = ?state, "Navigation allowed");
                    *self.current.write() = Some(location.clone());
                    return Ok(Navigation {
                        requested,
                        location,
                        state,
                        route,
                        redirects,
                    });
                }
                NavigationOutcome::Redirect { to, reason } => {
                    debug!(from = %location, to = %to, reason = ?reason, "Redirected");
                    redirects.push((to.clone(), reason));
                    if redirects.len() > self.max_redirects {
                        return Err(RouterError::redirect_loop(requested.to_string(), redirects.len()));
                    }
                    location = to;
                }
            }
        }
    }

    /// Where to go after a successful login.
    ///
    /// Uses the `redirect` parameter of the current login location when
    /// present, else the home page.
    pub async fn after_login(&self) -> RouterResult<Navigation> {
        let config = self.guard.config();
        let target = self
            .current()
            .filter(|loc| config.is_login(loc.path()))
            .and_then(|loc| loc.query_value(&config.redirect_param).map(str::to_string))
            .filter(|target| !target.trim().is_empty() && !config.is_login(target))
            .unwrap_or_else(|| config.home_path.clone());
        self.navigate(&target).await
    }

    /// Reacts to a session event.
    pub fn handle_event(&self, event: &SessionEvent) {
        if let SessionEvent::LoggedOut { reason } = event {
            info!(reason = %reason, "Session ended, resetting routes");
            self.guard.reset();
            let login = Location::path_only(&self.guard.config().login_path);
            *self.current.write() = Some(login);
        }
    }

    /// Spawns a task applying session events until the channel closes.
    pub fn spawn_event_listener(
        self: &Arc<Self>,
        mut events: broadcast::Receiver<SessionEvent>,
    ) -> JoinHandle<()> {
        let navigator = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => navigator.handle_event(&event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Session events lagged, resetting routes");
                        navigator.guard.reset();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
