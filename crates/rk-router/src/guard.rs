// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The navigation guard.
//!
//! Every navigation passes through [`NavigationGuard::dispatch`]:
//!
//! | Condition | State | Result |
//! |---|---|---|
//! | public path (login while signed in goes home) | `PublicOk` | allow |
//! | no session | `UnauthenticatedRedirect` | login, `redirect=<target>` |
//! | session without routes | `Hydrating` | hydrate, register, re-dispatch once |
//! | unknown path | | not-found page |
//! | permission missing | `PermissionDenied` | forbidden page |
//! | otherwise | `Allowed` | allow |
//!
//! A hydration failure forces a logout and sends the user to the login page.
//! Hydration is serialized: overlapping navigations wait for the first one
//! and then reuse its result.
//!
//! Synthesized routes belong to the session generation they were built for.
//! Once the backend reports a different generation (a new login, a restore
//! or a teardown) they are no longer ready, and the next hydration replaces
//! them instead of adding to them.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use rk_client::{ClientResult, LogoutReason, SessionStore};
use rk_core::{MenuTree, PermissionEvaluator};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::RouterConfig;
use crate::location::Location;
use crate::route::RouteDescriptor;
use crate::synthesizer::{RouteSynthesizer, SynthesisReport};
use crate::table::RouteTable;

// =============================================================================
// SessionBackend
// =============================================================================

/// What the guard needs from the session layer.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Returns `true` if a session is present.
    fn is_authenticated(&self) -> bool;

    /// Returns `true` if the session has loaded its permissions.
    fn is_hydrated(&self) -> bool;

    /// Returns a value that changes whenever the session is replaced or ended.
    fn session_generation(&self) -> u64;

    /// Loads profile, permissions and menus.
    async fn hydrate(&self) -> ClientResult<MenuTree>;

    /// Returns the permission evaluator for the current session.
    fn evaluator(&self) -> PermissionEvaluator;

    /// Ends the session.
    async fn force_logout(&self, reason: LogoutReason);
}

#[async_trait]
impl SessionBackend for SessionStore {
    fn is_authenticated(&self) -> bool {
        SessionStore::is_authenticated(self)
    }

    fn is_hydrated(&self) -> bool {
        SessionStore::is_hydrated(self)
    }

    fn session_generation(&self) -> u64 {
        SessionStore::generation(self)
    }

    async fn hydrate(&self) -> ClientResult<MenuTree> {
        SessionStore::hydrate(self).await
    }

    fn evaluator(&self) -> PermissionEvaluator {
        SessionStore::evaluator(self)
    }

    async fn force_logout(&self, reason: LogoutReason) {
        self.end_session(reason).await
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Guard states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Public target.
    PublicOk,
    /// No session.
    UnauthenticatedRedirect,
    /// Loading the session before re-dispatching.
    Hydrating,
    /// The route's permission check failed.
    PermissionDenied,
    /// Navigation allowed.
    Allowed,
}

/// Why the guard redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// No session.
    Unauthenticated,
    /// Signed-in user asked for the login page.
    AlreadyAuthenticated,
    /// Permission check failed.
    Forbidden,
    /// No route matches the path.
    NotFound,
    /// Hydration failed and the session was ended.
    HydrationFailed,
}

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// Render the target.
    Allow {
        /// `PublicOk` or `Allowed`.
        state: GuardState,
        /// Target location.
        location: Location,
        /// Matched route. Extra public paths may have none.
        route: Option<RouteDescriptor>,
        /// Whether this dispatch hydrated the session first.
        hydrated: bool,
    },
    /// Go somewhere else.
    Redirect {
        /// New target.
        to: Location,
        /// Why.
        reason: RedirectReason,
    },
}

impl NavigationOutcome {
    /// Returns the guard state that produced this outcome.
    pub fn state(&self) -> GuardState {
        match self {
            Self::Allow { state, .. } => *state,
            Self::Redirect { reason, .. } => match reason {
                RedirectReason::Unauthenticated | RedirectReason::HydrationFailed => {
                    GuardState::UnauthenticatedRedirect
                }
                RedirectReason::Forbidden => GuardState::PermissionDenied,
                RedirectReason::AlreadyAuthenticated | RedirectReason::NotFound => {
                    GuardState::Allowed
                }
            },
        }
    }

    /// Returns `true` if navigation may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }
}

// =============================================================================
// NavigationGuard
// =============================================================================

/// Gatekeeper for navigations.
pub struct NavigationGuard {
    backend: Arc<dyn SessionBackend>,
    table: Arc<RwLock<RouteTable>>,
    synthesizer: RouteSynthesizer,
    config: RouterConfig,
    hydration: Mutex<()>,
    routes_ready: AtomicBool,
    routes_generation: AtomicU64,
}

impl std::fmt::Debug for NavigationGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationGuard")
            .field("config", &self.config)
            .field("routes_ready", &self.routes_ready.load(Ordering::Acquire))
            .field("routes_generation", &self.routes_generation.load(Ordering::Acquire))
            .finish()
    }
}

impl NavigationGuard {
    /// Creates a guard. The table is seeded with the built-in routes.
    pub fn new(
        backend: Arc<dyn SessionBackend>,
        synthesizer: RouteSynthesizer,
        config: RouterConfig,
    ) -> Self {
        let table = RouteTable::with_fixed_routes(&config, synthesizer.views());
        Self {
            backend,
            table: Arc::new(RwLock::new(table)),
            synthesizer,
            config,
            hydration: Mutex::new(()),
            routes_ready: AtomicBool::new(false),
            routes_generation: AtomicU64::new(0),
        }
    }

    /// Returns the route table.
    pub fn table(&self) -> &Arc<RwLock<RouteTable>> {
        &self.table
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Returns `true` once routes for the current session are registered.
    pub fn routes_ready(&self) -> bool {
        self.routes_ready.load(Ordering::Acquire)
            && self.routes_generation.load(Ordering::Acquire) == self.backend.session_generation()
    }

    /// Drops session-scoped routes. Called when the session ends.
    pub fn reset(&self) {
        self.routes_ready.store(false, Ordering::Release);
        self.table.write().deregister_dynamic();
    }

    /// Decides what happens to a navigation.
    pub async fn dispatch(&self, target: &Location) -> NavigationOutcome {
        let mut hydrated = false;

        // At most one re-dispatch after hydration.
        for _ in 0..2 {
            let path = target.path();

            if self.config.is_public(path) {
                if self.config.is_login(path) && self.backend.is_authenticated() {
                    return self.redirect(&self.config.home_path, RedirectReason::AlreadyAuthenticated);
                }
                return NavigationOutcome::Allow {
                    state: GuardState::PublicOk,
                    location: target.clone(),
                    route: self.table.read().match_path(path).cloned(),
                    hydrated,
                };
            }

            if !self.backend.is_authenticated() {
                return self.login_redirect(target, RedirectReason::Unauthenticated);
            }

            if !self.routes_ready() || !self.backend.is_hydrated() {
                if hydrated {
                    break;
                }
                debug!(path, "Hydrating before navigation");
                if let Err(e) = self.ensure_hydrated().await {
                    if self.backend.is_authenticated() {
                        warn!(path, error = %e, "Hydration failed, ending session");
                        self.backend.force_logout(LogoutReason::HydrationFailed).await;
                    } else {
                        warn!(path, error = %e, "Hydration failed, session already ended");
                    }
                    self.reset();
                    return self.login_redirect(target, RedirectReason::HydrationFailed);
                }
                hydrated = true;
                continue;
            }

            let route = match self.table.read().match_path(path) {
                Some(route) => route.clone(),
                None => return self.redirect(&self.config.not_found_path, RedirectReason::NotFound),
            };

            if !self.backend.evaluator().has_all_permissions(&route.permissions) {
                debug!(path, route = %route.name, "Permission denied");
                return self.redirect(&self.config.forbidden_path, RedirectReason::Forbidden);
            }

            return NavigationOutcome::Allow {
                state: GuardState::Allowed,
                location: target.clone(),
                route: Some(route),
                hydrated,
            };
        }

        warn!(path = target.path(), "Session still not ready after hydration");
        self.login_redirect(target, RedirectReason::HydrationFailed)
    }

    /// Hydrates the session and registers its routes, once.
    ///
    /// Returns `None` if another caller already did the work.
    pub async fn ensure_hydrated(&self) -> ClientResult<Option<SynthesisReport>> {
        let _lock = self.hydration.lock().await;
        if self.routes_ready() && self.backend.is_hydrated() {
            return Ok(None);
        }

        let generation = self.backend.session_generation();
        let tree = self.backend.hydrate().await?;
        if !self.backend.is_authenticated() {
            return Err(rk_client::ClientError::NotAuthenticated);
        }

        let report = {
            let mut table = self.table.write();
            table.deregister_dynamic();
            self.synthesizer.register(&tree, &mut table)
        };
        self.routes_generation.store(generation, Ordering::Release);
        self.routes_ready.store(true, Ordering::Release);
        info!(routes = report.added, "Session routes registered");
        Ok(Some(report))
    }

    fn redirect(&self, path: &str, reason: RedirectReason) -> NavigationOutcome {
        NavigationOutcome::Redirect {
            to: Location::path_only(path),
            reason,
        }
    }

    fn login_redirect(&self, target: &Location, reason: RedirectReason) -> NavigationOutcome {
        NavigationOutcome::Redirect {
            to: Location::path_only(&self.config.login_path)
                .with_query(self.config.redirect_param.clone(), target.to_string()),
            reason,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewRegistry;
    use rk_client::ClientError;
    use rk_core::{Menu, MenuType, PermissionSet};
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct ScriptedBackend {
        authenticated: AtomicBool,
        hydrated: AtomicBool,
        generation: AtomicU64,
        fail: bool,
        fail_ends_session: bool,
        admin: bool,
        hydrations: AtomicUsize,
        logouts: AtomicUsize,
    }

    impl ScriptedBackend {
        fn signed_in() -> Self {
            let backend = Self::default();
            backend.authenticated.store(true, Ordering::SeqCst);
            backend
        }

        /// Another user signs in without a logout in between.
        fn switch_session(&self) {
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.hydrated.store(false, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl SessionBackend for ScriptedBackend {
        fn is_authenticated(&self) -> bool {
            self.authenticated.load(Ordering::SeqCst)
        }

        fn is_hydrated(&self) -> bool {
            self.hydrated.load(Ordering::SeqCst)
        }

        fn session_generation(&self) -> u64 {
            self.generation.load(Ordering::SeqCst)
        }

        async fn hydrate(&self) -> ClientResult<MenuTree> {
            self.hydrations.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail_ends_session {
                self.authenticated.store(false, Ordering::SeqCst);
                self.generation.fetch_add(1, Ordering::SeqCst);
                return Err(ClientError::AuthenticationFailed { status: 401 });
            }
            if self.fail {
                return Err(ClientError::transport("connection refused"));
            }
            self.hydrated.store(true, Ordering::SeqCst);
            Ok(MenuTree::from_menus(vec![
                Menu::new(1, None, "RK", MenuType::Directory),
                Menu::new(2, Some(1), "Supply", MenuType::Page)
                    .with_router("/rk/supply")
                    .with_perms("rk:supply:page"),
                Menu::new(3, Some(1), "Vendor", MenuType::Page)
                    .with_router("/rk/vendor")
                    .with_perms("rk:vendor:page"),
            ]))
        }

        fn evaluator(&self) -> PermissionEvaluator {
            PermissionEvaluator::new(
                Arc::new(PermissionSet::from_codes(["rk:supply:page"])),
                self.admin,
            )
        }

        async fn force_logout(&self, _reason: LogoutReason) {
            self.logouts.fetch_add(1, Ordering::SeqCst);
            self.authenticated.store(false, Ordering::SeqCst);
            self.hydrated.store(false, Ordering::SeqCst);
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn guard(backend: Arc<ScriptedBackend>) -> NavigationGuard {
        NavigationGuard::new(
            backend,
            RouteSynthesizer::new(Arc::new(ViewRegistry::new())),
            RouterConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_unauthenticated_redirects_with_target() {
        let guard = guard(Arc::new(ScriptedBackend::default()));
        let outcome = guard.dispatch(&Location::parse("/rk/supply?page=2")).await;

        match outcome {
            NavigationOutcome::Redirect { to, reason } => {
                assert_eq!(reason, RedirectReason::Unauthenticated);
                assert_eq!(to.path(), "/login");
                assert_eq!(to.query_value("redirect"), Some("/rk/supply?page=2"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_public_and_login_while_signed_in() {
        let backend = Arc::new(ScriptedBackend::default());
        let guard = guard(backend.clone());

        let outcome = guard.dispatch(&Location::parse("/login")).await;
        assert_eq!(outcome.state(), GuardState::PublicOk);

        backend.authenticated.store(true, Ordering::SeqCst);
        let outcome = guard.dispatch(&Location::parse("/login")).await;
        assert!(matches!(
            outcome,
            NavigationOutcome::Redirect { reason: RedirectReason::AlreadyAuthenticated, .. }
        ));
    }

    #[tokio::test]
    async fn test_hydrate_then_allow_and_deny() {
        let backend = Arc::new(ScriptedBackend::signed_in());
        let guard = guard(backend.clone());

        let outcome = guard.dispatch(&Location::parse("/rk/supply")).await;
        match &outcome {
            NavigationOutcome::Allow { route, hydrated, .. } => {
                assert!(hydrated);
                assert_eq!(route.as_ref().map(|r| r.name.as_str()), Some("menu-2"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let denied = guard.dispatch(&Location::parse("/rk/vendor")).await;
        assert_eq!(denied.state(), GuardState::PermissionDenied);

        let missing = guard.dispatch(&Location::parse("/rk/nothing")).await;
        assert!(matches!(
            missing,
            NavigationOutcome::Redirect { reason: RedirectReason::NotFound, .. }
        ));
        assert_eq!(backend.hydrations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_admin_passes_permission_check() {
        let backend = Arc::new(ScriptedBackend {
            admin: true,
            ..ScriptedBackend::signed_in()
        });
        let guard = guard(backend);

        assert!(guard.dispatch(&Location::parse("/rk/vendor")).await.is_allowed());
    }

    #[tokio::test]
    async fn test_concurrent_navigations_hydrate_once() {
        let backend = Arc::new(ScriptedBackend::signed_in());
        let guard = guard(backend.clone());

        let supply = Location::parse("/rk/supply");
        let home = Location::parse("/");
        let (a, b, c) = tokio::join!(
            guard.dispatch(&supply),
            guard.dispatch(&home),
            guard.dispatch(&supply)
        );

        assert!(a.is_allowed() && b.is_allowed() && c.is_allowed());
        assert_eq!(backend.hydrations.load(Ordering::SeqCst), 1);
        assert_eq!(guard.table().read().dynamic_routes().count(), 2);
    }

    #[tokio::test]
    async fn test_hydration_failure_forces_logout() {
        let backend = Arc::new(ScriptedBackend {
            fail: true,
            ..ScriptedBackend::signed_in()
        });
        let guard = guard(backend.clone());

        let outcome = guard.dispatch(&Location::parse("/rk/supply")).await;
        assert!(matches!(
            outcome,
            NavigationOutcome::Redirect { reason: RedirectReason::HydrationFailed, .. }
        ));
        assert_eq!(backend.logouts.load(Ordering::SeqCst), 1);
        assert!(!backend.is_authenticated());
    }

    #[tokio::test]
    async fn test_failure_after_session_ended_skips_logout() {
        let backend = Arc::new(ScriptedBackend {
            fail_ends_session: true,
            ..ScriptedBackend::signed_in()
        });
        let guard = guard(backend.clone());

        let outcome = guard.dispatch(&Location::parse("/rk/supply")).await;
        assert!(matches!(
            outcome,
            NavigationOutcome::Redirect { reason: RedirectReason::HydrationFailed, .. }
        ));
        assert_eq!(backend.logouts.load(Ordering::SeqCst), 0);
        assert!(!guard.routes_ready());
    }

    #[tokio::test]
    async fn test_new_session_rebuilds_routes() {
        let backend = Arc::new(ScriptedBackend::signed_in());
        let guard = guard(backend.clone());

        assert!(guard.dispatch(&Location::parse("/rk/supply")).await.is_allowed());
        assert!(guard.routes_ready());

        backend.switch_session();
        assert!(!guard.routes_ready());

        assert!(guard.dispatch(&Location::parse("/rk/supply")).await.is_allowed());
        assert!(guard.routes_ready());
        assert_eq!(backend.hydrations.load(Ordering::SeqCst), 2);
        assert_eq!(guard.table().read().dynamic_routes().count(), 2);
    }

    #[tokio::test]
    async fn test_reset_removes_session_routes() {
        let backend = Arc::new(ScriptedBackend::signed_in());
        let guard = guard(backend);

        guard.dispatch(&Location::parse("/")).await;
        assert!(guard.routes_ready());

        guard.reset();
        assert!(!guard.routes_ready());
        assert_eq!(guard.table().read().dynamic_routes().count(), 0);
        assert_eq!(guard.table().read().len(), 4);
    }
}
