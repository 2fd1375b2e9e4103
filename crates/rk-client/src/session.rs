// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The session store.
//!
//! [`SessionStore`] owns the login/restore/refresh/logout lifecycle and
//! answers permission queries for the current session. It is the only
//! component that writes to the [`SessionCell`] outside the session-expired
//! flow.

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use rk_core::{
    AdminPolicy, Captcha, Credentials, MenuTree, PermissionEvaluator, PermissionSet, Session,
    SessionTokens,
};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::auth::AuthApi;
use crate::config::SessionConfig;
use crate::error::{ClientError, ClientResult};
use crate::events::{LogoutReason, SessionEvent, SessionEvents};
use crate::state::SessionCell;

// =============================================================================
// SessionStore
// =============================================================================

/// Session lifecycle and permission queries.
pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    cell: Arc<SessionCell>,
    events: SessionEvents,
    admin: AdminPolicy,
    auto_refresh: bool,
    refresh_skew: ChronoDuration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("cell", &self.cell)
            .field("admin", &self.admin)
            .finish()
    }
}

impl SessionStore {
    /// Creates a store.
    pub fn new(
        api: Arc<dyn AuthApi>,
        cell: Arc<SessionCell>,
        events: SessionEvents,
        admin: AdminPolicy,
    ) -> Self {
        Self {
            api,
            cell,
            events,
            admin,
            auto_refresh: false,
            refresh_skew: ChronoDuration::zero(),
        }
    }

    /// Applies refresh settings from the session configuration.
    pub fn with_session_config(mut self, config: &SessionConfig) -> Self {
        self.auto_refresh = config.auto_refresh;
        self.refresh_skew =
            ChronoDuration::from_std(config.refresh_skew).unwrap_or_else(|_| ChronoDuration::zero());
        self
    }

    /// Returns the shared cell.
    pub fn cell(&self) -> &Arc<SessionCell> {
        &self.cell
    }

    /// Returns the administrator policy.
    pub fn admin_policy(&self) -> &AdminPolicy {
        &self.admin
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Returns the event channel.
    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Fetches a captcha challenge for the login form.
    pub async fn fetch_captcha(&self) -> ClientResult<Captcha> {
        self.api.captcha().await
    }

    /// Logs in.
    ///
    /// The token pair and the profile are both fetched before anything is
    /// stored. On failure the previous state is left untouched.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<Session> {
        let pair = self.api.login(credentials).await?;
        let profile = self.api.profile(&pair.token).await?;

        let session = Session::new(SessionTokens::from_pair(&pair, Utc::now()), profile);
        self.cell.replace(session.clone());

        info!(user_id = session.user_id(), "Logged in");
        self.events.emit(SessionEvent::LoggedIn {
            user_id: session.user_id(),
            username: session.profile().username.clone(),
        });
        Ok(session)
    }

    /// Restores the persisted session without contacting the server.
    pub fn restore(&self) -> Option<Session> {
        self.cell.restore()
    }

    /// Logs out. Safe to call without a session.
    pub async fn logout(&self) {
        self.end_session(LogoutReason::UserRequested).await;
    }

    /// Destroys the session for `reason` and emits [`SessionEvent::LoggedOut`].
    ///
    /// The server is told about the logout when a token was present; a
    /// failure there is logged only.
    pub async fn end_session(&self, reason: LogoutReason) {
        let previous = self.cell.take();

        if let Some(session) = previous {
            if reason != LogoutReason::SessionExpired {
                if let Err(e) = self.api.logout(session.access_token()).await {
                    warn!(error = %e, "Server logout failed");
                }
            }
            info!(user_id = session.user_id(), reason = %reason, "Logged out");
        } else {
            debug!(reason = %reason, "Logout without a session");
        }

        self.events.emit(SessionEvent::LoggedOut { reason });
    }

    /// Exchanges the refresh token for a new pair.
    ///
    /// Any failure ends the session.
    pub async fn refresh(&self) -> ClientResult<()> {
        let refresh_token = self
            .cell
            .with(|s| s.map(|s| s.refresh_token().to_string()))
            .ok_or(ClientError::NotAuthenticated)?;

        let pair = match self.api.refresh(&refresh_token).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                self.end_session(LogoutReason::RefreshFailed).await;
                return Err(e);
            }
        };

        let tokens = SessionTokens::from_pair(&pair, Utc::now());
        if !self.cell.update(|s| s.replace_tokens(tokens)) {
            return Err(ClientError::NotAuthenticated);
        }

        debug!("Tokens refreshed");
        self.events.emit(SessionEvent::Refreshed);
        Ok(())
    }

    /// Refreshes when auto-refresh is on and the access token has expired.
    pub async fn ensure_fresh(&self) -> ClientResult<()> {
        if !self.auto_refresh {
            return Ok(());
        }
        let expired = self
            .cell
            .with(|s| s.map(|s| s.tokens().access_expired(Utc::now(), self.refresh_skew)))
            .ok_or(ClientError::NotAuthenticated)?;
        if expired {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Loads profile, permissions and menus, in that order.
    ///
    /// The permission set and the menu tree are installed on the session the
    /// call started with. If that session is replaced or ended meanwhile,
    /// nothing is installed and [`ClientError::NotAuthenticated`] is returned.
    /// Other errors are returned as-is; deciding whether to end the session
    /// is the caller's job.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> ClientResult<MenuTree> {
        self.ensure_fresh().await?;
        let generation = self.cell.generation();
        let token = self.cell.access_token().ok_or(ClientError::NotAuthenticated)?;

        let profile = self.api.profile(&token).await?;
        let codes = self.api.permissions().await?;
        let records = self.api.menus().await?;

        let permissions = PermissionSet::from_codes(&codes);
        let granted = permissions.len();
        let tree = MenuTree::from_records(records);
        let installed = self.cell.update_if(generation, |s| {
            s.replace_profile(profile);
            s.set_permissions(permissions);
            s.set_menus(tree.clone());
        });
        if !installed {
            return Err(ClientError::NotAuthenticated);
        }

        info!(permissions = granted, menus = tree.len(), "Session hydrated");
        Ok(tree)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns a copy of the current session.
    pub fn current(&self) -> Option<Session> {
        self.cell.get()
    }

    /// Returns `true` if a session is present.
    pub fn is_authenticated(&self) -> bool {
        self.cell.is_authenticated()
    }

    /// Returns `true` once the session has loaded its permissions.
    pub fn is_hydrated(&self) -> bool {
        self.cell.is_hydrated()
    }

    /// Returns the current session generation.
    pub fn generation(&self) -> u64 {
        self.cell.generation()
    }

    /// Returns the menu tree loaded by the current session's hydration.
    pub fn menus(&self) -> Option<MenuTree> {
        self.cell.with(|s| s.and_then(|s| s.menus().cloned()))
    }

    /// Returns `true` if the current profile is an administrator.
    pub fn is_admin(&self) -> bool {
        self.cell
            .with(|s| s.map(|s| self.admin.is_admin(s.profile())))
            .unwrap_or(false)
    }

    /// Returns an evaluator for the current session.
    pub fn evaluator(&self) -> PermissionEvaluator {
        self.cell
            .with(|s| s.map(|s| s.evaluator(&self.admin)))
            .unwrap_or_else(PermissionEvaluator::deny_all)
    }

    /// Single-code check.
    pub fn has_permission(&self, code: &str) -> bool {
        self.evaluator().has_permission(code)
    }

    /// Any-of check.
    pub fn has_any_permission<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        self.evaluator().has_any_permission(codes)
    }

    /// All-of check.
    pub fn has_all_permissions<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        self.evaluator().has_all_permissions(codes)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::{LogPrompt, SessionExpiry};
    use crate::storage::MemorySessionStorage;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use rk_core::{Menu, MenuRecord, MenuType, TokenPair, UserProfile};

    #[derive(Default)]
    struct FakeApi {
        fail_login: bool,
        fail_refresh: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().clone()
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().push(call);
        }
    }

    fn pair(token: &str) -> TokenPair {
        TokenPair {
            token: token.to_string(),
            expire: 7200,
            refresh_token: format!("{}-refresh", token),
            refresh_expire: 86400,
        }
    }

    #[async_trait]
    impl AuthApi for FakeApi {
        async fn captcha(&self) -> ClientResult<Captcha> {
            Ok(Captcha {
                captcha_id: "c".to_string(),
                data: String::new(),
            })
        }

        async fn login(&self, _credentials: &Credentials) -> ClientResult<TokenPair> {
            self.record("login");
            if self.fail_login {
                return Err(ClientError::business(1001, "验证码不正确"));
            }
            Ok(pair("t1"))
        }

        async fn refresh(&self, _refresh_token: &str) -> ClientResult<TokenPair> {
            self.record("refresh");
            if self.fail_refresh {
                return Err(ClientError::AuthenticationFailed { status: 401 });
            }
            Ok(pair("t2"))
        }

        async fn profile(&self, token: &str) -> ClientResult<UserProfile> {
            self.record("profile");
            Ok(UserProfile {
                id: 5,
                username: format!("user-{}", token),
                name: None,
                nick_name: None,
                department_id: None,
                role_id_list: vec![1],
                admin: None,
            })
        }

        async fn permissions(&self) -> ClientResult<Vec<String>> {
            self.record("permissions");
            Ok(vec!["rk:supply:page".to_string()])
        }

        async fn menus(&self) -> ClientResult<Vec<MenuRecord>> {
            self.record("menus");
            Ok(vec![Menu::new(1, None, "RK", MenuType::Directory).into()])
        }

        async fn logout(&self, _token: &str) -> ClientResult<()> {
            self.record("logout");
            Err(ClientError::transport("connection reset"))
        }
    }

    fn store(api: FakeApi) -> (SessionStore, Arc<FakeApi>, Arc<MemorySessionStorage>) {
        let api = Arc::new(api);
        let storage = Arc::new(MemorySessionStorage::new());
        let cell = Arc::new(SessionCell::new(storage.clone()));
        let store = SessionStore::new(api.clone(), cell, SessionEvents::default(), AdminPolicy::default());
        (store, api, storage)
    }

    fn creds() -> Credentials {
        Credentials::new("alice", "pw", "c", "1234")
    }

    #[tokio::test]
    async fn test_login_fetches_profile_with_new_token() {
        let (store, api, storage) = store(FakeApi::default());
        let mut rx = store.subscribe();

        let session = store.login(&creds()).await.unwrap();

        assert_eq!(session.profile().username, "user-t1");
        assert_eq!(api.calls(), vec!["login", "profile"]);
        assert!(storage.snapshot().is_some());
        assert!(matches!(rx.try_recv().unwrap(), SessionEvent::LoggedIn { user_id: 5, .. }));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_previous_state() {
        let (store, _, storage) = store(FakeApi {
            fail_login: true,
            ..FakeApi::default()
        });

        let err = store.login(&creds()).await.unwrap_err();
        assert_eq!(err.user_message(), "验证码不正确");
        assert!(!store.is_authenticated());
        assert!(storage.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent_and_tolerates_server_failure() {
        let (store, api, storage) = store(FakeApi::default());
        store.login(&creds()).await.unwrap();
        let mut rx = store.subscribe();

        store.logout().await;
        store.logout().await;

        assert!(!store.is_authenticated());
        assert!(storage.snapshot().is_none());
        assert_eq!(api.calls().iter().filter(|c| **c == "logout").count(), 1);
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::LoggedOut {
                reason: LogoutReason::UserRequested
            }
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_cascades_to_logout() {
        let (store, _, _) = store(FakeApi {
            fail_refresh: true,
            ..FakeApi::default()
        });
        store.login(&creds()).await.unwrap();
        let mut rx = store.subscribe();

        assert!(store.refresh().await.is_err());
        assert!(!store.is_authenticated());
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::LoggedOut {
                reason: LogoutReason::RefreshFailed
            }
        );
    }

    #[tokio::test]
    async fn test_refresh_replaces_tokens() {
        let (store, _, _) = store(FakeApi::default());
        store.login(&creds()).await.unwrap();

        store.refresh().await.unwrap();
        assert_eq!(store.current().unwrap().access_token(), "t2");
    }

    #[tokio::test]
    async fn test_hydrate_order_and_permissions() {
        let (store, api, _) = store(FakeApi::default());
        assert!(matches!(store.hydrate().await, Err(ClientError::NotAuthenticated)));

        store.login(&creds()).await.unwrap();
        assert!(!store.has_permission("rk:supply:page"));

        let tree = store.hydrate().await.unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(
            api.calls(),
            vec!["login", "profile", "profile", "permissions", "menus"]
        );
        assert!(store.is_hydrated());
        assert!(store.has_permission("rk:supply:page"));
        assert!(store.has_all_permissions::<&str>(&[]));
        assert!(!store.has_any_permission::<&str>(&[]));
        assert!(store.menus().is_some());
    }

    #[tokio::test]
    async fn test_expiry_flow_drops_menus() {
        let (store, _, _) = store(FakeApi::default());
        store.login(&creds()).await.unwrap();
        store.hydrate().await.unwrap();
        let hydrated = store.current().unwrap();
        assert!(hydrated.menus().is_some());

        let expiry = SessionExpiry::new(
            store.cell().clone(),
            store.events().clone(),
            Arc::new(LogPrompt),
        );
        assert!(expiry.handle(401).await);
        assert!(store.menus().is_none());

        // A session installed without going through login starts bare.
        store
            .cell()
            .replace(Session::new(hydrated.tokens().clone(), hydrated.profile().clone()));
        assert!(store.is_authenticated());
        assert!(store.menus().is_none());
        assert!(!store.is_hydrated());
    }

    #[tokio::test]
    async fn test_hydrate_skips_replaced_session() {
        let (store, _, _) = store(FakeApi::default());
        store.login(&creds()).await.unwrap();
        let stale = store.generation();

        store.login(&creds()).await.unwrap();
        assert_ne!(store.generation(), stale);
        assert!(!store
            .cell()
            .update_if(stale, |s| s.set_permissions(PermissionSet::from_codes(["rk:supply:page"]))));
        assert!(!store.has_permission("rk:supply:page"));

        store.hydrate().await.unwrap();
        assert!(store.has_permission("rk:supply:page"));
    }

    #[tokio::test]
    async fn test_username_admin_policy() {
        let api = Arc::new(FakeApi::default());
        let cell = Arc::new(SessionCell::new(Arc::new(MemorySessionStorage::new())));
        let store = SessionStore::new(
            api,
            cell,
            SessionEvents::default(),
            AdminPolicy::default().with_usernames(["user-t1"]),
        );

        assert!(!store.is_admin());
        store.login(&creds()).await.unwrap();
        assert!(store.is_admin());
        assert!(store.has_permission("sys:anything"));
    }
}
