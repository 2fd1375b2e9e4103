// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The authenticated session and its persisted form.
//!
//! A [`Session`] always carries both tokens and a profile. There is no
//! half-populated state: login assembles the whole value before it is
//! committed, and restore refuses persisted data that lacks a profile.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::menu::MenuTree;
use crate::permission::{AdminPolicy, PermissionEvaluator, PermissionSet};
use crate::profile::{TokenPair, UserProfile};

// =============================================================================
// SessionTokens
// =============================================================================

/// Access and refresh tokens with absolute expiry instants.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// When the access token expires. `None` if the server sent no lifetime.
    #[serde(default)]
    pub access_expires_at: Option<DateTime<Utc>>,
    /// When the refresh token expires.
    #[serde(default)]
    pub refresh_expires_at: Option<DateTime<Utc>>,
}

impl SessionTokens {
    /// Converts a server token pair, anchoring lifetimes at `now`.
    pub fn from_pair(pair: &TokenPair, now: DateTime<Utc>) -> Self {
        // Lifetimes past the representable range mean no expiry.
        let expiry = |seconds: i64| {
            (seconds > 0)
                .then(|| Duration::try_seconds(seconds))
                .flatten()
                .and_then(|lifetime| now.checked_add_signed(lifetime))
        };
        Self {
            access_token: pair.token.clone(),
            refresh_token: pair.refresh_token.clone(),
            access_expires_at: expiry(pair.expire),
            refresh_expires_at: expiry(pair.refresh_expire),
        }
    }

    /// Returns `true` if the access token is expired or will be within `skew`.
    pub fn access_expired(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        self.access_expires_at
            .map(|at| now.checked_add_signed(skew).map_or(true, |edge| edge >= at))
            .unwrap_or(false)
    }

    /// Returns `true` if the refresh token is past its expiry.
    pub fn refresh_expired(&self, now: DateTime<Utc>) -> bool {
        self.refresh_expires_at.map(|at| now >= at).unwrap_or(false)
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish()
    }
}

// =============================================================================
// Session
// =============================================================================

/// An authenticated session.
///
/// The granted permission set and the menu tree are filled in by hydration
/// and are never persisted; a restored session starts without them.
#[derive(Debug, Clone)]
pub struct Session {
    tokens: SessionTokens,
    profile: UserProfile,
    permissions: Option<Arc<PermissionSet>>,
    menus: Option<MenuTree>,
}

impl Session {
    /// Creates a session from tokens and a profile.
    pub fn new(tokens: SessionTokens, profile: UserProfile) -> Self {
        Self {
            tokens,
            profile,
            permissions: None,
            menus: None,
        }
    }

    /// Returns the tokens.
    pub fn tokens(&self) -> &SessionTokens {
        &self.tokens
    }

    /// Returns the bearer token.
    pub fn access_token(&self) -> &str {
        &self.tokens.access_token
    }

    /// Returns the refresh token.
    pub fn refresh_token(&self) -> &str {
        &self.tokens.refresh_token
    }

    /// Returns the profile.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Returns the user id.
    pub fn user_id(&self) -> i64 {
        self.profile.id
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &str {
        self.profile.display_name()
    }

    /// Returns the granted permissions, if hydrated.
    pub fn permissions(&self) -> Option<&Arc<PermissionSet>> {
        self.permissions.as_ref()
    }

    /// Returns the menu tree, if hydrated.
    pub fn menus(&self) -> Option<&MenuTree> {
        self.menus.as_ref()
    }

    /// Returns `true` once permissions have been loaded.
    pub fn is_hydrated(&self) -> bool {
        self.permissions.is_some()
    }

    /// Replaces the tokens (after a refresh).
    pub fn replace_tokens(&mut self, tokens: SessionTokens) {
        self.tokens = tokens;
    }

    /// Replaces the profile.
    pub fn replace_profile(&mut self, profile: UserProfile) {
        self.profile = profile;
    }

    /// Installs the granted permission set.
    pub fn set_permissions(&mut self, permissions: PermissionSet) {
        self.permissions = Some(Arc::new(permissions));
    }

    /// Installs the menu tree.
    pub fn set_menus(&mut self, menus: MenuTree) {
        self.menus = Some(menus);
    }

    /// Builds the permission evaluator for this session.
    ///
    /// The administrator flag is derived from the profile on every call.
    pub fn evaluator(&self, policy: &AdminPolicy) -> PermissionEvaluator {
        let granted = self.permissions.clone().unwrap_or_default();
        PermissionEvaluator::new(granted, policy.is_admin(&self.profile))
    }

    /// Converts to the persisted form.
    pub fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            tokens: Some(self.tokens.clone()),
            profile: Some(self.profile.clone()),
        }
    }
}

// =============================================================================
// PersistedSession
// =============================================================================

/// What is written to session storage.
///
/// Both fields are optional on disk so that partial or legacy files still
/// parse; [`PersistedSession::into_session`] enforces the pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    /// Stored tokens.
    #[serde(default)]
    pub tokens: Option<SessionTokens>,
    /// Stored profile.
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

impl PersistedSession {
    /// Returns a session if both tokens and profile are present.
    pub fn into_session(self) -> Option<Session> {
        match (self.tokens, self.profile) {
            (Some(tokens), Some(profile)) if !tokens.access_token.is_empty() => {
                Some(Session::new(tokens, profile))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair {
            token: "access".to_string(),
            expire: 7200,
            refresh_token: "refresh".to_string(),
            refresh_expire: 0,
        }
    }

    fn profile(admin: Option<bool>) -> UserProfile {
        UserProfile {
            id: 42,
            username: "alice".to_string(),
            name: Some("Alice".to_string()),
            nick_name: None,
            department_id: Some(3),
            role_id_list: vec![2],
            admin,
        }
    }

    #[test]
    fn test_tokens_from_pair() {
        let now = Utc::now();
        let tokens = SessionTokens::from_pair(&pair(), now);

        assert_eq!(tokens.access_expires_at, Some(now + Duration::seconds(7200)));
        assert!(tokens.refresh_expires_at.is_none());
        assert!(!tokens.access_expired(now, Duration::seconds(60)));
        assert!(tokens.access_expired(now + Duration::seconds(7150), Duration::seconds(60)));
        assert!(!tokens.refresh_expired(now + Duration::days(365)));
    }

    #[test]
    fn test_tokens_oversized_lifetime_never_expires() {
        let now = Utc::now();
        let pair = TokenPair {
            expire: i64::MAX,
            refresh_expire: i64::MAX / 2,
            ..pair()
        };

        let tokens = SessionTokens::from_pair(&pair, now);

        assert!(tokens.access_expires_at.is_none());
        assert!(tokens.refresh_expires_at.is_none());
        assert!(!tokens.access_expired(now, Duration::seconds(60)));
        assert!(!tokens.refresh_expired(now + Duration::days(365)));
    }

    #[test]
    fn test_access_expired_with_oversized_skew() {
        let now = Utc::now();
        let tokens = SessionTokens::from_pair(&pair(), now);
        assert!(tokens.access_expired(now, Duration::days(1_000_000_000)));
    }

    #[test]
    fn test_session_evaluator() {
        let tokens = SessionTokens::from_pair(&pair(), Utc::now());
        let mut session = Session::new(tokens, profile(None));
        assert!(!session.is_hydrated());

        let policy = AdminPolicy::default();
        assert!(!session.evaluator(&policy).has_permission("rk:vendor:page"));

        session.set_permissions(PermissionSet::from_codes(["rk:vendor:page"]));
        assert!(session.is_hydrated());
        assert!(session.evaluator(&policy).has_permission("rk:vendor:page"));

        session.replace_profile(profile(Some(true)));
        assert!(session.evaluator(&policy).has_permission("anything"));
    }

    #[test]
    fn test_persisted_requires_profile() {
        let tokens = SessionTokens::from_pair(&pair(), Utc::now());

        let orphan = PersistedSession {
            tokens: Some(tokens.clone()),
            profile: None,
        };
        assert!(orphan.into_session().is_none());

        let session = Session::new(tokens, profile(None));
        let json = serde_json::to_string(&session.to_persisted()).unwrap();
        let back: PersistedSession = serde_json::from_str(&json).unwrap();
        let restored = back.into_session().unwrap();
        assert_eq!(restored.access_token(), "access");
        assert!(!restored.is_hydrated());
    }
}
