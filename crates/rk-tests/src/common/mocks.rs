// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! In-process stand-ins for the auth server and the session-expired prompt.
//! Both record their interactions for verification.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rk_client::{AuthApi, ClientError, ClientResult, SessionExpiredPrompt};
use rk_core::{Captcha, Credentials, MenuRecord, TokenPair, UserProfile};

use crate::common::fixtures::{MenuFixtures, ProfileFixtures};

// =============================================================================
// MockAuthApi
// =============================================================================

/// A configurable auth server.
#[derive(Debug)]
pub struct MockAuthApi {
    profile: Mutex<UserProfile>,
    permissions: Mutex<Vec<String>>,
    menus: Mutex<Vec<MenuRecord>>,
    calls: Mutex<Vec<&'static str>>,
    fail_login: AtomicBool,
    fail_refresh: AtomicBool,
    fail_menus: AtomicBool,
    menus_delay: Mutex<Duration>,
    token_lifetime: Mutex<Option<i64>>,
    tokens_issued: AtomicUsize,
}

impl MockAuthApi {
    /// Alice with the RK menus and no permissions.
    pub fn new() -> Self {
        Self {
            profile: Mutex::new(ProfileFixtures::alice()),
            permissions: Mutex::new(Vec::new()),
            menus: Mutex::new(MenuFixtures::rk_records()),
            calls: Mutex::new(Vec::new()),
            fail_login: AtomicBool::new(false),
            fail_refresh: AtomicBool::new(false),
            fail_menus: AtomicBool::new(false),
            menus_delay: Mutex::new(Duration::ZERO),
            token_lifetime: Mutex::new(None),
            tokens_issued: AtomicUsize::new(0),
        }
    }

    /// Sets the profile returned by `profile`.
    pub fn with_profile(self, profile: UserProfile) -> Self {
        *self.profile.lock() = profile;
        self
    }

    /// Sets the granted permission codes.
    pub fn with_permissions<I, S>(self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.permissions.lock() = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the menu records.
    pub fn with_menus(self, menus: Vec<MenuRecord>) -> Self {
        *self.menus.lock() = menus;
        self
    }

    /// Delays the menu response, keeping hydration in flight.
    pub fn with_menus_delay(self, delay: Duration) -> Self {
        *self.menus_delay.lock() = delay;
        self
    }

    /// Overrides the lifetime, in seconds, of every issued token.
    pub fn with_token_lifetime(self, seconds: i64) -> Self {
        *self.token_lifetime.lock() = Some(seconds);
        self
    }

    /// Switches the user served from now on.
    pub fn set_profile(&self, profile: UserProfile) {
        *self.profile.lock() = profile;
    }

    /// Switches the menu records served from now on.
    pub fn set_menus(&self, menus: Vec<MenuRecord>) {
        *self.menus.lock() = menus;
    }

    /// Makes `login` fail with a business error.
    pub fn fail_login(&self, fail: bool) {
        self.fail_login.store(fail, Ordering::SeqCst);
    }

    /// Makes `refresh` fail with 401.
    pub fn fail_refresh(&self, fail: bool) {
        self.fail_refresh.store(fail, Ordering::SeqCst);
    }

    /// Makes `menus` fail with a transport error.
    pub fn fail_menus(&self, fail: bool) {
        self.fail_menus.store(fail, Ordering::SeqCst);
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    /// Number of calls to `name`.
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|c| **c == name).count()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().push(call);
    }

    fn issue(&self) -> TokenPair {
        let n = self.tokens_issued.fetch_add(1, Ordering::SeqCst) + 1;
        let mut pair = ProfileFixtures::token_pair(&format!("token-{}", n));
        if let Some(seconds) = *self.token_lifetime.lock() {
            pair.expire = seconds;
            pair.refresh_expire = seconds;
        }
        pair
    }
}

impl Default for MockAuthApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn captcha(&self) -> ClientResult<Captcha> {
        self.record("captcha");
        Ok(Captcha {
            captcha_id: "captcha-1".to_string(),
            data: "data:image/png;base64,aGk=".to_string(),
        })
    }

    async fn login(&self, _credentials: &Credentials) -> ClientResult<TokenPair> {
        self.record("login");
        if self.fail_login.load(Ordering::SeqCst) {
            return Err(ClientError::business(1001, "验证码不正确"));
        }
        Ok(self.issue())
    }

    async fn refresh(&self, _refresh_token: &str) -> ClientResult<TokenPair> {
        self.record("refresh");
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(ClientError::AuthenticationFailed { status: 401 });
        }
        Ok(self.issue())
    }

    async fn profile(&self, _token: &str) -> ClientResult<UserProfile> {
        self.record("profile");
        Ok(self.profile.lock().clone())
    }

    async fn permissions(&self) -> ClientResult<Vec<String>> {
        self.record("permissions");
        Ok(self.permissions.lock().clone())
    }

    async fn menus(&self) -> ClientResult<Vec<MenuRecord>> {
        self.record("menus");
        let delay = *self.menus_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_menus.load(Ordering::SeqCst) {
            return Err(ClientError::transport("connection reset"));
        }
        Ok(self.menus.lock().clone())
    }

    async fn logout(&self, _token: &str) -> ClientResult<()> {
        self.record("logout");
        Ok(())
    }
}

// =============================================================================
// CountingPrompt
// =============================================================================

/// Counts session-expired prompts.
///
/// An optional delay models a user taking time to acknowledge, which keeps
/// the auth failure gate held while other requests fail.
#[derive(Debug, Default)]
pub struct CountingPrompt {
    shown: AtomicUsize,
    delay: Duration,
    messages: Mutex<Vec<String>>,
}

impl CountingPrompt {
    /// Creates a prompt that returns immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a prompt that waits `delay` before returning.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Number of prompts shown.
    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }

    /// Messages shown, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl SessionExpiredPrompt for CountingPrompt {
    async fn session_expired(&self, message: &str) {
        self.shown.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().push(message.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
