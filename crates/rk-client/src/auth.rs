// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Auth and RBAC endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use rk_core::{Captcha, Credentials, MenuRecord, TokenPair, UserProfile};
use serde::Serialize;
use serde_json::Value;

use crate::config::EndpointConfig;
use crate::error::ClientResult;
use crate::http::{Bearer, HttpClient};

/// The server calls the session store depends on.
///
/// `profile` and `logout` take the token explicitly so they can run before a
/// session is committed or after it has been cleared.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Fetches a captcha challenge.
    async fn captcha(&self) -> ClientResult<Captcha>;

    /// Exchanges credentials for a token pair.
    async fn login(&self, credentials: &Credentials) -> ClientResult<TokenPair>;

    /// Exchanges a refresh token for a new token pair.
    async fn refresh(&self, refresh_token: &str) -> ClientResult<TokenPair>;

    /// Fetches the profile belonging to `token`.
    async fn profile(&self, token: &str) -> ClientResult<UserProfile>;

    /// Fetches the current session's permission codes.
    async fn permissions(&self) -> ClientResult<Vec<String>>;

    /// Fetches the current session's menus, flat or nested.
    async fn menus(&self) -> ClientResult<Vec<MenuRecord>>;

    /// Invalidates `token` on the server.
    async fn logout(&self, token: &str) -> ClientResult<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct CaptchaQuery {
    #[serde(rename = "type")]
    kind: &'static str,
    width: u32,
    height: u32,
}

/// [`AuthApi`] over [`HttpClient`].
#[derive(Debug)]
pub struct HttpAuthApi {
    http: Arc<HttpClient>,
    endpoints: EndpointConfig,
}

impl HttpAuthApi {
    /// Creates the API wrapper.
    pub fn new(http: Arc<HttpClient>, endpoints: EndpointConfig) -> Self {
        Self { http, endpoints }
    }

    /// Returns the underlying client.
    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn captcha(&self) -> ClientResult<Captcha> {
        let query = CaptchaQuery {
            kind: "base64",
            width: 150,
            height: 45,
        };
        self.http.get_query(&self.endpoints.captcha, &query).await
    }

    async fn login(&self, credentials: &Credentials) -> ClientResult<TokenPair> {
        self.http
            .send(Method::POST, &self.endpoints.login, Some(credentials), Bearer::None)
            .await
    }

    async fn refresh(&self, refresh_token: &str) -> ClientResult<TokenPair> {
        let body = RefreshRequest { refresh_token };
        self.http
            .send(Method::POST, &self.endpoints.refresh, Some(&body), Bearer::None)
            .await
    }

    async fn profile(&self, token: &str) -> ClientResult<UserProfile> {
        self.http
            .send(Method::GET, &self.endpoints.profile, None::<&()>, Bearer::Explicit(token))
            .await
    }

    async fn permissions(&self) -> ClientResult<Vec<String>> {
        self.http.get(&self.endpoints.permissions).await
    }

    async fn menus(&self) -> ClientResult<Vec<MenuRecord>> {
        self.http.get(&self.endpoints.menus).await
    }

    async fn logout(&self, token: &str) -> ClientResult<()> {
        self.http
            .send::<_, Value>(
                Method::POST,
                &self.endpoints.logout,
                Some(&Value::Object(Default::default())),
                Bearer::Explicit(token),
            )
            .await
            .map(|_| ())
    }
}
