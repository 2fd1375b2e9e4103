// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication payloads: credentials, token pairs, captcha and profile.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Login credentials.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
    /// Captcha id returned by the captcha endpoint.
    pub captcha_id: String,
    /// Captcha answer typed by the user.
    pub verify_code: String,
}

impl Credentials {
    /// Creates new credentials.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        captcha_id: impl Into<String>,
        verify_code: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            captcha_id: captcha_id.into(),
            verify_code: verify_code.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("captcha_id", &self.captcha_id)
            .field("verify_code", &self.verify_code)
            .finish()
    }
}

/// Access/refresh token pair issued by login and refresh.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Bearer access token.
    pub token: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expire: i64,
    /// Refresh token.
    pub refresh_token: String,
    /// Refresh token lifetime in seconds.
    #[serde(default)]
    pub refresh_expire: i64,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("token", &"<redacted>")
            .field("expire", &self.expire)
            .field("refresh_token", &"<redacted>")
            .field("refresh_expire", &self.refresh_expire)
            .finish()
    }
}

/// Captcha challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captcha {
    /// Id to send back with the login request.
    pub captcha_id: String,
    /// Image as a `data:image/png;base64,...` URI.
    pub data: String,
}

/// The current user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User id.
    pub id: i64,
    /// Account name.
    pub username: String,
    /// Real name.
    #[serde(default)]
    pub name: Option<String>,
    /// Nickname.
    #[serde(default)]
    pub nick_name: Option<String>,
    /// Department id.
    #[serde(default)]
    pub department_id: Option<i64>,
    /// Role ids.
    #[serde(default)]
    pub role_id_list: Vec<i64>,
    /// Explicit administrator claim, when the server sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
}

impl UserProfile {
    /// Returns the best available display name.
    pub fn display_name(&self) -> &str {
        self.nick_name
            .as_deref()
            .or(self.name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}
