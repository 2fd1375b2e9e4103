// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// =============================================================================
// ClientConfig
// =============================================================================

/// Configuration for the HTTP client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API base URL, including the version prefix.
    pub base_url: String,
    /// Per-request timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api/v1".to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("rk-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

// =============================================================================
// EndpointConfig
// =============================================================================

/// Auth and RBAC endpoint paths, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Captcha image.
    pub captcha: String,
    /// Credential login.
    pub login: String,
    /// Token refresh.
    pub refresh: String,
    /// Server-side logout.
    pub logout: String,
    /// Current user profile.
    pub profile: String,
    /// Granted permission codes.
    pub permissions: String,
    /// Menu list.
    pub menus: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            captcha: "/auth/captcha".to_string(),
            login: "/auth/login".to_string(),
            refresh: "/auth/refresh-token".to_string(),
            logout: "/auth/logout".to_string(),
            profile: "/auth/me".to_string(),
            permissions: "/rbac/perms".to_string(),
            menus: "/rbac/menus".to_string(),
        }
    }
}

// =============================================================================
// SessionConfig
// =============================================================================

/// Where the session is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// JSON file on disk.
    #[default]
    File,
    /// Process memory only.
    Memory,
}

/// Session persistence and refresh settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Storage backend.
    pub storage: StorageKind,
    /// Session file path. Defaults to the user data directory.
    pub path: Option<PathBuf>,
    /// Refresh the access token before hydration when it has expired.
    pub auto_refresh: bool,
    /// How early an access token counts as expired.
    #[serde(with = "humantime_serde")]
    pub refresh_skew: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::File,
            path: None,
            auto_refresh: true,
            refresh_skew: Duration::from_secs(60),
        }
    }
}

impl SessionConfig {
    /// In-memory session configuration.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageKind::Memory,
            ..Self::default()
        }
    }

    /// Returns the session file path, falling back to the data directory.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_session_path)
    }
}

/// Default location of the session file.
pub fn default_session_path() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rk")
        .join("session.json")
}
