// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Router configuration.

use serde::{Deserialize, Serialize};

use crate::location::normalize_path;

/// Fixed paths and public routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Login page.
    pub login_path: String,
    /// Landing page after login.
    pub home_path: String,
    /// Shown when a permission check fails.
    pub forbidden_path: String,
    /// Shown for unknown paths.
    pub not_found_path: String,
    /// Query parameter carrying the original target through login.
    pub redirect_param: String,
    /// Extra paths reachable without a session.
    pub public_paths: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            forbidden_path: "/403".to_string(),
            not_found_path: "/404".to_string(),
            redirect_param: "redirect".to_string(),
            public_paths: Vec::new(),
        }
    }
}

impl RouterConfig {
    /// Returns `true` if `path` needs no session.
    ///
    /// The login, forbidden and not-found pages are always public.
    pub fn is_public(&self, path: &str) -> bool {
        let path = normalize_path(path);
        [&self.login_path, &self.forbidden_path, &self.not_found_path]
            .into_iter()
            .chain(self.public_paths.iter())
            .any(|public| normalize_path(public) == path)
    }

    /// Returns `true` if `path` is the login page.
    pub fn is_login(&self, path: &str) -> bool {
        normalize_path(path) == normalize_path(&self.login_path)
    }

    /// Adds a public path.
    pub fn with_public_path(mut self, path: impl Into<String>) -> Self {
        self.public_paths.push(path.into());
        self
    }
}
