// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Router error types.

use rk_client::ClientError;
use thiserror::Error;

/// Result type alias for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors raised while navigating.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Redirects kept bouncing past the hop limit.
    #[error("Too many redirects navigating to {path} ({hops} hops)")]
    RedirectLoop {
        /// Originally requested path.
        path: String,
        /// Hops taken.
        hops: usize,
    },

    /// Error from the client layer.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl RouterError {
    /// Creates a redirect loop error.
    pub fn redirect_loop(path: impl Into<String>, hops: usize) -> Self {
        Self::RedirectLoop {
            path: path.into(),
            hops,
        }
    }

    /// Returns `true` if this is a redirect loop.
    pub fn is_redirect_loop(&self) -> bool {
        matches!(self, Self::RedirectLoop { .. })
    }

    /// Returns a message suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::RedirectLoop { .. } => "Navigation could not be completed".to_string(),
            Self::Client(e) => e.user_message(),
        }
    }
}
