// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client error types.
//!
//! The taxonomy follows how the caller has to react:
//!
//! - transport failures are surfaced without retry
//! - authentication failures (HTTP 401/403) have already triggered the
//!   session-expired flow by the time the caller sees them
//! - business failures carry the server message verbatim
//! - hydration failures are fatal for the session

use rk_core::CoreError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

// =============================================================================
// ClientError
// =============================================================================

/// Errors raised by the HTTP client and the session store.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("Transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The server rejected the credentials or the session (401/403).
    #[error("Authentication failed (HTTP {status})")]
    AuthenticationFailed {
        /// HTTP status code.
        status: u16,
    },

    /// A non-success HTTP status without a readable envelope.
    #[error("Unexpected HTTP status {status}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The envelope carried a non-success application code.
    #[error("Business error {code}: {message}")]
    Business {
        /// Application code.
        code: i64,
        /// Server message.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Decode error: {message}")]
    Decode {
        /// Error message.
        message: String,
    },

    /// Session persistence failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Error message.
        message: String,
    },

    /// An operation needed a session and there is none.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Loading profile, permissions or menus failed.
    #[error("Hydration failed: {message}")]
    Hydration {
        /// Error message.
        message: String,
    },

    /// Client construction failed.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },
}

impl ClientError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a business error.
    pub fn business(code: i64, message: impl Into<String>) -> Self {
        Self::Business {
            code,
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a hydration error.
    pub fn hydration(message: impl Into<String>) -> Self {
        Self::Hydration {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Returns `true` for 401/403 failures.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// Returns `true` for transport-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout | Self::HttpStatus { .. })
    }

    /// Returns `true` for non-success envelope codes.
    pub fn is_business(&self) -> bool {
        matches!(self, Self::Business { .. })
    }

    /// Returns the application code, if any.
    pub fn business_code(&self) -> Option<i64> {
        match self {
            Self::Business { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns a message suitable for end users.
    ///
    /// Business errors show the server message unchanged.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { .. } | Self::HttpStatus { .. } => {
                "Unable to reach the server".to_string()
            }
            Self::Timeout => "The server did not respond in time".to_string(),
            Self::AuthenticationFailed { .. } => {
                "Your session has expired, please sign in again".to_string()
            }
            Self::Business { message, .. } => message.clone(),
            Self::Decode { .. } => "The server returned an unexpected response".to_string(),
            Self::Storage { .. } => "Unable to save the session locally".to_string(),
            Self::NotAuthenticated => "Please sign in first".to_string(),
            Self::Hydration { .. } => "Unable to load your account, please sign in again".to_string(),
            Self::Config { message } => message.clone(),
        }
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Business { code, message } => Self::Business { code, message },
            other => Self::decode(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}
