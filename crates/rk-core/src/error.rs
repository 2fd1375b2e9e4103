// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for rk-core.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the core domain layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A menu type discriminant outside `{0, 1, 2}`.
    #[error("Invalid menu type: {value}")]
    InvalidMenuType {
        /// The rejected discriminant.
        value: u8,
    },

    /// The server answered with a non-success application code.
    #[error("Business error {code}: {message}")]
    Business {
        /// Application code from the envelope.
        code: i64,
        /// Server-supplied message.
        message: String,
    },

    /// A payload could not be converted into the expected type.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

impl CoreError {
    /// Creates a business error.
    pub fn business(code: i64, message: impl Into<String>) -> Self {
        Self::Business {
            code,
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns the application code for business errors.
    pub fn business_code(&self) -> Option<i64> {
        match self {
            Self::Business { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
