// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the `rk` binary.

use rk_client::ClientError;
use rk_config::ConfigError;
use rk_router::RouterError;
use thiserror::Error;

/// Result type alias for rk-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the `rk` binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Initialization error.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Config parsing error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Client error.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Navigation error.
    #[error(transparent)]
    Router(#[from] RouterError),

    /// Error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// The context description.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Creates an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Adds context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Config(_) => 1,
            Self::Initialization(_) => 2,
            Self::Io(_) => 4,
            Self::Client(ClientError::NotAuthenticated) => 5,
            Self::Client(e) if e.is_auth_failure() => 5,
            Self::Client(e) if e.is_business() => 6,
            Self::Client(e) if e.is_transport() => 7,
            Self::Client(_) => 3,
            Self::Router(_) => 8,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }

    /// Returns a message suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(ClientError::NotAuthenticated) => {
                "Not logged in. Run `rk login` first.".to_string()
            }
            Self::Client(e) => e.user_message(),
            Self::Router(e) => e.user_message(),
            Self::Config(e) => e.user_message(),
            Self::WithContext { context, source } => {
                format!("{}: {}", context, source.user_message())
            }
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Reports an error with its cause chain.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {}", error.user_message());

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {}", cause);
        source = cause.source();
    }
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================
