// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema for the RK console.
//!
//! Every section is optional in the file; missing sections take their
//! defaults. The client-facing sections reuse the types their crates
//! already consume, so a loaded [`RkConfig`] plugs straight into
//! `rk_client::ClientContext::build`.
//!
//! ```yaml
//! api:
//!   base_url: "https://rk.example.com/api/v1"
//!   request_timeout: 15s
//! session:
//!   storage: file
//!   refresh_skew: 2m
//! admin:
//!   usernames: [admin]
//! routes:
//!   home_path: /dashboard
//! logging:
//!   level: debug
//!   format: json
//! ```

use rk_client::{ClientConfig, EndpointConfig, SessionConfig};
use rk_core::AdminPolicy;
use rk_router::RouterConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Root Configuration
// =============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RkConfig {
    /// HTTP client settings.
    pub api: ClientConfig,
    /// Auth and RBAC endpoint paths.
    pub endpoints: EndpointConfig,
    /// Session persistence and refresh.
    pub session: SessionConfig,
    /// Administrator detection.
    pub admin: AdminPolicy,
    /// Fixed route paths.
    pub routes: RouterConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl RkConfig {
    /// Validates the whole configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.validate_api()?;
        self.validate_endpoints()?;
        self.validate_routes()?;
        self.logging.validate()
    }

    fn validate_api(&self) -> ConfigResult<()> {
        let base = self.api.base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::validation("api.base_url", "must not be empty"));
        }
        let parsed = url::Url::parse(base)
            .map_err(|e| ConfigError::validation("api.base_url", e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::validation(
                "api.base_url",
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }
        if self.api.request_timeout.is_zero() {
            return Err(ConfigError::validation(
                "api.request_timeout",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    fn validate_endpoints(&self) -> ConfigResult<()> {
        let e = &self.endpoints;
        for (field, value) in [
            ("endpoints.captcha", &e.captcha),
            ("endpoints.login", &e.login),
            ("endpoints.refresh", &e.refresh),
            ("endpoints.logout", &e.logout),
            ("endpoints.profile", &e.profile),
            ("endpoints.permissions", &e.permissions),
            ("endpoints.menus", &e.menus),
        ] {
            require_absolute(field, value)?;
        }
        Ok(())
    }

    fn validate_routes(&self) -> ConfigResult<()> {
        let r = &self.routes;
        require_absolute("routes.login_path", &r.login_path)?;
        require_absolute("routes.home_path", &r.home_path)?;
        require_absolute("routes.forbidden_path", &r.forbidden_path)?;
        require_absolute("routes.not_found_path", &r.not_found_path)?;
        for (i, path) in r.public_paths.iter().enumerate() {
            require_absolute(&format!("routes.public_paths[{}]", i), path)?;
        }

        if r.home_path == r.login_path {
            return Err(ConfigError::validation(
                "routes.home_path",
                "must differ from routes.login_path",
            ));
        }
        if r.redirect_param.trim().is_empty() {
            return Err(ConfigError::validation("routes.redirect_param", "must not be empty"));
        }
        Ok(())
    }
}

fn require_absolute(field: &str, value: &str) -> ConfigResult<()> {
    if value.starts_with('/') {
        Ok(())
    } else {
        Err(ConfigError::validation(field, "must start with '/'"))
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: LogLevel,

    /// Log format.
    pub format: LogFormat,

    /// Extra `EnvFilter` directives, e.g. `rk_router=trace`.
    pub filter: Option<String>,
}

impl LoggingConfig {
    /// Validates the logging configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(filter) = &self.filter {
            if filter.trim().is_empty() {
                return Err(ConfigError::validation("logging.filter", "must not be blank"));
            }
        }
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as an `EnvFilter` directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name. Accepts `warning` for `warn`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Compact single-line format.
    Compact,
    /// JSON lines.
    Json,
}

impl LogFormat {
    /// Parses a format name. Accepts `pretty` for `text`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "compact" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_is_valid() {
        RkConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let mut config = RkConfig::default();
        config.api.base_url = "not a url".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api.base_url"));

        config.api.base_url = "ftp://rk.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = RkConfig::default();
        config.api.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_relative_paths() {
        let mut config = RkConfig::default();
        config.endpoints.menus = "rbac/menus".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "endpoints.menus"));

        let mut config = RkConfig::default();
        config.routes.public_paths.push("about".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_home_must_differ_from_login() {
        let mut config = RkConfig::default();
        config.routes.home_path = config.routes.login_path.clone();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "routes.home_path"));
    }

    #[test]
    fn test_blank_redirect_param() {
        let mut config = RkConfig::default();
        config.routes.redirect_param = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Text));
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("xml"), None);
    }
}
