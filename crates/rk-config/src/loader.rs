// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading for the RK console.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and pick the format from its extension
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw text
//! 3. Parse into [`RkConfig`]
//! 4. Apply `RK_*` environment overrides
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! RK_API_BASE_URL=https://rk.example.com/api/v1
//! RK_SESSION_PATH=/var/lib/rk/session.json
//! RK_SESSION_STORAGE=memory
//! RK_LOG_LEVEL=debug
//! RK_LOG_FORMAT=json
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{LogFormat, LogLevel, RkConfig};
use rk_client::StorageKind;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "RK";

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// # Examples
///
/// ```no_run
/// use rk_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("rk.yaml").unwrap();
/// println!("{}", config.api.base_url);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply overrides.
    resolve_env_vars: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Loads configuration from a file.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<RkConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;
        let mut config = self.parse_content(&content, format, path)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;

        debug!(
            base_url = %config.api.base_url,
            storage = ?config.session.storage,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<RkConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        };
        let mut config = parse_str(&content, format)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Builds the default configuration with overrides applied.
    ///
    /// Used when no config file is given.
    pub fn load_defaults(&self) -> ConfigResult<RkConfig> {
        let mut config = RkConfig::default();
        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    fn parse_content(
        &self,
        content: &str,
        format: ConfigFormat,
        path: &Path,
    ) -> ConfigResult<RkConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        };

        parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })
    }

    /// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
    ///
    /// An unset variable without a default is left in place.
    fn resolve_env_placeholders(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' || chars.peek() != Some(&'{') {
                result.push(c);
                continue;
            }
            chars.next();

            let mut var_content = String::new();
            let mut found_close = false;
            for c in chars.by_ref() {
                if c == '}' {
                    found_close = true;
                    break;
                }
                var_content.push(c);
            }

            if !found_close {
                result.push_str("${");
                result.push_str(&var_content);
                continue;
            }

            let (var_name, default_value) = match var_content.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (var_content.as_str(), None),
            };

            match (env::var(var_name), default_value) {
                (Ok(value), _) => result.push_str(&value),
                (Err(_), Some(default)) => result.push_str(default),
                (Err(_), None) => {
                    warn!(var = var_name, "Environment variable not found");
                    result.push_str(&format!("${{{}}}", var_name));
                }
            }
        }

        result
    }

    fn env_key(&self, suffix: &str) -> String {
        format!("{}_{}", self.env_prefix, suffix)
    }

    fn apply_env_overrides(&self, config: &mut RkConfig) -> ConfigResult<()> {
        if let Ok(value) = env::var(self.env_key("API_BASE_URL")) {
            config.api.base_url = value;
        }

        if let Ok(value) = env::var(self.env_key("SESSION_PATH")) {
            config.session.path = Some(PathBuf::from(value));
        }
        if let Ok(value) = env::var(self.env_key("SESSION_STORAGE")) {
            config.session.storage = match value.trim().to_lowercase().as_str() {
                "file" => StorageKind::File,
                "memory" => StorageKind::Memory,
                _ => {
                    return Err(ConfigError::invalid_env_var(
                        self.env_key("SESSION_STORAGE"),
                        "expected 'file' or 'memory'",
                    ))
                }
            };
        }
        if let Ok(value) = env::var(self.env_key("SESSION_AUTO_REFRESH")) {
            config.session.auto_refresh = parse_bool(&value);
        }

        if let Ok(value) = env::var(self.env_key("LOG_LEVEL")) {
            config.logging.level = LogLevel::parse(&value).ok_or_else(|| {
                ConfigError::invalid_env_var(self.env_key("LOG_LEVEL"), "expected a log level")
            })?;
        }
        if let Ok(value) = env::var(self.env_key("LOG_FORMAT")) {
            config.logging.format = LogFormat::parse(&value).ok_or_else(|| {
                ConfigError::invalid_env_var(
                    self.env_key("LOG_FORMAT"),
                    "expected 'text', 'compact' or 'json'",
                )
            })?;
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "enabled"
    )
}

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<RkConfig> {
    match format {
        ConfigFormat::Yaml => yaml_parse(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// YAML goes through the `config` crate.
fn yaml_parse<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<RkConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<RkConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::Builder;

    const YAML: &str = r#"
api:
  base_url: "https://rk.example.com/api/v1"
  request_timeout: 15s
session:
  storage: memory
  refresh_skew: 2m
admin:
  usernames:
    - admin
routes:
  home_path: /dashboard
logging:
  level: debug
  format: json
"#;

    // Each test gets its own prefix so parallel tests never see each other's
    // overrides.
    fn isolated(prefix: &str) -> ConfigLoader {
        ConfigLoader::new().with_env_prefix(prefix)
    }

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml() {
        let file = write_temp(".yaml", YAML);
        let config = isolated("RK_T_YAML").load(file.path()).unwrap();

        assert_eq!(config.api.base_url, "https://rk.example.com/api/v1");
        assert_eq!(config.api.request_timeout, Duration::from_secs(15));
        assert_eq!(config.session.storage, StorageKind::Memory);
        assert_eq!(config.session.refresh_skew, Duration::from_secs(120));
        assert_eq!(config.admin.usernames, vec!["admin".to_string()]);
        assert!(config.admin.honor_server_flag);
        assert_eq!(config.routes.home_path, "/dashboard");
        assert_eq!(config.routes.login_path, "/login");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_toml() {
        let toml = r#"
[api]
base_url = "http://10.0.0.5:8000/api/v1"

[endpoints]
menus = "/rbac/menus/mine"

[logging]
format = "compact"
"#;
        let file = write_temp(".toml", toml);
        let config = isolated("RK_T_TOML").load(file.path()).unwrap();

        assert_eq!(config.api.base_url, "http://10.0.0.5:8000/api/v1");
        assert_eq!(config.endpoints.menus, "/rbac/menus/mine");
        assert_eq!(config.endpoints.login, "/auth/login");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_load_json() {
        let json = r#"{"session": {"auto_refresh": false}}"#;
        let config = isolated("RK_T_JSON")
            .load_from_str(json, ConfigFormat::Json)
            .unwrap();
        assert!(!config.session.auto_refresh);
        assert_eq!(config.api, rk_client::ClientConfig::default());
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = isolated("RK_T_EMPTY")
            .load_from_str("", ConfigFormat::Yaml)
            .unwrap();
        assert_eq!(config, RkConfig::default());
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("rk.yml")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("rk.TOML")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("rk.json")).unwrap(), ConfigFormat::Json);
        assert!(ConfigFormat::from_path(Path::new("rk.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("rk")).is_err());
    }

    #[test]
    fn test_file_not_found() {
        let err = ConfigLoader::new().load("/nonexistent/rk.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let file = write_temp(".json", "{ not json");
        let err = isolated("RK_T_PARSE").load(file.path()).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validation_runs_after_load() {
        let err = isolated("RK_T_INVALID")
            .load_from_str("routes:\n  login_path: login\n", ConfigFormat::Yaml)
            .unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_env_placeholder_with_default() {
        let loader = ConfigLoader::new();
        let result = loader.resolve_env_placeholders("url: ${RK_T_SURELY_UNSET_VAR:http://localhost}");
        assert_eq!(result, "url: http://localhost");
    }

    #[test]
    fn test_env_placeholder_resolved() {
        env::set_var("RK_T_PLACEHOLDER_HOST", "rk.internal");
        let loader = ConfigLoader::new();
        let result = loader.resolve_env_placeholders("https://${RK_T_PLACEHOLDER_HOST:x}/api");
        assert_eq!(result, "https://rk.internal/api");
    }

    #[test]
    fn test_env_placeholder_unset_kept() {
        let loader = ConfigLoader::new();
        assert_eq!(
            loader.resolve_env_placeholders("a: ${RK_T_SURELY_UNSET_VAR}"),
            "a: ${RK_T_SURELY_UNSET_VAR}"
        );
        assert_eq!(loader.resolve_env_placeholders("a: ${open"), "a: ${open");
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("RK_T_OVR_API_BASE_URL", "https://override.example.com/api/v1");
        env::set_var("RK_T_OVR_SESSION_PATH", "/tmp/rk-session.json");
        env::set_var("RK_T_OVR_LOG_LEVEL", "warning");

        let config = isolated("RK_T_OVR")
            .load_from_str(YAML, ConfigFormat::Yaml)
            .unwrap();
        assert_eq!(config.api.base_url, "https://override.example.com/api/v1");
        assert_eq!(config.session.path, Some(PathBuf::from("/tmp/rk-session.json")));
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_invalid_env_override() {
        env::set_var("RK_T_BADENV_LOG_FORMAT", "xml");
        let err = isolated("RK_T_BADENV").load_defaults().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
    }

    #[test]
    fn test_env_vars_disabled() {
        env::set_var("RK_T_OFF_API_BASE_URL", "https://ignored.example.com");
        let config = isolated("RK_T_OFF").with_env_vars(false).load_defaults().unwrap();
        assert_eq!(config.api.base_url, rk_client::ClientConfig::default().base_url);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("ON"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("nope"));
    }
}
