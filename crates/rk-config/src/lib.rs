// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # rk-config
//!
//! Configuration management for the RK recruiting console.
//!
//! - **Schema**: [`RkConfig`] with defaults for every section and `validate()`
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `${VAR:default}` placeholders and `RK_*` variables
//!
//! ## Quick Start
//!
//! ```no_run
//! use rk_config::loader::load_config;
//!
//! let config = load_config("rk.yaml").unwrap();
//! println!("API: {}", config.api.base_url);
//! println!("Home: {}", config.routes.home_path);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{LogFormat, LogLevel, LoggingConfig, RkConfig};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
