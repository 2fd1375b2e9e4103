// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `captcha`: fetch a login captcha
//! - `login` / `logout` / `whoami`: session management
//! - `perms`, `menus`, `routes`: what the server grants the session
//! - `navigate`: run the navigation guard against a path
//! - `list`: page through a business module
//! - `version`: version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// RK recruiting console client.
#[derive(Parser, Debug)]
#[command(
    name = "rk",
    author = "Sylvex <contact@sylvex.io>",
    version = crate::VERSION,
    about = "Command-line client for the RK recruiting console",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path (YAML, TOML or JSON)
    #[arg(short, long, env = "RK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// API base URL, overriding the configuration
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fetch a login captcha
    Captcha(CaptchaArgs),

    /// Log in with username, password and captcha answer
    Login(LoginArgs),

    /// Show the signed-in user
    Whoami,

    /// List granted permission codes
    Perms,

    /// Show the menu tree granted to the session
    Menus(MenusArgs),

    /// Show the route table after hydration
    Routes,

    /// Navigate to a path through the guard
    Navigate(NavigateArgs),

    /// Page through a business module
    List(ListArgs),

    /// End the session
    Logout,

    /// Show version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `captcha` command.
#[derive(Args, Debug, Clone)]
pub struct CaptchaArgs {
    /// Write the captcha image to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `login` command.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account name
    #[arg(short, long)]
    pub username: String,

    /// Account password
    #[arg(short, long, env = "RK_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Captcha id from `rk captcha`
    #[arg(long)]
    pub captcha_id: String,

    /// Captcha answer
    #[arg(long)]
    pub verify_code: String,
}

/// Arguments for the `menus` command.
#[derive(Args, Debug, Clone)]
pub struct MenusArgs {
    /// Include hidden entries
    #[arg(short, long)]
    pub all: bool,
}

/// Arguments for the `navigate` command.
#[derive(Args, Debug, Clone)]
pub struct NavigateArgs {
    /// Target path, optionally with a query string
    pub path: String,
}

/// Arguments for the `list` command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Module name, e.g. `vendor`, `supply`, `dict-type`
    pub module: String,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Page size
    #[arg(long, default_value_t = 20)]
    pub size: u32,

    /// Keyword filter
    #[arg(short, long)]
    pub keyword: Option<String>,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<LogFormat> for rk_config::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Text => rk_config::LogFormat::Text,
            LogFormat::Json => rk_config::LogFormat::Json,
            LogFormat::Compact => rk_config::LogFormat::Compact,
        }
    }
}

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

// =============================================================================
// Tests
// =============================================================================
