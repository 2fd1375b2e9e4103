// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # rk-bin
//!
//! The `rk` command-line client.
//!
//! - CLI argument parsing with clap
//! - Logging initialization
//! - Application wiring: client stack, view registry, guard, navigator
//! - Command implementations
//!
//! ## Usage
//!
//! ```bash
//! rk captcha -o captcha.png
//! rk login -u alice --captcha-id <id> --verify-code <code>
//! rk menus
//! rk navigate /rk/supply
//! rk list vendor --keyword acme
//! rk logout
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod app;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod views;

// =============================================================================
// Re-exports
// =============================================================================

pub use app::{resolve_config, App, ConsolePrompt};
pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use views::builtin_views;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
