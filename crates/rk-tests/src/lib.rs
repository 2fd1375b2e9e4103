// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # RK Integration Tests
//!
//! Cross-crate scenarios for the RK console client.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: menus, profiles, envelopes
//!   - `mocks`: `MockAuthApi`, `CountingPrompt`
//!   - `harness`: stack builders and test logging
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rk-tests
//! cargo test -p rk-tests --test integration_navigation
//! ```
//!
//! ## Test Suites
//!
//! - `integration_menu.rs`: tree building and ordering properties
//! - `integration_session.rs`: login, hydration, refresh, logout, persistence
//! - `integration_navigation.rs`: guard and navigator scenarios
//! - `integration_http.rs`: the full stack against a mock server
//! - `integration_config.rs`: configuration files end to end

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
}
