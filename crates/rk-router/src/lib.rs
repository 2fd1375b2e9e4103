// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # rk-router
//!
//! Menu-driven routing for the RK console client.
//!
//! The server decides which pages a user may see by returning a menu tree.
//! This crate turns that tree into routes and gates every navigation:
//!
//! - [`ViewRegistry`]: view key to view factory, with a typed not-found sentinel
//! - [`RouteSynthesizer`]: menu tree to [`RouteDescriptor`]s, idempotently
//! - [`NavigationGuard`]: authentication redirect, hydration, permission check
//! - [`Navigator`]: follows redirects and drops session routes on logout
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rk_router::{NavigationGuard, Navigator, RouteSynthesizer, RouterConfig, ViewRegistry};
//!
//! # async fn example(store: Arc<rk_client::SessionStore>) -> rk_router::RouterResult<()> {
//! let synthesizer = RouteSynthesizer::new(Arc::new(ViewRegistry::new()));
//! let guard = NavigationGuard::new(store.clone(), synthesizer, RouterConfig::default());
//! let navigator = Arc::new(Navigator::new(Arc::new(guard)));
//! navigator.spawn_event_listener(store.subscribe());
//!
//! let nav = navigator.navigate("/rk/supply").await?;
//! println!("now at {}", nav.location);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod guard;
pub mod location;
pub mod navigator;
pub mod route;
pub mod synthesizer;
pub mod table;
pub mod view;

pub use config::RouterConfig;
pub use error::{RouterError, RouterResult};
pub use guard::{GuardState, NavigationGuard, NavigationOutcome, RedirectReason, SessionBackend};
pub use location::Location;
pub use navigator::{Navigation, Navigator};
pub use route::{RouteDescriptor, RouteOrigin};
pub use synthesizer::{RouteSynthesizer, SynthesisReport};
pub use table::{Registration, RouteTable};
pub use view::{NotFoundView, ResolvedView, View, ViewFactory, ViewRegistry};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
