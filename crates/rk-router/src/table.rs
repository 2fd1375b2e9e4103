// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The route table.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use crate::config::RouterConfig;
use crate::location::normalize_path;
use crate::route::RouteDescriptor;
use crate::view::ViewRegistry;

/// Why a route was not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The route was added.
    Added,
    /// A route with the same name exists.
    DuplicateName,
    /// A route with the same path exists.
    DuplicatePath,
}

/// Registered routes, keyed by name and by path.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, RouteDescriptor>,
    by_path: HashMap<String, String>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding the built-in routes.
    ///
    /// Their views resolve under `login`, `home`, `error/403` and `error/404`.
    pub fn with_fixed_routes(config: &RouterConfig, views: &ViewRegistry) -> Self {
        let mut table = Self::new();
        let fixed = [
            ("login", &config.login_path, "Login", "login"),
            ("home", &config.home_path, "Home", "home"),
            ("forbidden", &config.forbidden_path, "Forbidden", "error/403"),
            ("not-found", &config.not_found_path, "Not Found", "error/404"),
        ];
        for (name, path, title, key) in fixed {
            table.register(RouteDescriptor::fixed(name, path, title, views.resolve(key)));
        }
        table
    }

    /// Adds a route unless its name or path is already taken.
    pub fn register(&mut self, route: RouteDescriptor) -> Registration {
        if self.routes.contains_key(&route.name) {
            return Registration::DuplicateName;
        }
        if self.by_path.contains_key(&route.path) {
            debug!(name = %route.name, path = %route.path, "Route path already registered");
            return Registration::DuplicatePath;
        }
        self.by_path.insert(route.path.clone(), route.name.clone());
        self.routes.insert(route.name.clone(), route);
        Registration::Added
    }

    /// Looks a route up by path.
    pub fn match_path(&self, path: &str) -> Option<&RouteDescriptor> {
        self.by_path
            .get(&normalize_path(path))
            .and_then(|name| self.routes.get(name))
    }

    /// Looks a route up by name.
    pub fn get(&self, name: &str) -> Option<&RouteDescriptor> {
        self.routes.get(name)
    }

    /// Removes every synthesized route, returning how many were removed.
    pub fn deregister_dynamic(&mut self) -> usize {
        let before = self.routes.len();
        self.routes.retain(|_, route| !route.is_dynamic());
        let routes = &self.routes;
        self.by_path.retain(|_, name| routes.contains_key(name));
        let removed = before - self.routes.len();
        if removed > 0 {
            info!(removed, "Dynamic routes deregistered");
        }
        removed
    }

    /// Iterates over routes in name order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.values()
    }

    /// Iterates over synthesized routes.
    pub fn dynamic_routes(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.values().filter(|r| r.is_dynamic())
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
