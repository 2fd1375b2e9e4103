// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Built-in terminal views.
//!
//! Every business module gets a view keyed by its endpoint prefix without
//! the leading slash (`rk/vendor`, `dict/type`, `rbac/users`), which is
//! what the server puts in a menu's `viewPath`.

use rk_client::ResourceKind;
use rk_router::{View, ViewRegistry};

/// A page backed by a business module, or a plain page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleView {
    key: String,
    title: &'static str,
    module: Option<ResourceKind>,
}

impl ConsoleView {
    fn page(key: &str, title: &'static str) -> Self {
        Self {
            key: key.to_string(),
            title,
            module: None,
        }
    }

    fn module(kind: ResourceKind) -> Self {
        Self {
            key: module_view_key(kind),
            title: kind.as_str(),
            module: Some(kind),
        }
    }

    /// The module this view lists, if any.
    pub fn resource(&self) -> Option<ResourceKind> {
        self.module
    }
}

impl View for ConsoleView {
    fn key(&self) -> &str {
        &self.key
    }

    fn describe(&self) -> String {
        match self.module {
            Some(kind) => format!("{} (try `rk list {}`)", self.title, kind),
            None => self.title.to_string(),
        }
    }
}

/// View key for a module.
pub fn module_view_key(kind: ResourceKind) -> String {
    kind.prefix().trim_start_matches('/').to_string()
}

/// Registry with the fixed pages and one view per module.
pub fn builtin_views() -> ViewRegistry {
    let mut registry = ViewRegistry::new()
        .with("login", || Box::new(ConsoleView::page("login", "Sign in")))
        .with("home", || Box::new(ConsoleView::page("home", "Home")))
        .with("error/403", || Box::new(ConsoleView::page("error/403", "Forbidden")))
        .with("error/404", || Box::new(ConsoleView::page("error/404", "Not found")));

    for kind in ResourceKind::ALL {
        registry.register(&module_view_key(kind), move || Box::new(ConsoleView::module(kind)));
    }
    registry
}
