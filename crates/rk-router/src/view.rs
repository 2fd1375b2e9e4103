// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! View registry.
//!
//! Views are registered under keys such as `rk/supply` or `system/user/index`.
//! A menu entry is resolved to a view by key:
//!
//! 1. take `viewPath` if present, else the route path
//! 2. strip the leading `/` and any file extension
//! 3. try the key itself, then `<key>/index`
//!
//! Keys that match nothing resolve to [`ResolvedView::NotFound`], which
//! still instantiates (as a [`NotFoundView`]) so a route can always render.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

// =============================================================================
// View
// =============================================================================

/// A page the front end can show.
pub trait View: Send + Sync {
    /// Registry key of the view.
    fn key(&self) -> &str;

    /// One-line description for logs and terminals.
    fn describe(&self) -> String {
        self.key().to_string()
    }
}

/// Creates a view instance on demand.
pub type ViewFactory = Arc<dyn Fn() -> Box<dyn View> + Send + Sync>;

/// Shown for routes whose view key is not registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundView {
    key: String,
}

impl NotFoundView {
    /// Creates the sentinel for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl View for NotFoundView {
    fn key(&self) -> &str {
        &self.key
    }

    fn describe(&self) -> String {
        format!("view not found: {}", self.key)
    }
}

// =============================================================================
// ResolvedView
// =============================================================================

/// The lazy view reference stored on a route.
#[derive(Clone)]
pub enum ResolvedView {
    /// A registered view.
    Found {
        /// Key the view matched under.
        key: String,
        /// Factory producing the view.
        factory: ViewFactory,
    },
    /// Nothing registered under the requested key.
    NotFound {
        /// The normalized key that was looked up.
        key: String,
    },
}

impl ResolvedView {
    /// Returns `true` if a view was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Returns the key.
    pub fn key(&self) -> &str {
        match self {
            Self::Found { key, .. } | Self::NotFound { key } => key,
        }
    }

    /// Creates the view.
    pub fn instantiate(&self) -> Box<dyn View> {
        match self {
            Self::Found { factory, .. } => factory(),
            Self::NotFound { key } => Box::new(NotFoundView::new(key.clone())),
        }
    }
}

impl fmt::Debug for ResolvedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found { key, .. } => f.debug_struct("Found").field("key", key).finish(),
            Self::NotFound { key } => f.debug_struct("NotFound").field("key", key).finish(),
        }
    }
}

impl PartialEq for ResolvedView {
    fn eq(&self, other: &Self) -> bool {
        self.is_found() == other.is_found() && self.key() == other.key()
    }
}

// =============================================================================
// ViewRegistry
// =============================================================================

/// Maps view keys to factories.
#[derive(Default, Clone)]
pub struct ViewRegistry {
    factories: HashMap<String, ViewFactory>,
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.factories.keys().collect();
        keys.sort();
        f.debug_struct("ViewRegistry").field("keys", &keys).finish()
    }
}

impl ViewRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `key`. The key is normalized first.
    pub fn register<F>(&mut self, key: &str, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn View> + Send + Sync + 'static,
    {
        self.factories.insert(normalize_key(key), Arc::new(factory));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, key: &str, factory: F) -> Self
    where
        F: Fn() -> Box<dyn View> + Send + Sync + 'static,
    {
        self.register(key, factory);
        self
    }

    /// Returns `true` if `key` is registered exactly.
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(&normalize_key(key))
    }

    /// Number of registered views.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Resolves a view path or route path.
    pub fn resolve(&self, raw: &str) -> ResolvedView {
        let key = normalize_key(raw);
        if key.is_empty() {
            return ResolvedView::NotFound { key };
        }

        if let Some(factory) = self.factories.get(&key) {
            return ResolvedView::Found {
                key,
                factory: factory.clone(),
            };
        }

        let index = format!("{}/index", key);
        if let Some(factory) = self.factories.get(&index) {
            return ResolvedView::Found {
                key: index,
                factory: factory.clone(),
            };
        }

        debug!(key = %key, "No view registered");
        ResolvedView::NotFound { key }
    }
}

/// Normalizes a view key: no leading or trailing `/`, no file extension.
pub fn normalize_key(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('/').trim_end_matches('/');
    let without_ext = match trimmed.rfind('.') {
        Some(dot) if !trimmed[dot..].contains('/') => &trimmed[..dot],
        _ => trimmed,
    };
    without_ext.to_string()
}
