// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route descriptors.

use rk_core::{Menu, MenuId};

use crate::location::normalize_path;
use crate::view::ResolvedView;

/// Where a route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOrigin {
    /// Built in (login, home, error pages). Survives logout.
    Static,
    /// Synthesized from a menu entry. Removed on logout.
    Dynamic,
}

/// A navigable route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDescriptor {
    /// Stable name, `menu-<id>` for synthesized routes.
    pub name: String,
    /// Normalized path.
    pub path: String,
    /// Display title.
    pub title: String,
    /// Lazy view reference.
    pub view: ResolvedView,
    /// Permission codes; all are required.
    pub permissions: Vec<String>,
    /// Keep the view alive when navigating away.
    pub keep_alive: bool,
    /// Originating menu entry.
    pub menu_id: Option<MenuId>,
    /// Origin.
    pub origin: RouteOrigin,
}

impl RouteDescriptor {
    /// A built-in route with no permission requirement.
    pub fn fixed(name: &str, path: &str, title: &str, view: ResolvedView) -> Self {
        Self {
            name: name.to_string(),
            path: normalize_path(path),
            title: title.to_string(),
            view,
            permissions: Vec::new(),
            keep_alive: false,
            menu_id: None,
            origin: RouteOrigin::Static,
        }
    }

    /// A route synthesized from a page menu entry.
    ///
    /// Returns `None` for entries that are not pages or have no path.
    pub fn from_menu(menu: &Menu, view: ResolvedView) -> Option<Self> {
        if !menu.is_navigable() {
            return None;
        }
        let path = menu.route_path()?;
        Some(Self {
            name: route_name(menu.id),
            path: normalize_path(path),
            title: menu.name.clone(),
            view,
            permissions: menu.permission_codes().into_iter().map(str::to_string).collect(),
            keep_alive: menu.keep_alive,
            menu_id: Some(menu.id),
            origin: RouteOrigin::Dynamic,
        })
    }

    /// Returns `true` for synthesized routes.
    pub fn is_dynamic(&self) -> bool {
        self.origin == RouteOrigin::Dynamic
    }
}

/// Route name for a menu entry.
pub fn route_name(id: MenuId) -> String {
    format!("menu-{}", id)
}
