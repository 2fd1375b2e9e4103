// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Menu records and the menu tree.
//!
//! The menu endpoint returns the menus granted to the current user's roles.
//! Depending on the backend this is either a flat list (each record carries
//! `parentId`) or an already-nested list (`childMenus`). Both shapes are
//! accepted: nested input is flattened pre-order and then rebuilt with the
//! shared tree builder, so ordering and orphan handling are identical.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::tree::{self, TreeNode, TreeRecord};

// =============================================================================
// MenuId
// =============================================================================

/// Numeric menu identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuId(pub i64);

impl MenuId {
    /// Creates a new menu id.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MenuId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

// =============================================================================
// MenuType
// =============================================================================

/// Kind of a menu entry.
///
/// Encoded on the wire as an integer: `0` directory, `1` page, `2`
/// permission-only marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MenuType {
    /// Groups other entries; never routable itself.
    #[default]
    Directory,
    /// A navigable page bound to a route.
    Page,
    /// Carries a permission code only (buttons, actions); never routable.
    Permission,
}

impl MenuType {
    /// Returns the wire discriminant.
    pub fn as_u8(self) -> u8 {
        match self {
            MenuType::Directory => 0,
            MenuType::Page => 1,
            MenuType::Permission => 2,
        }
    }

    /// Returns a lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            MenuType::Directory => "directory",
            MenuType::Page => "page",
            MenuType::Permission => "permission",
        }
    }
}

impl TryFrom<u8> for MenuType {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MenuType::Directory),
            1 => Ok(MenuType::Page),
            2 => Ok(MenuType::Permission),
            value => Err(CoreError::InvalidMenuType { value }),
        }
    }
}

impl From<MenuType> for u8 {
    fn from(kind: MenuType) -> Self {
        kind.as_u8()
    }
}

impl fmt::Display for MenuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Menu
// =============================================================================

fn default_true() -> bool {
    true
}

/// A single menu entry as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// Menu id.
    pub id: MenuId,
    /// Parent menu id; `None` (or an unknown id) places the entry at the root.
    #[serde(default)]
    pub parent_id: Option<MenuId>,
    /// Display name.
    pub name: String,
    /// Route path, e.g. `/rk/supply`.
    #[serde(default)]
    pub router: Option<String>,
    /// Comma-separated permission codes.
    #[serde(default)]
    pub perms: Option<String>,
    /// Entry kind.
    #[serde(rename = "type", default)]
    pub kind: MenuType,
    /// Icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Sibling display order.
    #[serde(default)]
    pub order_num: i32,
    /// Explicit view key; overrides `router` for view lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_path: Option<String>,
    /// Keep the view alive when navigating away.
    #[serde(default = "default_true")]
    pub keep_alive: bool,
    /// Show the entry in navigation.
    #[serde(default = "default_true")]
    pub is_show: bool,
}

impl Menu {
    /// Creates a menu entry with default flags.
    pub fn new(id: i64, parent_id: Option<i64>, name: impl Into<String>, kind: MenuType) -> Self {
        Self {
            id: MenuId(id),
            parent_id: parent_id.map(MenuId),
            name: name.into(),
            router: None,
            perms: None,
            kind,
            icon: None,
            order_num: 0,
            view_path: None,
            keep_alive: true,
            is_show: true,
        }
    }

    /// Sets the route path.
    pub fn with_router(mut self, router: impl Into<String>) -> Self {
        self.router = Some(router.into());
        self
    }

    /// Sets the permission codes.
    pub fn with_perms(mut self, perms: impl Into<String>) -> Self {
        self.perms = Some(perms.into());
        self
    }

    /// Sets the display order.
    pub fn with_order(mut self, order_num: i32) -> Self {
        self.order_num = order_num;
        self
    }

    /// Sets the visibility flag.
    pub fn with_visible(mut self, is_show: bool) -> Self {
        self.is_show = is_show;
        self
    }

    /// Sets the explicit view key.
    pub fn with_view_path(mut self, view_path: impl Into<String>) -> Self {
        self.view_path = Some(view_path.into());
        self
    }

    /// Returns the trimmed route path, or `None` if empty.
    pub fn route_path(&self) -> Option<&str> {
        self.router
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }

    /// Returns the individual permission codes in declaration order.
    pub fn permission_codes(&self) -> Vec<&str> {
        self.perms
            .as_deref()
            .map(|perms| {
                perms
                    .split(',')
                    .map(str::trim)
                    .filter(|code| !code.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns `true` if this entry should be bound to a route.
    pub fn is_navigable(&self) -> bool {
        self.kind == MenuType::Page && self.route_path().is_some()
    }

    /// Returns `true` if this entry appears in rendered navigation.
    pub fn is_visible(&self) -> bool {
        self.is_show && self.kind != MenuType::Permission
    }
}

impl TreeRecord for Menu {
    type Id = MenuId;

    fn id(&self) -> MenuId {
        self.id
    }

    fn parent_id(&self) -> Option<MenuId> {
        self.parent_id
    }

    fn order(&self) -> i32 {
        self.order_num
    }
}

// =============================================================================
// MenuRecord
// =============================================================================

/// Wire form of a menu entry, possibly carrying nested children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRecord {
    /// The entry itself.
    #[serde(flatten)]
    pub menu: Menu,
    /// Nested children, when the server returns a tree.
    #[serde(default, rename = "childMenus", skip_serializing_if = "Vec::is_empty")]
    pub child_menus: Vec<MenuRecord>,
}

impl From<Menu> for MenuRecord {
    fn from(menu: Menu) -> Self {
        Self {
            menu,
            child_menus: Vec::new(),
        }
    }
}

/// Flattens nested records into plain menus, pre-order.
///
/// A nested child whose own `parentId` is missing inherits the enclosing
/// record's id, so nesting information is never lost.
pub fn flatten_records(records: Vec<MenuRecord>) -> Vec<Menu> {
    let mut out = Vec::with_capacity(records.len());
    flatten_into(records, None, &mut out);
    out
}

fn flatten_into(records: Vec<MenuRecord>, parent: Option<MenuId>, out: &mut Vec<Menu>) {
    for record in records {
        let MenuRecord {
            mut menu,
            child_menus,
        } = record;
        if menu.parent_id.is_none() {
            menu.parent_id = parent;
        }
        let id = menu.id;
        out.push(menu);
        flatten_into(child_menus, Some(id), out);
    }
}

// =============================================================================
// MenuTree
// =============================================================================

/// A menu tree node.
pub type MenuNode = TreeNode<Menu>;

/// An assembled forest of menus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuTree {
    roots: Vec<MenuNode>,
}

impl MenuTree {
    /// Builds a tree from flat menus.
    pub fn from_menus(menus: Vec<Menu>) -> Self {
        Self {
            roots: tree::build_forest(menus),
        }
    }

    /// Builds a tree from wire records (flat or nested).
    pub fn from_records(records: Vec<MenuRecord>) -> Self {
        Self::from_menus(flatten_records(records))
    }

    /// Returns the root nodes.
    pub fn roots(&self) -> &[MenuNode] {
        &self.roots
    }

    /// Returns a copy that keeps only visible, non-permission entries.
    ///
    /// Hidden entries are removed together with their subtrees. The
    /// unfiltered tree stays available for permission administration and
    /// route synthesis.
    pub fn visible(&self) -> MenuTree {
        MenuTree {
            roots: tree::filter_forest(&self.roots, &Menu::is_visible),
        }
    }

    /// Returns every menu in depth-first pre-order.
    pub fn flatten(&self) -> Vec<&Menu> {
        tree::flatten(&self.roots)
    }

    /// Visits every node in depth-first pre-order.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a MenuNode),
    {
        tree::walk_pre_order(&self.roots, visit);
    }

    /// Finds a node by id.
    pub fn find(&self, id: MenuId) -> Option<&MenuNode> {
        tree::find(&self.roots, &|menu: &Menu| menu.id == id)
    }

    /// Returns the navigable page entries in pre-order.
    pub fn pages(&self) -> Vec<&Menu> {
        self.flatten()
            .into_iter()
            .filter(|menu| menu.is_navigable())
            .collect()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.roots.iter().map(TreeNode::size).sum()
    }

    /// Returns `true` if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
