// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built server data shared by the integration suites.

use rk_core::{Menu, MenuRecord, MenuType, TokenPair, UserProfile};
use serde_json::{json, Value};

// =============================================================================
// Menu Fixtures
// =============================================================================

/// Permission code guarding the Supply page.
pub const SUPPLY_PAGE: &str = "rk:supply:page";

/// Permission code guarding the Vendor page.
pub const VENDOR_PAGE: &str = "rk:vendor:page";

/// Menu trees as the server would send them.
pub struct MenuFixtures;

impl MenuFixtures {
    /// The RK directory with Supply, Vendor and a hidden Notice page.
    ///
    /// ```text
    /// RK (dir)
    /// ├── Vendor   /rk/vendor   rk:vendor:page   order 1
    /// ├── Supply   /rk/supply   rk:supply:page   order 2
    /// │   └── Delete (permission) rk:supply:delete
    /// └── Notice   /rk/notice   hidden           order 3
    /// ```
    pub fn rk_menus() -> Vec<Menu> {
        vec![
            Menu::new(1, None, "RK", MenuType::Directory).with_order(1),
            Menu::new(2, Some(1), "Supply", MenuType::Page)
                .with_router("/rk/supply")
                .with_perms(SUPPLY_PAGE)
                .with_view_path("supply")
                .with_order(2),
            Menu::new(3, Some(1), "Vendor", MenuType::Page)
                .with_router("/rk/vendor")
                .with_perms(VENDOR_PAGE)
                .with_order(1),
            Menu::new(4, Some(2), "Delete", MenuType::Permission).with_perms("rk:supply:delete"),
            Menu::new(5, Some(1), "Notice", MenuType::Page)
                .with_router("/rk/notice")
                .with_view_path("notice")
                .with_order(3)
                .with_visible(false),
        ]
    }

    /// Flat records for [`rk_menus`](Self::rk_menus).
    pub fn rk_records() -> Vec<MenuRecord> {
        Self::rk_menus().into_iter().map(MenuRecord::from).collect()
    }

    /// The same menus in the server's nested `childMenus` shape.
    pub fn rk_records_nested() -> Vec<MenuRecord> {
        let mut records: Vec<MenuRecord> = Self::rk_records();
        let notice = records.remove(4);
        let delete = records.remove(3);
        let vendor = records.remove(2);
        let mut supply = records.remove(1);
        let mut root = records.remove(0);

        supply.child_menus.push(delete);
        root.child_menus = vec![supply, vendor, notice];
        vec![root]
    }
}

// =============================================================================
// Profile Fixtures
// =============================================================================

/// Users and tokens.
pub struct ProfileFixtures;

impl ProfileFixtures {
    /// A regular user.
    pub fn alice() -> UserProfile {
        UserProfile {
            id: 7,
            username: "alice".to_string(),
            name: Some("Alice Kim".to_string()),
            nick_name: None,
            department_id: Some(3),
            role_id_list: vec![2],
            admin: Some(false),
        }
    }

    /// A second regular user.
    pub fn bob() -> UserProfile {
        UserProfile {
            id: 8,
            username: "bob".to_string(),
            name: Some("Bob Lee".to_string()),
            nick_name: None,
            department_id: Some(4),
            role_id_list: vec![3],
            admin: Some(false),
        }
    }

    /// An administrator flagged by the server.
    pub fn root() -> UserProfile {
        UserProfile {
            id: 1,
            username: "root".to_string(),
            name: Some("Root".to_string()),
            nick_name: None,
            department_id: None,
            role_id_list: vec![1],
            admin: Some(true),
        }
    }

    /// A token pair valid for two hours.
    pub fn token_pair(token: &str) -> TokenPair {
        TokenPair {
            token: token.to_string(),
            expire: 7200,
            refresh_token: format!("{}-refresh", token),
            refresh_expire: 86400,
        }
    }
}

// =============================================================================
// Envelopes
// =============================================================================

/// A success envelope around `result`.
pub fn ok_envelope(result: Value) -> String {
    json!({ "code": 1000, "message": "success", "result": result }).to_string()
}

/// A failure envelope.
pub fn error_envelope(code: i64, message: &str) -> String {
    json!({ "code": code, "message": message }).to_string()
}
