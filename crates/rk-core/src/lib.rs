// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # rk-core
//!
//! Core domain types for the RK recruiting console client.
//!
//! This crate holds everything that does not talk to the network:
//!
//! - **Tree**: generic two-pass tree assembly for parent-linked records
//! - **Menu**: menu records, menu types and the menu tree
//! - **Department**: department records built with the same tree builder
//! - **Permission**: granted permission sets and the permission evaluator
//! - **Profile**: user profile, credentials and token pairs
//! - **Session**: the authenticated session and its persisted form
//! - **Envelope**: the `{ code, message, result }` response envelope
//!
//! ## Example
//!
//! ```rust
//! use rk_core::menu::{MenuRecord, MenuTree};
//!
//! let records: Vec<MenuRecord> = serde_json::from_str(r#"[
//!     {"id": 1, "parentId": null, "name": "RK", "type": 0, "isShow": true, "orderNum": 1},
//!     {"id": 2, "parentId": 1, "name": "Supply", "type": 1, "router": "/rk/supply",
//!      "isShow": true, "orderNum": 1}
//! ]"#).unwrap();
//!
//! let tree = MenuTree::from_records(records);
//! assert_eq!(tree.visible().roots().len(), 1);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod department;
pub mod envelope;
pub mod error;
pub mod menu;
pub mod permission;
pub mod profile;
pub mod session;
pub mod tree;

pub use department::{DeptId, DeptNode, Department};
pub use envelope::{ApiEnvelope, PageQuery, PageResult, Pagination, ResponseCode};
pub use error::{CoreError, CoreResult};
pub use menu::{Menu, MenuId, MenuNode, MenuRecord, MenuTree, MenuType};
pub use permission::{AdminPolicy, PermissionEvaluator, PermissionSet};
pub use profile::{Captcha, Credentials, TokenPair, UserProfile};
pub use session::{PersistedSession, Session, SessionTokens};
pub use tree::{TreeNode, TreeRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
