// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Department records and the department tree.

use serde::{Deserialize, Serialize};

use crate::tree::{self, TreeNode, TreeRecord};

/// Department identifier.
pub type DeptId = i64;

/// A department as returned by the department list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// Department id.
    pub id: DeptId,
    /// Display name.
    pub name: String,
    /// Parent department id.
    #[serde(default)]
    pub parent_id: Option<DeptId>,
    /// Sibling display order.
    #[serde(default)]
    pub order_num: i32,
    /// Parent name, when the server joins it in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
}

impl TreeRecord for Department {
    type Id = DeptId;

    fn id(&self) -> DeptId {
        self.id
    }

    fn parent_id(&self) -> Option<DeptId> {
        self.parent_id
    }

    fn order(&self) -> i32 {
        self.order_num
    }
}

/// A department tree node.
pub type DeptNode = TreeNode<Department>;

/// Builds the department forest from a flat list.
pub fn build_department_tree(departments: Vec<Department>) -> Vec<DeptNode> {
    tree::build_forest(departments)
}

/// Returns the ids of `root` and every department below it.
///
/// Used when a user filter should cover a whole department subtree.
pub fn subtree_ids(forest: &[DeptNode], root: DeptId) -> Vec<DeptId> {
    tree::find(forest, &|dept: &Department| dept.id == root)
        .map(|node| {
            tree::flatten(std::slice::from_ref(node))
                .into_iter()
                .map(|dept| dept.id)
                .collect()
        })
        .unwrap_or_default()
}
