// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Generic tree assembly for parent-linked records.
//!
//! Menus and departments both arrive as flat lists where each record names
//! its parent. [`build_forest`] turns such a list into a forest in two passes:
//!
//! 1. index every record by id and allocate an empty child list for it
//! 2. attach each record to its parent's child list, or to the root list when
//!    the parent is absent from the input
//!
//! Records whose parent is missing become roots instead of being dropped.
//! Siblings are ordered by [`TreeRecord::order`] with a stable sort, so ties
//! keep their input order.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// TreeRecord
// =============================================================================

/// A record that knows its own id, its parent and its display order.
pub trait TreeRecord {
    /// Identifier type.
    type Id: Copy + Eq + Hash + fmt::Debug;

    /// Returns the record id.
    fn id(&self) -> Self::Id;

    /// Returns the parent id, if any.
    fn parent_id(&self) -> Option<Self::Id>;

    /// Returns the sibling display order (ascending).
    fn order(&self) -> i32;
}

// =============================================================================
// TreeNode
// =============================================================================

/// A node in an assembled tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct TreeNode<T> {
    /// The record carried by this node.
    #[serde(flatten)]
    pub item: T,
    /// Child nodes, sorted by order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// Creates a leaf node.
    pub fn leaf(item: T) -> Self {
        Self {
            item,
            children: Vec::new(),
        }
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Counts this node and all its descendants.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Builds a forest from an unordered flat list of records.
///
/// Duplicate ids keep the first record; later duplicates are discarded with
/// a warning. Records that form a parent cycle are promoted to roots in input
/// order, so every distinct id in the input appears exactly once in the
/// output.
pub fn build_forest<T: TreeRecord>(records: Vec<T>) -> Vec<TreeNode<T>> {
    // Pass 1: index by id.
    let mut index: HashMap<T::Id, usize> = HashMap::with_capacity(records.len());
    let mut slots: Vec<Option<T>> = Vec::with_capacity(records.len());
    for record in records {
        let id = record.id();
        if index.contains_key(&id) {
            warn!(id = ?id, "Duplicate tree record ignored");
            continue;
        }
        index.insert(id, slots.len());
        slots.push(Some(record));
    }

    // Pass 2: attach to parents.
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); slots.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (position, slot) in slots.iter().enumerate() {
        let Some(record) = slot else { continue };
        match record.parent_id().and_then(|parent| index.get(&parent)) {
            Some(&parent) if parent != position => children[parent].push(position),
            _ => roots.push(position),
        }
    }

    let mut visited = vec![false; slots.len()];
    let mut forest: Vec<TreeNode<T>> = Vec::with_capacity(roots.len());
    for root in roots {
        if let Some(node) = assemble(root, &mut slots, &children, &mut visited) {
            forest.push(node);
        }
    }

    // Anything still unvisited sits on a parent cycle.
    for position in 0..slots.len() {
        if !visited[position] {
            if let Some(node) = assemble(position, &mut slots, &children, &mut visited) {
                warn!("Tree record on a parent cycle promoted to root");
                forest.push(node);
            }
        }
    }

    sort_siblings(&mut forest);
    forest
}

fn assemble<T: TreeRecord>(
    position: usize,
    slots: &mut [Option<T>],
    children: &[Vec<usize>],
    visited: &mut [bool],
) -> Option<TreeNode<T>> {
    if visited[position] {
        return None;
    }
    visited[position] = true;
    let item = slots[position].take()?;

    let mut nodes = Vec::with_capacity(children[position].len());
    for &child in &children[position] {
        if let Some(node) = assemble(child, slots, children, visited) {
            nodes.push(node);
        }
    }
    sort_siblings(&mut nodes);

    Some(TreeNode {
        item,
        children: nodes,
    })
}

/// Stable ascending sort by order.
fn sort_siblings<T: TreeRecord>(nodes: &mut [TreeNode<T>]) {
    nodes.sort_by_key(|node| node.item.order());
}

// =============================================================================
// Traversal
// =============================================================================

/// Returns every item of the forest in depth-first pre-order.
pub fn flatten<T>(forest: &[TreeNode<T>]) -> Vec<&T> {
    let mut out = Vec::new();
    walk_pre_order(forest, &mut |node| out.push(&node.item));
    out
}

/// Visits every node of the forest in depth-first pre-order.
pub fn walk_pre_order<'a, T, F>(forest: &'a [TreeNode<T>], visit: &mut F)
where
    F: FnMut(&'a TreeNode<T>),
{
    for node in forest {
        visit(node);
        walk_pre_order(&node.children, visit);
    }
}

/// Returns a filtered copy of the forest.
///
/// A node is kept only when `keep` accepts it; rejected nodes are removed
/// together with their whole subtree. The input forest is left untouched.
pub fn filter_forest<T, F>(forest: &[TreeNode<T>], keep: &F) -> Vec<TreeNode<T>>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    forest
        .iter()
        .filter(|node| keep(&node.item))
        .map(|node| TreeNode {
            item: node.item.clone(),
            children: filter_forest(&node.children, keep),
        })
        .collect()
}

/// Finds the first node whose item matches `predicate`, searching pre-order.
pub fn find<'a, T, F>(forest: &'a [TreeNode<T>], predicate: &F) -> Option<&'a TreeNode<T>>
where
    F: Fn(&T) -> bool,
{
    for node in forest {
        if predicate(&node.item) {
            return Some(node);
        }
        if let Some(found) = find(&node.children, predicate) {
            return Some(found);
        }
    }
    None
}

// =============================================================================
// Tests
// =============================================================================
