// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Menu Tree Integration Tests
//!
//! - `test_tree_*`: building from server records
//! - `prop_*`: properties over generated menu lists

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use proptest::prelude::*;
use rk_core::{Menu, MenuRecord, MenuTree, MenuType};
use rk_router::{RouteSynthesizer, RouteTable, ViewRegistry};
use rk_tests::prelude::*;

// =============================================================================
// Fixture Trees
// =============================================================================

#[test]
fn test_tree_orders_siblings() {
    let tree = MenuTree::from_records(MenuFixtures::rk_records());
    let root = &tree.roots()[0];
    let names: Vec<&str> = root.children.iter().map(|n| n.item.name.as_str()).collect();
    assert_eq!(names, vec!["Vendor", "Supply", "Notice"]);
}

#[test]
fn test_tree_nested_and_flat_agree() {
    let flat = MenuTree::from_records(MenuFixtures::rk_records());
    let nested = MenuTree::from_records(MenuFixtures::rk_records_nested());
    assert_eq!(flat, nested);
    assert_eq!(nested.len(), 5);
}

#[test]
fn test_tree_nested_json_from_server() {
    let body = serde_json::to_value(MenuFixtures::rk_records_nested()).unwrap();
    assert!(body[0]["childMenus"].is_array());

    let records: Vec<MenuRecord> = serde_json::from_value(body).unwrap();
    let tree = MenuTree::from_records(records);
    let pages: Vec<&str> = tree.pages().iter().filter_map(|m| m.route_path()).collect();
    assert_eq!(pages, vec!["/rk/vendor", "/rk/supply", "/rk/notice"]);
}

#[test]
fn test_tree_visible_drops_hidden() {
    let tree = MenuTree::from_records(MenuFixtures::rk_records());
    let visible = tree.visible();
    let names: Vec<&str> = visible.flatten().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["RK", "Vendor", "Supply"]);
    // The unfiltered tree still carries it.
    assert!(tree.flatten().iter().any(|m| m.name == "Notice"));
}

#[test]
fn test_tree_orphan_becomes_root() {
    let mut menus = MenuFixtures::rk_menus();
    menus.push(Menu::new(99, Some(404), "Orphan", MenuType::Page).with_router("/orphan"));
    let tree = MenuTree::from_menus(menus);

    let roots: Vec<&str> = tree.roots().iter().map(|n| n.item.name.as_str()).collect();
    assert!(roots.contains(&"Orphan"));
    assert_eq!(tree.len(), 6);
}

// =============================================================================
// Properties
// =============================================================================

fn kind_strategy() -> impl Strategy<Value = MenuType> {
    prop_oneof![
        Just(MenuType::Directory),
        Just(MenuType::Page),
        Just(MenuType::Permission),
    ]
}

/// Menus with distinct ids; parents may point at missing ids.
fn menus_strategy() -> impl Strategy<Value = Vec<Menu>> {
    proptest::collection::hash_map(
        1i64..200,
        (
            proptest::option::of(1i64..260),
            kind_strategy(),
            -5i32..5,
            any::<bool>(),
        ),
        0..50,
    )
    .prop_map(|raw: HashMap<i64, (Option<i64>, MenuType, i32, bool)>| {
        raw.into_iter()
            .map(|(id, (parent, kind, order, visible))| {
                let menu = Menu::new(id, parent, format!("menu-{}", id), kind)
                    .with_order(order)
                    .with_visible(visible);
                match kind {
                    MenuType::Page => menu.with_router(format!("/page/{}", id)),
                    _ => menu,
                }
            })
            .collect()
    })
}

fn hidden_ancestry(tree: &MenuTree) -> HashSet<i64> {
    fn mark(node: &rk_core::MenuNode, hidden_above: bool, out: &mut HashSet<i64>) {
        let hidden = hidden_above || !node.item.is_visible();
        if hidden {
            out.insert(node.item.id.0);
        }
        for child in &node.children {
            mark(child, hidden, out);
        }
    }
    let mut out = HashSet::new();
    for root in tree.roots() {
        mark(root, false, &mut out);
    }
    out
}

proptest! {
    #[test]
    fn prop_flatten_is_permutation(menus in menus_strategy()) {
        let mut expected: Vec<i64> = menus.iter().map(|m| m.id.0).collect();
        expected.sort_unstable();

        let tree = MenuTree::from_menus(menus);
        let mut flat: Vec<i64> = tree.flatten().iter().map(|m| m.id.0).collect();
        flat.sort_unstable();

        prop_assert_eq!(flat, expected);
    }

    #[test]
    fn prop_siblings_sorted(menus in menus_strategy()) {
        let tree = MenuTree::from_menus(menus);
        let mut ok = true;
        tree.walk(&mut |node| {
            let orders: Vec<i32> = node.children.iter().map(|c| c.item.order_num).collect();
            ok &= orders.windows(2).all(|w| w[0] <= w[1]);
        });
        let root_orders: Vec<i32> = tree.roots().iter().map(|n| n.item.order_num).collect();
        prop_assert!(ok);
        prop_assert!(root_orders.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prop_visible_excludes_hidden_subtrees(menus in menus_strategy()) {
        let tree = MenuTree::from_menus(menus);
        let hidden = hidden_ancestry(&tree);
        let visible = tree.visible();

        prop_assert_eq!(visible.len() + hidden.len(), tree.len());
        prop_assert!(visible.flatten().iter().all(|m| !hidden.contains(&m.id.0)));
    }

    #[test]
    fn prop_synthesis_covers_every_page(menus in menus_strategy()) {
        let pages = menus.iter().filter(|m| m.kind == MenuType::Page).count();
        let tree = MenuTree::from_menus(menus);
        let synthesizer = RouteSynthesizer::new(Arc::new(ViewRegistry::new()));

        let mut table = RouteTable::new();
        let first = synthesizer.register(&tree, &mut table);
        prop_assert_eq!(first.added, pages);
        prop_assert_eq!(first.unresolved, pages);

        let second = synthesizer.register(&tree, &mut table);
        prop_assert_eq!(second.added, 0);
        prop_assert_eq!(table.len(), pages);
    }
}
