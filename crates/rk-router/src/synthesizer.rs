// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Menu tree to route synthesis.
//!
//! The synthesizer walks the unfiltered menu tree depth-first, pre-order, and
//! emits one route per page entry with a non-empty path. Hidden pages still
//! get routes: visibility governs navigation menus, not reachability.

use std::sync::Arc;

use rk_core::MenuTree;
use tracing::{debug, warn};

use crate::route::RouteDescriptor;
use crate::table::{Registration, RouteTable};
use crate::view::ViewRegistry;

/// Counts from one registration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynthesisReport {
    /// Routes added to the table.
    pub added: usize,
    /// Routes skipped because their name or path was taken.
    pub skipped: usize,
    /// Added routes whose view key matched nothing.
    pub unresolved: usize,
}

/// Turns menu trees into routes.
#[derive(Debug, Clone)]
pub struct RouteSynthesizer {
    views: Arc<ViewRegistry>,
}

impl RouteSynthesizer {
    /// Creates a synthesizer over a view registry.
    pub fn new(views: Arc<ViewRegistry>) -> Self {
        Self { views }
    }

    /// Returns the view registry.
    pub fn views(&self) -> &Arc<ViewRegistry> {
        &self.views
    }

    /// Builds route descriptors in pre-order.
    pub fn synthesize(&self, tree: &MenuTree) -> Vec<RouteDescriptor> {
        let mut routes = Vec::new();
        tree.walk(&mut |node| {
            let menu = &node.item;
            let Some(path) = menu.route_path() else {
                return;
            };
            let key = menu
                .view_path
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(path);
            if let Some(route) = RouteDescriptor::from_menu(menu, self.views.resolve(key)) {
                routes.push(route);
            }
        });
        routes
    }

    /// Registers synthesized routes. Safe to run repeatedly.
    pub fn register(&self, tree: &MenuTree, table: &mut RouteTable) -> SynthesisReport {
        let mut report = SynthesisReport::default();
        for route in self.synthesize(tree) {
            let found = route.view.is_found();
            let name = route.name.clone();
            match table.register(route) {
                Registration::Added => {
                    report.added += 1;
                    if !found {
                        warn!(route = %name, "Route registered without a view");
                        report.unresolved += 1;
                    }
                }
                Registration::DuplicateName | Registration::DuplicatePath => report.skipped += 1,
            }
        }
        debug!(
            added = report.added,
            skipped = report.skipped,
            unresolved = report.unresolved,
            "Routes synthesized"
        );
        report
    }
}
