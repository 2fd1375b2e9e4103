// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Access commands: `perms`, `menus`, `routes`, `navigate`.

use rk_core::MenuNode;
use rk_router::{RedirectReason, RouteOrigin};

use crate::app::App;
use crate::cli::{MenusArgs, NavigateArgs};
use crate::error::BinResult;

/// Lists granted permission codes.
pub async fn perms(app: &App) -> BinResult<()> {
    app.require_session()?;
    app.session().hydrate().await?;
    let session = app.require_session()?;

    if app.session().is_admin() {
        println!("Administrator: every permission check passes");
    }
    match session.permissions() {
        Some(granted) if !granted.is_empty() => {
            for code in granted.sorted() {
                println!("{}", code);
            }
        }
        _ => println!("No permissions granted"),
    }
    Ok(())
}

/// Prints the menu tree.
pub async fn menus(app: &App, args: MenusArgs) -> BinResult<()> {
    app.require_session()?;
    let tree = app.session().hydrate().await?;
    let tree = if args.all { tree } else { tree.visible() };

    if tree.is_empty() {
        println!("No menus granted");
        return Ok(());
    }
    for root in tree.roots() {
        print_menu(root, 0);
    }
    Ok(())
}

fn print_menu(node: &MenuNode, depth: usize) {
    println!("{}", menu_line(node, depth));
    for child in &node.children {
        print_menu(child, depth + 1);
    }
}

fn menu_line(node: &MenuNode, depth: usize) -> String {
    let menu = &node.item;
    let mut line = format!("{}{} [{}]", "  ".repeat(depth), menu.name, menu.kind.as_str());
    if let Some(path) = menu.route_path() {
        line.push_str(&format!(" {}", path));
    }
    let codes = menu.permission_codes();
    if !codes.is_empty() {
        line.push_str(&format!(" ({})", codes.join(", ")));
    }
    if !menu.is_visible() {
        line.push_str(" hidden");
    }
    line
}

/// Prints the route table after hydration.
pub async fn routes(app: &App) -> BinResult<()> {
    app.require_session()?;
    let guard = app.navigator().guard();
    if let Some(report) = guard.ensure_hydrated().await? {
        if report.unresolved > 0 {
            println!("{} route(s) have no view", report.unresolved);
        }
    }

    let table = guard.table().read();
    for route in table.iter() {
        let origin = match route.origin {
            RouteOrigin::Static => "static",
            RouteOrigin::Dynamic => "menu",
        };
        let view = if route.view.is_found() {
            route.view.key().to_string()
        } else {
            format!("{} (missing)", route.view.key())
        };
        let perms = if route.permissions.is_empty() {
            "-".to_string()
        } else {
            route.permissions.join(",")
        };
        println!(
            "{:<10} {:<24} {:<20} {:<28} {}",
            origin, route.path, route.title, view, perms
        );
    }
    Ok(())
}

/// Runs the guard against a path.
pub async fn navigate(app: &App, args: NavigateArgs) -> BinResult<()> {
    let nav = app.navigator().navigate(&args.path).await?;

    for (to, reason) in &nav.redirects {
        println!("-> {} ({})", to, reason_label(*reason));
    }
    println!("At {} [{:?}]", nav.location, nav.state);
    if let Some(route) = &nav.route {
        println!("Page: {} - {}", route.title, route.view.instantiate().describe());
    }
    Ok(())
}

fn reason_label(reason: RedirectReason) -> &'static str {
    match reason {
        RedirectReason::Unauthenticated => "not logged in",
        RedirectReason::AlreadyAuthenticated => "already logged in",
        RedirectReason::Forbidden => "permission denied",
        RedirectReason::NotFound => "no such page",
        RedirectReason::HydrationFailed => "session could not be loaded",
    }
}
