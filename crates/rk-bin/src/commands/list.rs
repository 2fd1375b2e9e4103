// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `list` command.

use rk_client::ResourceKind;
use rk_core::{PageQuery, PageResult};
use serde_json::Value;

use crate::app::App;
use crate::cli::ListArgs;
use crate::error::BinResult;

/// Prints one page of a business module, one JSON record per line.
pub async fn list(app: &App, args: ListArgs) -> BinResult<()> {
    let kind: ResourceKind = args.module.parse()?;
    app.require_session()?;

    let query = build_query(&args);
    let page: PageResult<Value> = app.resources().page(kind, &query).await?;

    let pagination = &page.pagination;
    println!(
        "{}: page {}/{} ({} records)",
        kind,
        pagination.page,
        pagination.pages().max(1),
        pagination.total
    );
    for record in &page.list {
        println!("{}", record);
    }
    Ok(())
}

fn build_query(args: &ListArgs) -> PageQuery {
    let query = PageQuery::new(args.page, args.size);
    match &args.keyword {
        Some(keyword) => query.with_keyword(keyword.clone()),
        None => query,
    }
}
