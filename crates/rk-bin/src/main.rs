// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `rk` - command-line client for the RK recruiting console.

use rk_bin::cli::Cli;
use rk_bin::commands;
use rk_bin::error::report_error_and_exit;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    if let Err(err) = commands::execute(cli).await {
        report_error_and_exit(err);
    }
}
