// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::error::BinResult;

/// Prints version information for every crate.
pub fn version() -> BinResult<()> {
    println!("rk - RK recruiting console client");
    println!();
    println!("Version Information:");
    println!("  rk-bin:    {}", crate::VERSION);
    println!("  rk-core:   {}", rk_core::VERSION);
    println!("  rk-client: {}", rk_client::VERSION);
    println!("  rk-router: {}", rk_router::VERSION);
    println!("  rk-config: {}", rk_config::VERSION);
    println!();
    println!("Build Information:");
    println!("  Target:    {}", std::env::consts::ARCH);
    println!("  OS:        {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
