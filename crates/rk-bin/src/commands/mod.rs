// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.

mod access;
mod list;
mod session;
mod version;

pub use access::{menus, navigate, perms, routes};
pub use list::list;
pub use session::{captcha, login, logout, whoami};
pub use version::version;

use crate::app::{resolve_config, App};
use crate::cli::{Cli, Commands};
use crate::error::BinResult;
use crate::logging::init_logging;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    if matches!(cli.command, Commands::Version) {
        return version::version();
    }

    let config = resolve_config(&cli)?;
    init_logging(&config.logging)?;
    let app = App::build(config)?;

    run(&app, cli.command).await
}

/// Runs a command against a built app.
pub async fn run(app: &App, command: Commands) -> BinResult<()> {
    match command {
        Commands::Captcha(args) => session::captcha(app, args).await,
        Commands::Login(args) => session::login(app, args).await,
        Commands::Whoami => session::whoami(app).await,
        Commands::Logout => session::logout(app).await,
        Commands::Perms => access::perms(app).await,
        Commands::Menus(args) => access::menus(app, args).await,
        Commands::Routes => access::routes(app).await,
        Commands::Navigate(args) => access::navigate(app, args).await,
        Commands::List(args) => list::list(app, args).await,
        Commands::Version => version::version(),
    }
}
