// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application wiring.
//!
//! [`App`] owns the client stack, the navigation guard and the navigator for
//! one command invocation. The session is restored from storage on build so
//! every subcommand sees the last login.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rk_client::{
    ClientContext, ClientError, ResourceClient, SessionExpiredPrompt, SessionStorage, SessionStore,
};
use rk_config::{ConfigLoader, LogLevel, RkConfig};
use rk_core::Session;
use rk_router::{NavigationGuard, Navigator, RouteSynthesizer};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::error::{BinError, BinResult};
use crate::views::builtin_views;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "rk.yaml";

// =============================================================================
// Configuration
// =============================================================================

/// Loads the configuration and applies command-line overrides.
pub fn resolve_config(cli: &Cli) -> BinResult<RkConfig> {
    let loader = ConfigLoader::new();
    let mut config = match &cli.config {
        Some(path) => loader.load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => loader.load(DEFAULT_CONFIG_FILE)?,
        None => loader.load_defaults()?,
    };

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = LogLevel::parse(level)
            .ok_or_else(|| BinError::config(format!("Unknown log level: {}", level)))?;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format.into();
    }

    config.validate()?;
    Ok(config)
}

// =============================================================================
// ConsolePrompt
// =============================================================================

/// Prints the session-expired notice to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

#[async_trait]
impl SessionExpiredPrompt for ConsolePrompt {
    async fn session_expired(&self, message: &str) {
        eprintln!("{} Run `rk login` to sign in again.", message);
    }
}

// =============================================================================
// App
// =============================================================================

/// One wired-up client.
pub struct App {
    config: RkConfig,
    context: ClientContext,
    navigator: Arc<Navigator>,
    listener: JoinHandle<()>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("base_url", &self.config.api.base_url)
            .field("navigator", &self.navigator)
            .finish()
    }
}

impl App {
    /// Builds the app with the configured session storage.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn build(config: RkConfig) -> BinResult<Self> {
        let context = ClientContext::build(
            &config.api,
            &config.endpoints,
            &config.session,
            config.admin.clone(),
            Arc::new(ConsolePrompt),
        )?;
        Ok(Self::assemble(config, context))
    }

    /// Builds the app over an explicit storage backend.
    pub fn build_with_storage(
        config: RkConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> BinResult<Self> {
        let context = ClientContext::build_with_storage(
            &config.api,
            &config.endpoints,
            &config.session,
            config.admin.clone(),
            Arc::new(ConsolePrompt),
            storage,
        )?;
        Ok(Self::assemble(config, context))
    }

    fn assemble(config: RkConfig, context: ClientContext) -> Self {
        if let Some(session) = context.session.restore() {
            info!(user_id = session.user_id(), "Session restored");
        } else {
            debug!("No stored session");
        }

        let synthesizer = RouteSynthesizer::new(Arc::new(builtin_views()));
        let guard = NavigationGuard::new(
            context.session.clone(),
            synthesizer,
            config.routes.clone(),
        );
        let navigator = Arc::new(Navigator::new(Arc::new(guard)));
        let listener = navigator.spawn_event_listener(context.session.subscribe());

        Self {
            config,
            context,
            navigator,
            listener,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RkConfig {
        &self.config
    }

    /// Returns the session store.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.context.session
    }

    /// Returns the business module client.
    pub fn resources(&self) -> &ResourceClient {
        &self.context.resources
    }

    /// Returns the navigator.
    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    /// Returns the current session or a not-authenticated error.
    pub fn require_session(&self) -> BinResult<Session> {
        self.session()
            .current()
            .ok_or(BinError::Client(ClientError::NotAuthenticated))
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

// =============================================================================
// Tests
// =============================================================================
