// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! Builders that wire the client, session and router stacks the same way
//! the binary does, but over memory storage and test doubles.

use std::sync::{Arc, Once};
use std::time::Duration;

use chrono::Utc;
use rk_client::{
    AuthApi, ClientConfig, ClientContext, ClientResult, EndpointConfig, MemorySessionStorage,
    SessionCell, SessionConfig, SessionEvents, SessionExpiredPrompt, SessionStore,
};
use rk_core::{AdminPolicy, PersistedSession, Session, SessionTokens, UserProfile};
use rk_router::{NavigationGuard, Navigator, RouteSynthesizer, RouterConfig, View, ViewRegistry};

use crate::common::fixtures::ProfileFixtures;

// =============================================================================
// Tracing
// =============================================================================

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `warn`.
pub fn init_test_logging() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    });
}

// =============================================================================
// Views
// =============================================================================

/// A view that only knows its key.
#[derive(Debug, Clone)]
pub struct StubView(pub String);

impl View for StubView {
    fn key(&self) -> &str {
        &self.0
    }
}

/// Registry with the fixed pages plus `supply` and `rk/vendor`.
///
/// `notice` is deliberately missing so the Notice menu resolves to the
/// not-found sentinel.
pub fn test_views() -> ViewRegistry {
    let mut registry = ViewRegistry::new();
    for key in ["login", "home", "error/403", "error/404", "supply", "rk/vendor"] {
        registry.register(key, move || Box::new(StubView(key.to_string())));
    }
    registry
}

// =============================================================================
// Session Stack
// =============================================================================

/// A session store over `api` and memory storage.
pub fn store_with(api: Arc<dyn AuthApi>, admin: AdminPolicy) -> Arc<SessionStore> {
    let cell = Arc::new(SessionCell::new(Arc::new(MemorySessionStorage::new())));
    Arc::new(SessionStore::new(api, cell, SessionEvents::default(), admin))
}

/// A guard and navigator over `store` with the default route config.
pub fn navigator_for(store: Arc<SessionStore>) -> Arc<Navigator> {
    navigator_with(store, RouterConfig::default())
}

/// A guard and navigator over `store`.
pub fn navigator_with(store: Arc<SessionStore>, config: RouterConfig) -> Arc<Navigator> {
    let synthesizer = RouteSynthesizer::new(Arc::new(test_views()));
    let guard = NavigationGuard::new(store, synthesizer, config);
    Arc::new(Navigator::new(Arc::new(guard)))
}

// =============================================================================
// HTTP Stack
// =============================================================================

/// A persisted session for `profile` holding `token`.
pub fn persisted_session(token: &str, profile: UserProfile) -> PersistedSession {
    let tokens = SessionTokens::from_pair(&ProfileFixtures::token_pair(token), Utc::now());
    Session::new(tokens, profile).to_persisted()
}

/// The full client stack against `base_url`, optionally pre-signed-in.
pub fn http_context(
    base_url: &str,
    prompt: Arc<dyn SessionExpiredPrompt>,
    session: Option<PersistedSession>,
) -> ClientResult<ClientContext> {
    let storage = match session {
        Some(session) => MemorySessionStorage::with_session(session),
        None => MemorySessionStorage::new(),
    };
    let client = ClientConfig::new()
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5));

    let context = ClientContext::build_with_storage(
        &client,
        &EndpointConfig::default(),
        &SessionConfig::in_memory(),
        AdminPolicy::server_flag(),
        prompt,
        Arc::new(storage),
    )?;
    context.session.restore();
    Ok(context)
}
