// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # rk-client
//!
//! Network side of the RK console client.
//!
//! - [`HttpClient`]: bearer attachment, envelope unwrapping, 401/403 escalation
//! - [`SessionExpiry`]: the single session-expired flow behind an [`AuthFailureGate`]
//! - [`SessionStore`]: login, restore, refresh, logout, hydration and
//!   permission queries
//! - [`ResourceClient`]: CRUD wrappers for business modules
//!
//! [`ClientContext::build`] wires these together from configuration.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod expiry;
pub mod http;
pub mod resource;
pub mod session;
pub mod state;
pub mod storage;

use std::sync::Arc;

use rk_core::AdminPolicy;

pub use auth::{AuthApi, HttpAuthApi};
pub use config::{ClientConfig, EndpointConfig, SessionConfig, StorageKind};
pub use error::{ClientError, ClientResult};
pub use events::{LogoutReason, SessionEvent, SessionEvents};
pub use expiry::{AuthFailureGate, AuthFailurePermit, LogPrompt, SessionExpiredPrompt, SessionExpiry};
pub use http::{Bearer, HttpClient};
pub use resource::{ResourceClient, ResourceKind};
pub use session::SessionStore;
pub use state::SessionCell;
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};

/// Everything a front end needs, wired to one session.
#[derive(Debug, Clone)]
pub struct ClientContext {
    /// HTTP client.
    pub http: Arc<HttpClient>,
    /// Session store.
    pub session: Arc<SessionStore>,
    /// Business module client.
    pub resources: ResourceClient,
}

impl ClientContext {
    /// Builds the client stack.
    pub fn build(
        client: &ClientConfig,
        endpoints: &EndpointConfig,
        session: &SessionConfig,
        admin: AdminPolicy,
        prompt: Arc<dyn SessionExpiredPrompt>,
    ) -> ClientResult<Self> {
        let storage = storage::open_storage(session);
        Self::build_with_storage(client, endpoints, session, admin, prompt, storage)
    }

    /// Builds the client stack over an explicit storage backend.
    pub fn build_with_storage(
        client: &ClientConfig,
        endpoints: &EndpointConfig,
        session: &SessionConfig,
        admin: AdminPolicy,
        prompt: Arc<dyn SessionExpiredPrompt>,
        storage: Arc<dyn SessionStorage>,
    ) -> ClientResult<Self> {
        let cell = Arc::new(SessionCell::new(storage));
        let events = SessionEvents::default();
        let expiry = Arc::new(SessionExpiry::new(cell.clone(), events.clone(), prompt));
        let http = Arc::new(HttpClient::new(client, cell.clone(), expiry)?);

        let api = Arc::new(HttpAuthApi::new(http.clone(), endpoints.clone()));
        let store = SessionStore::new(api, cell, events, admin).with_session_config(session);

        Ok(Self {
            resources: ResourceClient::new(http.clone()),
            http,
            session: Arc::new(store),
        })
    }
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
