// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Envelope-aware HTTP client.
//!
//! Every request goes through [`HttpClient::send`], which:
//!
//! 1. attaches `Authorization: Bearer <token>` when a token is available
//! 2. tags the request with a fresh `X-Request-ID`
//! 3. escalates HTTP 401/403 to the session-expired flow
//! 4. unwraps `{ code, message, result }`, turning non-1000 codes into
//!    [`ClientError::Business`]

use std::sync::Arc;
use std::time::Instant;

use reqwest::{Method, RequestBuilder, StatusCode};
use rk_core::ApiEnvelope;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::expiry::SessionExpiry;
use crate::state::SessionCell;

/// Request id header.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Which bearer token a request carries.
#[derive(Debug, Clone, Copy)]
pub enum Bearer<'a> {
    /// The current session's token. Auth failures run the expiry flow.
    Session,
    /// A caller-supplied token. Auth failures are only reported.
    Explicit(&'a str),
    /// No token.
    None,
}

// =============================================================================
// HttpClient
// =============================================================================

/// HTTP client bound to one API base URL and one session.
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
    cell: Arc<SessionCell>,
    expiry: Arc<SessionExpiry>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpClient {
    /// Creates a client.
    pub fn new(
        config: &ClientConfig,
        cell: Arc<SessionCell>,
        expiry: Arc<SessionExpiry>,
    ) -> ClientResult<Self> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| ClientError::config(format!("Invalid base URL '{}': {}", config.base_url, e)))?;

        let inner = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::config(e.to_string()))?;

        Ok(Self {
            inner,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cell,
            expiry,
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the session cell.
    pub fn session(&self) -> &Arc<SessionCell> {
        &self.cell
    }

    /// Returns the session-expired handler.
    pub fn expiry(&self) -> &Arc<SessionExpiry> {
        &self.expiry
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // =========================================================================
    // Convenience methods
    // =========================================================================

    /// `GET` with the session token.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::GET, path, None::<&()>, Bearer::Session).await
    }

    /// `GET` with query parameters and the session token.
    pub async fn get_query<Q, T>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.inner.get(self.url(path)).query(query);
        self.execute(Method::GET, path, request, Bearer::Session).await
    }

    /// `POST` a JSON body with the session token.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body), Bearer::Session).await
    }

    /// Sends a request with an optional JSON body.
    pub async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        bearer: Bearer<'_>,
    ) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.inner.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(method, path, request, bearer).await
    }

    // =========================================================================
    // Core
    // =========================================================================

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        mut request: RequestBuilder,
        bearer: Bearer<'_>,
    ) -> ClientResult<T> {
        let token = match bearer {
            Bearer::Session => self.cell.access_token(),
            Bearer::Explicit(token) => Some(token.to_string()),
            Bearer::None => None,
        };
        if let Some(token) = token.as_deref() {
            request = request.bearer_auth(token);
        }

        let request_id = Uuid::now_v7().to_string();
        request = request.header(REQUEST_ID_HEADER, &request_id);

        let started = Instant::now();
        debug!(%method, path, request_id = %request_id, "Sending request");

        let response = request.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "Request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Response received"
        );

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            if matches!(bearer, Bearer::Session) {
                self.expiry.handle(status.as_u16()).await;
            }
            return Err(ClientError::AuthenticationFailed {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let envelope: ApiEnvelope = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(ClientError::HttpStatus {
                    status: status.as_u16(),
                })
            }
            Err(e) => return Err(ClientError::decode(e.to_string())),
        };

        if !envelope.is_success() {
            debug!(path, code = envelope.code, message = %envelope.message, "Business error");
        }
        Ok(envelope.into_result()?)
    }
}
