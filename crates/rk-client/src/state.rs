// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The shared session cell.
//!
//! [`SessionCell`] is the single owner of the in-memory session. Every
//! mutation is mirrored to the configured [`SessionStorage`] while the write
//! lock is held, so the persisted copy follows memory in the same order.
//! Storage failures are logged and do not roll back memory.
//!
//! The cell also counts generations. Each login, restore or teardown starts a
//! new one, so state derived from a session can tell when it is stale.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rk_core::Session;
use tracing::{debug, warn};

use crate::storage::SessionStorage;

/// Shared, persisted session state.
pub struct SessionCell {
    session: RwLock<Option<Session>>,
    storage: Arc<dyn SessionStorage>,
    generation: AtomicU64,
}

impl std::fmt::Debug for SessionCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCell")
            .field("authenticated", &self.is_authenticated())
            .field("generation", &self.generation())
            .finish()
    }
}

impl SessionCell {
    /// Creates an empty cell over a storage backend.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            session: RwLock::new(None),
            storage,
            generation: AtomicU64::new(0),
        }
    }

    /// Loads the persisted session into memory without server validation.
    ///
    /// A stored token without a profile is discarded and the storage
    /// cleared.
    pub fn restore(&self) -> Option<Session> {
        let persisted = match self.storage.load() {
            Ok(persisted) => persisted?,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                return None;
            }
        };

        let mut guard = self.session.write();
        self.generation.fetch_add(1, Ordering::AcqRel);
        match persisted.into_session() {
            Some(session) => {
                debug!(user_id = session.user_id(), "Session restored");
                *guard = Some(session.clone());
                Some(session)
            }
            None => {
                warn!("Persisted session incomplete, discarding");
                *guard = None;
                self.clear_storage();
                None
            }
        }
    }

    /// Returns the current session generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Returns a copy of the current session.
    pub fn get(&self) -> Option<Session> {
        self.session.read().clone()
    }

    /// Returns the current bearer token.
    pub fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .as_ref()
            .map(|s| s.access_token().to_string())
    }

    /// Returns `true` if a session is present.
    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    /// Returns `true` if the session has loaded its permissions.
    pub fn is_hydrated(&self) -> bool {
        self.session
            .read()
            .as_ref()
            .map(Session::is_hydrated)
            .unwrap_or(false)
    }

    /// Reads the session through a closure.
    pub fn with<R>(&self, f: impl FnOnce(Option<&Session>) -> R) -> R {
        f(self.session.read().as_ref())
    }

    /// Replaces the session.
    pub fn replace(&self, session: Session) {
        let mut guard = self.session.write();
        if let Err(e) = self.storage.save(&session.to_persisted()) {
            warn!(error = %e, "Failed to persist session");
        }
        *guard = Some(session);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Mutates the current session. Returns `false` if there is none.
    pub fn update(&self, f: impl FnOnce(&mut Session)) -> bool {
        let mut guard = self.session.write();
        let Some(session) = guard.as_mut() else {
            return false;
        };
        f(session);
        self.persist(session);
        true
    }

    /// Mutates the session only if it is still the one from `generation`.
    pub fn update_if(&self, generation: u64, f: impl FnOnce(&mut Session)) -> bool {
        let mut guard = self.session.write();
        if self.generation() != generation {
            debug!(generation, current = self.generation(), "Session replaced, update skipped");
            return false;
        }
        let Some(session) = guard.as_mut() else {
            return false;
        };
        f(session);
        self.persist(session);
        true
    }

    /// Removes the session from memory and storage, returning it.
    pub fn take(&self) -> Option<Session> {
        let mut guard = self.session.write();
        let previous = guard.take();
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.clear_storage();
        previous
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.storage.save(&session.to_persisted()) {
            warn!(error = %e, "Failed to persist session");
        }
    }

    fn clear_storage(&self) {
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
    }
}
