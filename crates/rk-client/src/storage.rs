// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session persistence.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rk_core::PersistedSession;
use tracing::{debug, warn};

use crate::config::{SessionConfig, StorageKind};
use crate::error::ClientResult;

/// A key-scoped store for the persisted session.
pub trait SessionStorage: Send + Sync {
    /// Loads the stored session, if any.
    fn load(&self) -> ClientResult<Option<PersistedSession>>;

    /// Replaces the stored session.
    fn save(&self, session: &PersistedSession) -> ClientResult<()>;

    /// Removes the stored session. Succeeds when nothing is stored.
    fn clear(&self) -> ClientResult<()>;
}

/// Opens the storage backend selected by the configuration.
pub fn open_storage(config: &SessionConfig) -> Arc<dyn SessionStorage> {
    match config.storage {
        StorageKind::File => Arc::new(FileSessionStorage::new(config.resolved_path())),
        StorageKind::Memory => Arc::new(MemorySessionStorage::new()),
    }
}

// =============================================================================
// FileSessionStorage
// =============================================================================

/// Stores the session as a JSON file.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers never observe a partial file.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Creates a file store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> ClientResult<Option<PersistedSession>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable session file");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &PersistedSession) -> ClientResult<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir)?;

        let mut file = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(file.as_file_mut(), session)?;
        file.as_file_mut().flush()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), "Session persisted");
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// MemorySessionStorage
// =============================================================================

/// Keeps the session in memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<PersistedSession>>,
}

impl MemorySessionStorage {
    /// Creates an empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a memory store pre-seeded with a session.
    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }

    /// Returns a copy of what is stored.
    pub fn snapshot(&self) -> Option<PersistedSession> {
        self.slot.lock().clone()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> ClientResult<Option<PersistedSession>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, session: &PersistedSession) -> ClientResult<()> {
        *self.slot.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}
