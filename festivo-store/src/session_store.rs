use festivo_core::session::{SessionContext, SessionStore, SessionStoreError};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use crate::app_config::SessionConfig;

/// File-backed session when `session.path` is set, in-memory otherwise
pub fn open_session(config: &SessionConfig) -> Result<SessionContext, SessionStoreError> {
    match &config.path {
        Some(path) => Ok(SessionContext::new(Arc::new(FileSessionStore::open(path)?))),
        None => Ok(SessionContext::anonymous()),
    }
}

/// Session state persisted as a flat JSON object on disk
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileSessionStore {
    /// Open (or lazily create) the store at `path`. A missing file is an empty session.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionStoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            HashMap::new()
        };

        info!("Opened session store at {} ({} keys)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Write through a sibling temp file so a crash never leaves half a file
    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), SessionStoreError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Persisted session store to {}", self.path.display());
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        let entries = self.entries.read().map_err(|_| SessionStoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.write().map_err(|_| SessionStoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.write().map_err(|_| SessionStoreError::Poisoned)?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
