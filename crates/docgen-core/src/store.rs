//! Session persistence
//!
//! The pure pipeline never touches a store. [`crate::SessionService`] loads
//! the whole snapshot, applies one operation and saves it back.

use crate::error::StoreError;
use crate::snapshot::SessionSnapshot;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Snapshot persistence backend
pub trait SessionStore: Send + Sync {
    /// Load a snapshot, `None` if the session does not exist
    fn load(&self, session_id: &str) -> Result<Option<SessionSnapshot>, StoreError>;

    /// Save a snapshot, replacing any previous one
    fn save(&self, session_id: &str, snapshot: &SessionSnapshot) -> Result<(), StoreError>;

    /// Remove a session; returns whether it existed
    fn delete(&self, session_id: &str) -> Result<bool, StoreError>;

    /// Ids of all stored sessions, sorted
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn load(&self, session_id: &str) -> Result<Option<SessionSnapshot>, StoreError> {
        (**self).load(session_id)
    }

    fn save(&self, session_id: &str, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        (**self).save(session_id, snapshot)
    }

    fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        (**self).delete(session_id)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        (**self).list()
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionSnapshot>>,
}

impl InMemorySessionStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one snapshot under its own session id
    #[must_use]
    pub fn with_snapshot(snapshot: SessionSnapshot) -> Self {
        let store = Self::new();
        store.sessions.write().insert(snapshot.session_id.clone(), snapshot);
        store
    }

    /// Number of stored sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, session_id: &str) -> Result<Option<SessionSnapshot>, StoreError> {
        Ok(self.sessions.read().get(session_id).cloned())
    }

    fn save(&self, session_id: &str, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        self.sessions
            .write()
            .insert(session_id.to_string(), snapshot.clone());
        Ok(())
    }

    fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        Ok(self.sessions.write().remove(session_id).is_some())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut ids: Vec<String> = self.sessions.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// One pretty-printed JSON file per session under a root directory
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    /// Create store rooted at `root` (created on first save)
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, session_id: &str) -> Result<PathBuf, StoreError> {
        let valid = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidSessionId(session_id.to_string()));
        }
        Ok(self.root.join(format!("{session_id}.json")))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, session_id: &str) -> Result<Option<SessionSnapshot>, StoreError> {
        let path = self.path_for(session_id)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn save(&self, session_id: &str, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        let path = self.path_for(session_id)?;
        std::fs::create_dir_all(&self.root).map_err(io_error(&self.root))?;
        let json = serde_json::to_string_pretty(snapshot)?;
        // Write-then-rename so readers never see a partial snapshot
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_error(&tmp))?;
        std::fs::rename(&tmp, &path).map_err(io_error(&path))?;
        tracing::debug!("Saved session {} to {}", session_id, path.display());
        Ok(())
    }

    fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        let path = self.path_for(session_id)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.root)(e)),
        };
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(io_error(&self.root))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn in_memory_round_trip() {
        let store = InMemorySessionStore::new();
        assert!(store.load("s-1").unwrap().is_none());
        store.save("s-1", &SessionSnapshot::new("s-1")).unwrap();
        assert_eq!(store.load("s-1").unwrap().unwrap().session_id, "s-1");
        assert_eq!(store.list().unwrap(), vec!["s-1"]);
        assert!(store.delete("s-1").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("sessions"));
        assert!(store.list().unwrap().is_empty());
        assert!(store.load("abc").unwrap().is_none());

        let snapshot = SessionSnapshot::new("abc");
        store.save("abc", &snapshot).unwrap();
        store.save("def", &SessionSnapshot::new("def")).unwrap();

        assert_eq!(store.load("abc").unwrap(), Some(snapshot));
        assert_eq!(store.list().unwrap(), vec!["abc", "def"]);
        assert!(store.delete("abc").unwrap());
        assert!(!store.delete("abc").unwrap());
    }

    #[test]
    fn file_store_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        for bad in ["", "../etc", "a/b", "x.json"] {
            assert!(matches!(store.load(bad), Err(StoreError::InvalidSessionId(_))));
        }
    }

    #[test]
    fn arc_store_delegates() {
        let store = Arc::new(InMemorySessionStore::new());
        let shared: Arc<dyn SessionStore> = store.clone();
        shared.save("s", &SessionSnapshot::new("s")).unwrap();
        assert_eq!(store.len(), 1);
    }
}
