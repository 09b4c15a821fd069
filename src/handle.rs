//! Lazily-initialized access point to the process's single store
//!
//! Instead of a static accessor, one `StoreHandle` is created at the
//! composition root and passed to whatever needs the store. `get` takes
//! `&mut self`, so first-access initialization is serialized by ownership;
//! sharing a handle across threads means wrapping it in the caller's own lock.

use crate::config;
use crate::storage::ScoreStore;
use crate::{Result, StoreError};
use std::path::{Path, PathBuf};

/// Owns at most one live [`ScoreStore`] for a fixed path.
#[derive(Debug)]
pub struct StoreHandle {
    path: PathBuf,
    store: Option<ScoreStore>,
}

impl StoreHandle {
    /// Handle for the database at `path`. Nothing is opened until [`get`](Self::get).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            store: None,
        }
    }

    /// Handle for the default save file
    pub fn with_default_path() -> Self {
        Self::new(config::default_database_path())
    }

    /// Path the store is (or will be) opened at
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a store is currently open
    pub fn is_ready(&self) -> bool {
        self.store.as_ref().is_some_and(ScoreStore::is_open)
    }

    /// Return the open store, opening and initializing it first if needed.
    ///
    /// A failed initialization is not cached: the next call tries again.
    pub fn get(&mut self) -> Result<&ScoreStore> {
        if !self.is_ready() {
            self.store = None;

            let mut store = ScoreStore::new();
            let opened = config::ensure_db_dir(&self.path)
                .map_err(|e| StoreError::OpenFailed(format!("{}: {}", self.path.display(), e)))
                .and_then(|()| store.initialize(&self.path));
            if let Err(e) = opened {
                tracing::warn!("Failed to initialize store at {:?}: {}", self.path, e);
                return Err(e);
            }
            tracing::debug!("Store initialized at {:?}", self.path);
            self.store = Some(store);
        }

        self.store.as_ref().ok_or(StoreError::NotOpen)
    }

    /// Close the store if one is open; the next `get` opens a fresh one.
    pub fn shutdown(&mut self) {
        if let Some(mut store) = self.store.take() {
            store.close();
            tracing::debug!("Store at {:?} closed", self.path);
        }
    }
}

impl Drop for StoreHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ScoreRecord;
    use tempfile::TempDir;

    #[test]
    fn test_get_initializes_lazily() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saves").join("GameData.db");
        let mut handle = StoreHandle::new(&path);

        assert!(!handle.is_ready());
        assert!(!path.exists());

        handle.get().unwrap();
        assert!(handle.is_ready());
        assert!(path.exists());
    }

    #[test]
    fn test_get_reuses_instance() {
        let dir = TempDir::new().unwrap();
        let mut handle = StoreHandle::new(dir.path().join("GameData.db"));

        handle
            .get()
            .unwrap()
            .insert(&mut ScoreRecord::new("Ada", 10))
            .unwrap();
        assert_eq!(handle.get().unwrap().count().unwrap(), 1);
    }

    #[test]
    fn test_default_path_handle() {
        let handle = StoreHandle::with_default_path();

        assert_eq!(handle.path(), config::default_database_path().as_path());
        assert!(handle.path().ends_with(config::DATABASE_FILE_NAME));
        assert!(!handle.is_ready());
    }

    #[test]
    fn test_unusable_directory_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let mut handle = StoreHandle::new(blocker.join("GameData.db"));
        assert!(matches!(handle.get(), Err(StoreError::OpenFailed(_))));
        assert!(!handle.is_ready());
    }

    #[test]
    fn test_failed_init_is_retried() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("GameData.db");
        std::fs::write(&path, vec![b'x'; 4096]).unwrap();

        let mut handle = StoreHandle::new(&path);
        assert!(matches!(handle.get(), Err(StoreError::OpenFailed(_))));
        assert!(!handle.is_ready());

        std::fs::remove_file(&path).unwrap();
        assert!(handle.get().is_ok());
        assert!(handle.is_ready());
    }

    #[test]
    fn test_shutdown_then_get_reopens() {
        let dir = TempDir::new().unwrap();
        let mut handle = StoreHandle::new(dir.path().join("GameData.db"));

        handle
            .get()
            .unwrap()
            .insert(&mut ScoreRecord::new("Ada", 10))
            .unwrap();

        handle.shutdown();
        assert!(!handle.is_ready());
        handle.shutdown();

        assert_eq!(handle.get().unwrap().count().unwrap(), 1);
    }
}
