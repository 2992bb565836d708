//! File-based storage backend.

use crate::core::{ChatSession, SessionSummary};
use crate::error::Result;
use crate::storage::traits::{CollectionStore, Records};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the sessions collection.
pub const SESSIONS_FILE: &str = "sessions.json";

/// File name of the summaries collection.
pub const SUMMARIES_FILE: &str = "summaries.json";

/// File-based storage backend with atomic writes.
///
/// Keeps one pretty-printed JSON object per collection in `base_dir`.
#[derive(Debug)]
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Create a new file backend.
    ///
    /// Creates the storage directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created.
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Directory holding the collection files.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn read_collection<T: DeserializeOwned>(&self, file: &str) -> Result<Records<T>> {
        let path = self.base_dir.join(file);
        if !path.exists() {
            return Ok(Records::new());
        }
        let contents = fs::read_to_string(&path)?;
        let records: Records<T> = serde_json::from_str(&contents)?;
        Ok(records)
    }

    fn write_collection<T: Serialize>(&self, file: &str, records: &Records<T>) -> Result<()> {
        let path = self.base_dir.join(file);
        let temp = path.with_extension("tmp");

        // Serialize before touching the filesystem so a bad record never
        // produces a file at all
        let contents = serde_json::to_string_pretty(records)?;
        // Atomic rename - prevents corruption if process crashes mid-write
        if let Err(e) = fs::write(&temp, &contents).and_then(|()| fs::rename(&temp, &path)) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        Ok(())
    }
}

impl CollectionStore for FileBackend {
    fn load_sessions(&self) -> Result<Records<ChatSession>> {
        self.read_collection(SESSIONS_FILE)
    }

    fn store_sessions(&self, sessions: &Records<ChatSession>) -> Result<()> {
        self.write_collection(SESSIONS_FILE, sessions)
    }

    fn load_summaries(&self) -> Result<Records<SessionSummary>> {
        self.read_collection(SUMMARIES_FILE)
    }

    fn store_summaries(&self, summaries: &Records<SessionSummary>) -> Result<()> {
        self.write_collection(SUMMARIES_FILE, summaries)
    }

    fn location(&self) -> String {
        self.base_dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_backend() -> (FileBackend, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().to_path_buf()).unwrap();
        (backend, temp_dir)
    }

    fn sessions_with(ids: &[&str]) -> Records<ChatSession> {
        ids.iter()
            .map(|id| {
                (
                    (*id).to_string(),
                    ChatSession::new(id, Utc::now(), true, Vec::new()),
                )
            })
            .collect()
    }

    #[test]
    fn creates_storage_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let _backend = FileBackend::new(nested.clone()).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn missing_collections_load_empty() {
        let (store, _temp) = create_test_backend();
        assert!(store.load_sessions().unwrap().is_empty());
        assert!(store.load_summaries().unwrap().is_empty());
    }

    #[test]
    fn store_and_load_sessions() {
        let (store, _temp) = create_test_backend();
        store.store_sessions(&sessions_with(&["s1", "s2"])).unwrap();

        let loaded = store.load_sessions().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["s1"].session_id, "s1");
    }

    #[test]
    fn load_preserves_key_order() {
        let (store, _temp) = create_test_backend();
        store
            .store_sessions(&sessions_with(&["zeta", "alpha", "mid"]))
            .unwrap();

        let keys: Vec<String> = store.load_sessions().unwrap().into_keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn store_replaces_whole_collection() {
        let (store, _temp) = create_test_backend();
        store.store_sessions(&sessions_with(&["s1", "s2"])).unwrap();
        store.store_sessions(&sessions_with(&["s3"])).unwrap();

        let keys: Vec<String> = store.load_sessions().unwrap().into_keys().collect();
        assert_eq!(keys, ["s3"]);
    }

    #[test]
    fn atomic_write_creates_no_temp_file() {
        let (store, temp_dir) = create_test_backend();
        store.store_sessions(&sessions_with(&["s1"])).unwrap();

        assert!(!temp_dir.path().join("sessions.tmp").exists());
        assert!(temp_dir.path().join(SESSIONS_FILE).exists());
    }

    #[test]
    fn collections_use_separate_files() {
        let (store, temp_dir) = create_test_backend();
        store.store_sessions(&sessions_with(&["s1"])).unwrap();

        assert!(temp_dir.path().join(SESSIONS_FILE).exists());
        assert!(!temp_dir.path().join(SUMMARIES_FILE).exists());
    }

    #[test]
    fn corrupted_collection_returns_error() {
        let (store, temp_dir) = create_test_backend();
        fs::write(temp_dir.path().join(SESSIONS_FILE), "{ invalid }").unwrap();

        assert!(store.load_sessions().is_err());
    }

    #[test]
    fn truncated_collection_returns_error() {
        let (store, temp_dir) = create_test_backend();
        fs::write(
            temp_dir.path().join(SUMMARIES_FILE),
            r#"{"abc": {"session_id": "abc", "summary": "#,
        )
        .unwrap();

        assert!(store.load_summaries().is_err());
    }

    #[test]
    fn failed_write_leaves_previous_file_intact() {
        let (store, temp_dir) = create_test_backend();
        store.store_sessions(&sessions_with(&["kept"])).unwrap();

        // A directory where the temp file should go makes the write fail
        fs::create_dir(temp_dir.path().join("sessions.tmp")).unwrap();

        assert!(store.store_sessions(&sessions_with(&["lost"])).is_err());

        let keys: Vec<String> = store.load_sessions().unwrap().into_keys().collect();
        assert_eq!(keys, ["kept"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn partial_temp_file_is_removed() {
        let (store, temp_dir) = create_test_backend();
        store.store_sessions(&sessions_with(&["kept"])).unwrap();

        // Writes through this link fail with ENOSPC after the file is opened
        let temp = temp_dir.path().join("sessions.tmp");
        std::os::unix::fs::symlink("/dev/full", &temp).unwrap();

        assert!(store.store_sessions(&sessions_with(&["lost"])).is_err());
        assert!(fs::symlink_metadata(&temp).is_err());

        let keys: Vec<String> = store.load_sessions().unwrap().into_keys().collect();
        assert_eq!(keys, ["kept"]);
    }

    #[test]
    fn location_is_base_dir() {
        let (store, temp_dir) = create_test_backend();
        assert_eq!(store.location(), temp_dir.path().display().to_string());
    }
}
