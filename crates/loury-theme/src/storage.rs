//! Preference storage for the persisted theme name.
//!
//! The page persists exactly one string (the active theme id) under one
//! namespaced key. [`PreferenceStore`] is the seam to whatever the host
//! offers: `localStorage` in a browser, a JSON file on disk, or memory.
//!
//! ```text
//! ┌────────────────────────┐        get / set         ┌─────────────────────┐
//! │    ThemeController     │ ───────────────────────▶ │   PreferenceStore   │
//! └────────────────────────┘                          │ - MemoryStorage     │
//!                                                     │ - FileStorage       │
//!                                                     │ - host localStorage │
//!                                                     └─────────────────────┘
//! ```
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: storage failures never panic; callers get a
//!    `Result` and the theme controller keeps working without persistence.
//! 2. **Atomic writes**: file storage writes a temp file and renames it.
//! 3. **Missing is not an error**: an absent key or file reads as `None`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returns error, page keeps running |
//! | `StorageError::Serialization` | JSON encode/decode | Returns error |
//! | `StorageError::Corruption` | Poisoned lock, bad format version | Returns error |
//! | Missing entry | First run | `Ok(None)` |
//!
//! # Feature Gates
//!
//! - `file-storage`: enables [`FileStorage`]. Without it only
//!   [`MemoryStorage`] is available.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during preference storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    #[cfg(feature = "file-storage")]
    Serialization(String),
    /// Storage is corrupted or in an unexpected format.
    Corruption(String),
    /// Backend is not available (private browsing, quota, no feature).
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "file-storage")]
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// String key/value preference store.
pub trait PreferenceStore {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage (always available)
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store for tests and hosts without persistent storage.
///
/// Values are lost when the process exits.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut data = HashMap::new();
        data.insert(key.to_string(), value.to_string());
        Self {
            data: RwLock::new(data),
        }
    }
}

impl PreferenceStore for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStorage")
            .field("entries", &count)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage (requires file-storage feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "file-storage")]
mod file_storage {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// On-disk format.
    #[derive(Serialize, Deserialize)]
    struct PreferenceFile {
        format_version: u32,
        entries: BTreeMap<String, String>,
    }

    impl PreferenceFile {
        const FORMAT_VERSION: u32 = 1;

        fn new() -> Self {
            Self {
                format_version: Self::FORMAT_VERSION,
                entries: BTreeMap::new(),
            }
        }
    }

    /// JSON-file preference store.
    ///
    /// # File Format
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "entries": { "vocabloury-theme": "purple" }
    /// }
    /// ```
    ///
    /// Writes go to `{path}.tmp`, are synced, then renamed over `{path}`.
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        /// Create a store at the given path. The file is created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        /// Store at `$XDG_STATE_HOME/loury/{app_name}/preferences.json`.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            let path = state_dir()
                .join("loury")
                .join(app_name)
                .join("preferences.json");
            Self { path }
        }

        /// Location of the backing file.
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }

        fn load(&self) -> StorageResult<PreferenceFile> {
            if !self.path.exists() {
                return Ok(PreferenceFile::new());
            }
            let reader = BufReader::new(File::open(&self.path)?);
            let file: PreferenceFile = serde_json::from_reader(reader).map_err(|e| {
                StorageError::Serialization(format!("failed to parse preference file: {e}"))
            })?;
            if file.format_version != PreferenceFile::FORMAT_VERSION {
                return Err(StorageError::Corruption(format!(
                    "unsupported format version {}",
                    file.format_version
                )));
            }
            Ok(file)
        }

        fn store(&self, file: &PreferenceFile) -> StorageResult<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let tmp_path = self.temp_path();
            {
                let mut writer = BufWriter::new(File::create(&tmp_path)?);
                serde_json::to_writer_pretty(&mut writer, file).map_err(|e| {
                    StorageError::Serialization(format!("failed to serialize preferences: {e}"))
                })?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;
            tracing::debug!(
                path = %self.path.display(),
                entries = file.entries.len(),
                "saved preferences"
            );
            Ok(())
        }
    }

    fn state_dir() -> PathBuf {
        if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
            return PathBuf::from(state_home);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local").join("state");
        }
        PathBuf::from(".")
    }

    impl PreferenceStore for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.load()?.entries.get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            // An unreadable file is replaced rather than blocking every write.
            let mut file = self.load().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable preference file");
                PreferenceFile::new()
            });
            file.entries.insert(key.to_string(), value.to_string());
            self.store(&file)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            let mut file = self.load()?;
            if file.entries.remove(key).is_some() {
                self.store(&file)?;
            }
            Ok(())
        }

        fn is_available(&self) -> bool {
            match self.path.parent() {
                Some(parent) if parent.exists() => {
                    let scratch = parent.join(".loury_test_write");
                    let ok = fs::write(&scratch, b"test").is_ok();
                    let _ = fs::remove_file(&scratch);
                    ok
                }
                Some(parent) => fs::create_dir_all(parent).is_ok(),
                None => false,
            }
        }
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStorage")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_missing_key_is_none() {
        let store = MemoryStorage::new();
        assert_eq!(store.get("vocabloury-theme").unwrap(), None);
    }

    #[test]
    fn memory_storage_set_then_get() {
        let store = MemoryStorage::new();
        store.set("k", "blue").unwrap();
        store.set("k", "green").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("green"));
    }

    #[test]
    fn memory_storage_remove_is_idempotent() {
        let store = MemoryStorage::with_entry("k", "dark");
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn storage_error_display() {
        let err = StorageError::Unavailable("quota exceeded".into());
        assert_eq!(err.to_string(), "storage unavailable: quota exceeded");
        let io = StorageError::from(std::io::Error::other("disk"));
        assert!(io.to_string().starts_with("I/O error"));
    }

    #[cfg(feature = "file-storage")]
    mod file {
        use super::super::*;

        #[test]
        fn file_storage_round_trip() {
            let dir = tempfile::tempdir().unwrap();
            let store = FileStorage::new(dir.path().join("nested").join("prefs.json"));
            assert_eq!(store.get("vocabloury-theme").unwrap(), None);
            store.set("vocabloury-theme", "purple").unwrap();

            let reopened = FileStorage::new(store.path());
            assert_eq!(
                reopened.get("vocabloury-theme").unwrap().as_deref(),
                Some("purple")
            );
            assert!(!store.path().with_extension("json.tmp").exists());
        }

        #[test]
        fn file_storage_rejects_garbage() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("prefs.json");
            std::fs::write(&path, b"not json").unwrap();
            let store = FileStorage::new(&path);
            assert!(matches!(
                store.get("k"),
                Err(StorageError::Serialization(_))
            ));
            store.set("k", "light").unwrap();
            assert_eq!(store.get("k").unwrap().as_deref(), Some("light"));
        }
    }
}
