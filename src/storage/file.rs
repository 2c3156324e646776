//! JSON file store
//!
//! Keeps every user record in one JSON array. Reads load the whole file;
//! appends rewrite it through a temporary sibling that is renamed into place.

use log::{error, info};
use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{UserRecord, UserStore};
use crate::error::StoreError;

pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write within this process only.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Opens the store, creating an empty document (and its parent
    /// directory) when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        store.ensure_exists()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        self.persist(&[])?;
        info!("Created empty user store at {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Vec<UserRecord>, StoreError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| {
            error!("Failed to read {}: {}", self.path.display(), source);
            StoreError::Read {
                path: self.path.clone(),
                source,
            }
        })?;

        serde_json::from_str(&contents).map_err(|source| {
            error!("Failed to parse {}: {}", self.path.display(), source);
            StoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn persist(&self, records: &[UserRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records).map_err(StoreError::Encode)?;
        let temp_path = self.temp_path();

        let write_result = fs::write(&temp_path, json).and_then(|_| fs::rename(&temp_path, &self.path));

        write_result.map_err(|source| {
            error!("Failed to write {}: {}", self.path.display(), source);
            if let Err(e) = fs::remove_file(&temp_path) {
                if e.kind() != ErrorKind::NotFound {
                    error!("Failed to clean up {}: {}", temp_path.display(), e);
                }
            }
            StoreError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "users.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl UserStore for JsonFileStore {
    fn all(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.load()
    }

    fn append(&self, record: UserRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();

        // Always reload: another request may have appended since our caller
        // last looked.
        let mut records = self.load()?;
        if records.iter().any(|user| user.username == record.username) {
            return Err(StoreError::DuplicateUsername(record.username));
        }

        let username = record.username.clone();
        records.push(record);
        self.persist(&records)?;

        info!(
            "Stored user {} ({} users in {})",
            username,
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(dir: &TempDir, contents: &str) -> JsonFileStore {
        let path = dir.path().join("users.json");
        fs::write(&path, contents).unwrap();
        JsonFileStore::new(path)
    }

    #[test]
    fn test_open_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("users.json");

        let store = JsonFileStore::open(&path).unwrap();

        assert!(path.exists());
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn test_open_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        fs::write(&path, r#"[{"username":"alice","password":"secret"}]"#).unwrap();

        let store = JsonFileStore::open(&path).unwrap();

        assert!(store.exists("alice").unwrap());
    }

    #[test]
    fn test_append_then_fresh_load() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, "[]");

        store.append(UserRecord::new("carol", "pw")).unwrap();

        let reopened = JsonFileStore::new(store.path().to_path_buf());
        assert!(reopened.exists("carol").unwrap());
        assert_eq!(
            reopened.find("carol").unwrap(),
            Some(UserRecord::new("carol", "pw"))
        );
    }

    #[test]
    fn test_append_preserves_order_and_format() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, r#"[{"username":"alice","password":"secret"}]"#);

        store.append(UserRecord::new("bob", "hunter2")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"username\": \"alice\""));
        let names: Vec<String> = store.all().unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["alice", "bob"]);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_append_rejects_duplicate_username() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, r#"[{"username":"alice","password":"secret"}]"#);

        let err = store.append(UserRecord::new("alice", "other")).unwrap_err();

        assert!(matches!(err, StoreError::DuplicateUsername(_)));
        assert_eq!(store.all().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));

        assert!(matches!(store.exists("alice"), Err(StoreError::Read { .. })));
        assert!(matches!(
            store.append(UserRecord::new("alice", "x")),
            Err(StoreError::Read { .. })
        ));
    }

    #[test]
    fn test_corrupt_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, "{ not json");

        assert!(matches!(store.exists("alice"), Err(StoreError::Parse { .. })));
        assert!(matches!(store.find("alice"), Err(StoreError::Parse { .. })));
        assert!(matches!(
            store.append(UserRecord::new("alice", "x")),
            Err(StoreError::Parse { .. })
        ));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[test]
    fn test_concurrent_appends_keep_usernames_unique() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(store_with(&dir, "[]"));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || store.append(UserRecord::new("dave", format!("pw{i}"))))
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(store.all().unwrap().len(), 1);
    }
}
