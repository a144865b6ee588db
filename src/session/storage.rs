//! Session persistence backends
//!
//! Two kinds of storage back the session:
//! - [`DurableStorage`] survives restarts and holds the session record.
//! - [`TabStorage`] is short-lived, scoped to one terminal "tab", and only
//!   carries the reload marker. It is strictly best-effort.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use super::store::SessionRecord;
use crate::error::StorageError;

type Result<T> = std::result::Result<T, StorageError>;

/// Durable key-value storage for the session record
#[async_trait]
pub trait DurableStorage: Send + Sync {
    /// Read the persisted record, `None` if nothing was ever stored
    async fn load(&self) -> Result<Option<SessionRecord>>;

    /// Replace the persisted record
    async fn save(&self, record: &SessionRecord) -> Result<()>;
}

/// JSON file storage, one file per storage key
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage for `key` inside `dir` (`<dir>/<key>.json`)
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DurableStorage for FileStorage {
    async fn load(&self) -> Result<Option<SessionRecord>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };

        let record = serde_json::from_str(&contents)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(record))
    }

    async fn save(&self, record: &SessionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        let contents =
            serde_json::to_string(record).map_err(|e| StorageError::Corrupt(e.to_string()))?;

        // Tokens are credentials; the file is private from the moment it exists
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            options.mode(0o600);
        }
        let mut file = options
            .open(&self.path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        // `mode` only applies on creation; tighten files left by older versions
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        file.write_all(contents.as_bytes())
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(())
    }
}

/// Short-lived per-tab flags. Implementations swallow their own failures.
pub trait TabStorage: Send + Sync {
    fn set_flag(&self, key: &str);

    /// Remove the flag, returning whether it was set
    fn take_flag(&self, key: &str) -> bool;

    fn has_flag(&self, key: &str) -> bool;
}

/// Flag files in a per-tab directory under the system temp dir
pub struct TabDirStorage {
    dir: PathBuf,
}

impl TabDirStorage {
    pub fn for_tab(tab_id: &str) -> Self {
        Self::at(std::env::temp_dir().join(format!("guardian-{}", tab_id)))
    }

    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Resolve the current tab: explicit id, else the parent (shell) process
    pub fn current_tab_id(explicit: Option<&str>) -> String {
        match explicit {
            Some(id) => id.to_string(),
            None => default_tab_id(),
        }
    }

    fn flag_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[cfg(unix)]
fn default_tab_id() -> String {
    std::os::unix::process::parent_id().to_string()
}

#[cfg(not(unix))]
fn default_tab_id() -> String {
    "default".to_string()
}

impl TabStorage for TabDirStorage {
    fn set_flag(&self, key: &str) {
        let result = std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(self.flag_path(key), "true"));
        if let Err(e) = result {
            log::debug!("Tab storage unavailable, skipping flag {}: {}", key, e);
        }
    }

    fn take_flag(&self, key: &str) -> bool {
        let path = self.flag_path(key);
        let set = self.has_flag(key);
        if set {
            if let Err(e) = std::fs::remove_file(&path) {
                log::debug!("Failed to remove tab flag {}: {}", path.display(), e);
            }
        }
        set
    }

    fn has_flag(&self, key: &str) -> bool {
        std::fs::read_to_string(self.flag_path(key))
            .map(|value| value.trim() == "true")
            .unwrap_or(false)
    }
}

/// In-process durable storage for tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    record: std::sync::Mutex<Option<SessionRecord>>,
    saves: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            record: std::sync::Mutex::new(Some(record)),
            saves: Default::default(),
        }
    }

    pub fn stored(&self) -> Option<SessionRecord> {
        self.record.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl DurableStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<SessionRecord>> {
        Ok(self.record.lock().unwrap().clone())
    }

    async fn save(&self, record: &SessionRecord) -> Result<()> {
        self.saves.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.record.lock().unwrap() = Some(record.clone());
        Ok(())
    }
}

/// In-process tab storage for tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryTabStorage {
    flags: std::sync::Mutex<std::collections::HashSet<String>>,
}

#[cfg(test)]
impl TabStorage for MemoryTabStorage {
    fn set_flag(&self, key: &str) {
        self.flags.lock().unwrap().insert(key.to_string());
    }

    fn take_flag(&self, key: &str) -> bool {
        self.flags.lock().unwrap().remove(key)
    }

    fn has_flag(&self, key: &str) -> bool {
        self.flags.lock().unwrap().contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn signed_in() -> SessionRecord {
        SessionRecord {
            access_token: Some("access".to_string()),
            refresh_token: Some("refresh".to_string()),
            is_authenticated: true,
        }
    }

    #[tokio::test]
    async fn test_file_storage_missing_file_is_empty() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path(), "auth-storage");
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_storage_round_trip_and_layout() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(&temp.path().join("data"), "auth-storage");
        storage.save(&signed_in()).await.unwrap();

        assert_eq!(storage.load().await.unwrap(), Some(signed_in()));

        let raw = std::fs::read_to_string(storage.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["accessToken"], "access");
        assert_eq!(json["refreshToken"], "refresh");
        assert_eq!(json["isAuthenticated"], true);
        assert!(json.get("hydrated").is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_storage_keeps_tokens_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let fresh = FileStorage::new(&temp.path().join("fresh"), "auth-storage");
        fresh.save(&signed_in()).await.unwrap();
        let mode = std::fs::metadata(fresh.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let existing = FileStorage::new(temp.path(), "auth-storage");
        std::fs::write(existing.path(), "{}").unwrap();
        std::fs::set_permissions(existing.path(), std::fs::Permissions::from_mode(0o644)).unwrap();
        existing.save(&signed_in()).await.unwrap();
        let mode = std::fs::metadata(existing.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(existing.load().await.unwrap(), Some(signed_in()));
    }

    #[tokio::test]
    async fn test_file_storage_reads_null_tokens() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path(), "auth-storage");
        std::fs::write(
            storage.path(),
            r#"{"accessToken":null,"refreshToken":null,"isAuthenticated":false}"#,
        )
        .unwrap();

        assert_eq!(storage.load().await.unwrap(), Some(SessionRecord::default()));
    }

    #[tokio::test]
    async fn test_file_storage_corrupt_file() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path(), "auth-storage");
        std::fs::write(storage.path(), "{not json").unwrap();

        assert!(matches!(storage.load().await, Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_tab_dir_flags() {
        let temp = tempdir().unwrap();
        let tab = TabDirStorage::at(temp.path().join("tab-1"));

        assert!(!tab.has_flag("reload"));
        assert!(!tab.take_flag("reload"));

        tab.set_flag("reload");
        assert!(tab.has_flag("reload"));
        assert!(tab.take_flag("reload"));
        assert!(!tab.has_flag("reload"));
    }

    #[test]
    fn test_tab_dir_unavailable_is_silent() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        // A regular file where the directory should be
        let tab = TabDirStorage::at(blocker.join("tab"));

        tab.set_flag("reload");
        assert!(!tab.has_flag("reload"));
        assert!(!tab.take_flag("reload"));
    }

    #[test]
    fn test_explicit_tab_id_wins() {
        assert_eq!(TabDirStorage::current_tab_id(Some("tab-7")), "tab-7");
        assert!(!TabDirStorage::current_tab_id(None).is_empty());
    }
}
