//! Storage layer for Taskboard data.
//!
//! This module handles persistence of users and their projects.
//!
//! Each entity type lives in one JSON file (a "store") inside the data
//! directory, by default `~/.local/share/taskboard/`:
//!
//! - `users.json` (or `db.json` in minimal mode) - array of users
//! - `projects.json` - array of per-user project collections
//!
//! Every request loads the whole file, mutates it in memory and writes the
//! whole file back. There is no cross-process locking: two processes
//! sharing a data directory are last-writer-wins.

pub mod backend;
pub mod store;

pub use backend::{BackendType, FileBackend, MemoryBackend, StorageBackend};
pub use store::{CORRUPT_SUFFIX, CorruptPolicy, JsonStore, Keyed, KeyedStore, StoreHealth};

use crate::models::{User, UserProjects};
use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Default file name of the user store.
pub const USERS_FILE: &str = "users.json";
/// Default file name of the user store in minimal mode.
pub const MINIMAL_USERS_FILE: &str = "db.json";
/// Default file name of the project store.
pub const PROJECTS_FILE: &str = "projects.json";

/// File names and parse policy for a [`Storage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageOptions {
    pub users_file: String,
    pub projects_file: String,
    pub corrupt_policy: CorruptPolicy,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            users_file: USERS_FILE.to_string(),
            projects_file: PROJECTS_FILE.to_string(),
            corrupt_policy: CorruptPolicy::default(),
        }
    }
}

/// Storage manager holding the user and project stores.
pub struct Storage {
    backend: Box<dyn StorageBackend>,
    options: StorageOptions,
}

impl Storage {
    /// Open file-backed storage in `data_dir`, creating the directory if needed.
    pub fn open(data_dir: &Path, options: StorageOptions) -> Result<Self> {
        let backend = FileBackend::new(data_dir)?;
        Ok(Self::with_backend(Box::new(backend), options))
    }

    /// Storage that lives only in memory.
    pub fn in_memory(options: StorageOptions) -> Self {
        Self::with_backend(Box::new(MemoryBackend::new()), options)
    }

    pub fn with_backend(backend: Box<dyn StorageBackend>, options: StorageOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &StorageOptions {
        &self.options
    }

    /// The user store.
    pub fn users(&mut self) -> JsonStore<'_, User> {
        JsonStore::new(
            self.backend.as_mut(),
            &self.options.users_file,
            self.options.corrupt_policy,
        )
    }

    /// The project store.
    pub fn projects(&mut self) -> JsonStore<'_, UserProjects> {
        JsonStore::new(
            self.backend.as_mut(),
            &self.options.projects_file,
            self.options.corrupt_policy,
        )
    }

    /// Raw contents of a store file, if present.
    pub fn raw(&self, file: &str) -> Result<Option<String>> {
        self.backend.read(file)
    }

    /// Inspect both store files.
    pub fn health(&mut self) -> Result<Vec<(String, StoreHealth)>> {
        let users = self.users();
        let users_health = (users.file().to_string(), users.health()?);
        let projects = self.projects();
        let projects_health = (projects.file().to_string(), projects.health()?);
        Ok(vec![users_health, projects_health])
    }

    /// Get the storage location description.
    pub fn location(&self) -> String {
        self.backend.location()
    }

    pub fn backend_type(&self) -> BackendType {
        self.backend.backend_type()
    }
}

/// Get the default data directory, `<XDG data dir>/taskboard`.
pub fn default_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("taskboard"))
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a stable identifier for a project or task.
///
/// Format: `<prefix>-<8 hex chars>`
/// - Project prefix: "prj"
/// - Task prefix: "tsk"
pub fn generate_id(prefix: &str, seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(
        chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or(0)
            .to_le_bytes(),
    );
    hasher.update(ID_COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    let hash = hasher.finalize();
    let hash_hex = format!("{:x}", hash);
    format!("{}-{}", prefix, &hash_hex[..8])
}

/// Identifier derived only from `seed`, so the same record gets the same id
/// on every load until one is saved.
pub fn derive_id(prefix: &str, seed: &str) -> String {
    let hash = Sha256::digest(seed.as_bytes());
    format!("{}-{}", prefix, &format!("{:x}", hash)[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    #[test]
    fn test_generate_id_format() {
        let id = generate_id("prj", "test seed");
        assert!(id.starts_with("prj-"));
        assert_eq!(id.len(), 12); // "prj-" + 8 hex chars
    }

    #[test]
    fn test_generate_id_uniqueness_same_seed() {
        let ids: std::collections::HashSet<_> =
            (0..100).map(|_| generate_id("tsk", "same")).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_derive_id_is_stable() {
        let id = derive_id("prj", "ana/0/Home");
        assert_eq!(id, derive_id("prj", "ana/0/Home"));
        assert_ne!(id, derive_id("prj", "ana/1/Home"));
        assert_eq!(id.len(), 12);
    }

    #[test]
    fn test_open_uses_configured_files() {
        let env = TestEnv::new();
        let mut storage = env.open_storage_with(StorageOptions {
            users_file: MINIMAL_USERS_FILE.to_string(),
            ..StorageOptions::default()
        });
        storage.users().append(User::new("ana", "pw")).unwrap();

        assert!(env.data_path().join("db.json").exists());
        assert!(!env.data_path().join("users.json").exists());
        assert_eq!(storage.backend_type(), BackendType::File);
    }

    #[test]
    fn test_stores_are_independent() {
        let env = TestEnv::new();
        let mut storage = env.open_storage();
        storage.users().append(User::new("ana", "pw")).unwrap();
        storage.projects().upsert(UserProjects::new("ana")).unwrap();

        assert_eq!(storage.users().list().unwrap().len(), 1);
        assert_eq!(storage.projects().list().unwrap().len(), 1);
    }

    #[test]
    fn test_health_reports_each_file() {
        let env = TestEnv::new();
        std::fs::write(env.data_path().join("projects.json"), "{{{").unwrap();
        let mut storage = env.open_storage();
        storage.users().append(User::new("ana", "pw")).unwrap();

        let health = storage.health().unwrap();
        assert_eq!(
            health[0],
            ("users.json".to_string(), StoreHealth::Ok { records: 1 })
        );
        assert!(matches!(health[1].1, StoreHealth::Corrupt { .. }));
    }

    #[test]
    fn test_reopen_sees_saved_data() {
        let env = TestEnv::new();
        env.open_storage()
            .users()
            .append(User::new("ana", "pw"))
            .unwrap();
        let mut reopened = env.open_storage();
        assert_eq!(
            reopened.users().get("ana").unwrap(),
            Some(User::new("ana", "pw"))
        );
    }
}
