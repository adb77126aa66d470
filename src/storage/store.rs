//! Whole-file JSON stores with a small keyed interface.
//!
//! Each store is a single JSON array. Every operation loads the entire
//! array, works on it in memory, and writes the entire array back.

use super::backend::StorageBackend;
use super::derive_id;
use crate::models::{User, UserProjects};
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Suffix of the copy kept when an unparseable store is about to be replaced.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// How to treat a store file that exists but does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptPolicy {
    /// Log a warning and treat the store as empty
    #[default]
    Empty,
    /// Fail the operation with [`Error::Corrupt`]
    Strict,
}

impl CorruptPolicy {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "empty" => Some(Self::Empty),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Strict => "strict",
        }
    }
}

impl std::fmt::Display for CorruptPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A record addressable by a string key.
pub trait Keyed: Serialize + DeserializeOwned {
    fn key(&self) -> &str;

    /// Hook run on every record after a successful load.
    fn on_load(&mut self) {}
}

impl Keyed for User {
    fn key(&self) -> &str {
        &self.username
    }
}

impl Keyed for UserProjects {
    fn key(&self) -> &str {
        &self.username
    }

    /// Assign ids to projects and tasks written before ids existed. The id
    /// depends on owner, position and name only, so repeated reads agree.
    fn on_load(&mut self) {
        for (index, project) in self.projects.iter_mut().enumerate() {
            if project.id.is_empty() {
                project.id = derive_id(
                    "prj",
                    &format!("{}/{}/{}", self.username, index, project.name),
                );
            }
            for (task_index, task) in project.tasks.iter_mut().enumerate() {
                if task.id.is_empty() {
                    task.id = derive_id(
                        "tsk",
                        &format!("{}/{}/{}", project.id, task_index, task.title),
                    );
                }
            }
        }
    }
}

/// Key-based access to a collection of records.
///
/// Route logic is written against this trait so the whole-file strategy
/// can be replaced without touching it.
pub trait KeyedStore<T> {
    /// All records in stored order.
    fn list(&self) -> Result<Vec<T>>;

    /// First record with the given key.
    fn get(&self, key: &str) -> Result<Option<T>>;

    /// Replace the first record with the same key, or append it.
    fn upsert(&mut self, record: T) -> Result<()>;

    /// Append a record without checking for an existing key.
    fn append(&mut self, record: T) -> Result<()>;

    /// Remove the first record with the given key. Returns whether one existed.
    fn delete(&mut self, key: &str) -> Result<bool>;
}

/// Result of inspecting a store file without modifying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StoreHealth {
    Missing,
    Ok { records: usize },
    Corrupt { reason: String },
}

/// A JSON array of `T` persisted under one name in a backend.
pub struct JsonStore<'a, T> {
    backend: &'a mut dyn StorageBackend,
    file: &'a str,
    policy: CorruptPolicy,
    _record: PhantomData<T>,
}

impl<'a, T: Keyed> JsonStore<'a, T> {
    pub fn new(backend: &'a mut dyn StorageBackend, file: &'a str, policy: CorruptPolicy) -> Self {
        Self {
            backend,
            file,
            policy,
            _record: PhantomData,
        }
    }

    /// Name of the backing file.
    pub fn file(&self) -> &str {
        self.file
    }

    /// Load the whole collection.
    ///
    /// A missing or blank file is an empty collection. A file that fails
    /// to parse is handled according to the store's [`CorruptPolicy`].
    pub fn load(&self) -> Result<Vec<T>> {
        let contents = match self.backend.read(self.file)? {
            Some(contents) if !contents.trim().is_empty() => contents,
            _ => {
                tracing::debug!(file = self.file, "store absent, starting empty");
                return Ok(Vec::new());
            }
        };

        match serde_json::from_str::<Vec<T>>(&contents) {
            Ok(mut records) => {
                for record in &mut records {
                    record.on_load();
                }
                tracing::debug!(file = self.file, records = records.len(), "loaded store");
                Ok(records)
            }
            Err(e) => match self.policy {
                CorruptPolicy::Empty => {
                    tracing::warn!(
                        file = self.file,
                        error = %e,
                        "store does not parse, treating as empty"
                    );
                    Ok(Vec::new())
                }
                CorruptPolicy::Strict => Err(Error::Corrupt {
                    file: self.file.to_string(),
                    reason: e.to_string(),
                }),
            },
        }
    }

    /// Overwrite the whole collection, pretty-printed with two-space indent.
    ///
    /// If the current file does not parse, it is first copied to
    /// `<file>.corrupt` so the unread records are not lost.
    pub fn save(&mut self, records: &[T]) -> Result<()> {
        self.preserve_unparsed()?;
        let contents = serde_json::to_string_pretty(records)?;
        self.backend.write(self.file, &contents)?;
        tracing::debug!(file = self.file, records = records.len(), "saved store");
        Ok(())
    }

    fn preserve_unparsed(&mut self) -> Result<()> {
        let Some(contents) = self.backend.read(self.file)? else {
            return Ok(());
        };
        if contents.trim().is_empty() || serde_json::from_str::<Vec<T>>(&contents).is_ok() {
            return Ok(());
        }
        let aside = format!("{}{}", self.file, CORRUPT_SUFFIX);
        self.backend.write(&aside, &contents)?;
        tracing::warn!(file = self.file, copy = %aside, "kept unparseable store before overwrite");
        Ok(())
    }

    /// Inspect the file without applying the corruption policy.
    pub fn health(&self) -> Result<StoreHealth> {
        let Some(contents) = self.backend.read(self.file)? else {
            return Ok(StoreHealth::Missing);
        };
        if contents.trim().is_empty() {
            return Ok(StoreHealth::Ok { records: 0 });
        }
        Ok(match serde_json::from_str::<Vec<T>>(&contents) {
            Ok(records) => StoreHealth::Ok {
                records: records.len(),
            },
            Err(e) => StoreHealth::Corrupt {
                reason: e.to_string(),
            },
        })
    }
}

impl<T: Keyed> KeyedStore<T> for JsonStore<'_, T> {
    fn list(&self) -> Result<Vec<T>> {
        self.load()
    }

    fn get(&self, key: &str) -> Result<Option<T>> {
        Ok(self.load()?.into_iter().find(|r| r.key() == key))
    }

    fn upsert(&mut self, record: T) -> Result<()> {
        let mut records = self.load()?;
        match records.iter_mut().find(|r| r.key() == record.key()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.save(&records)
    }

    fn append(&mut self, record: T) -> Result<()> {
        let mut records = self.load()?;
        records.push(record);
        self.save(&records)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        let mut records = self.load()?;
        let Some(pos) = records.iter().position(|r| r.key() == key) else {
            return Ok(false);
        };
        records.remove(pos);
        self.save(&records)?;
        Ok(true)
    }
}
