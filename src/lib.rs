//! Taskboard - a small personal project and task tracker.
//!
//! This library provides the core functionality for the `tb` binary:
//! JSON file stores for users and projects, the account/project/task
//! operations, and the HTTP server consumed by the browser front end.

pub mod cli;
pub mod commands;
pub mod config;
pub mod gui;
pub mod logging;
pub mod models;
pub mod storage;

/// Test utilities for isolated test environments.
#[cfg(test)]
pub(crate) mod test_utils {
    use std::path::Path;
    use tempfile::TempDir;

    use crate::storage::{Storage, StorageOptions};

    /// Test environment with an isolated data directory.
    pub struct TestEnv {
        pub data_dir: TempDir,
    }

    impl TestEnv {
        pub fn new() -> Self {
            Self {
                data_dir: TempDir::new().unwrap(),
            }
        }

        pub fn data_path(&self) -> &Path {
            self.data_dir.path()
        }

        /// Open file-backed storage with default options.
        pub fn open_storage(&self) -> Storage {
            Storage::open(self.data_path(), StorageOptions::default()).unwrap()
        }

        /// Open file-backed storage with custom options.
        pub fn open_storage_with(&self, options: StorageOptions) -> Storage {
            Storage::open(self.data_path(), options).unwrap()
        }
    }

    impl Default for TestEnv {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Library-level error type for Taskboard operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field was missing or empty.
    #[error("{0}")]
    Validation(String),

    /// The record already exists (e.g. duplicate username).
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// A store file exists but could not be parsed.
    #[error("Corrupt store file {file}: {reason}")]
    Corrupt { file: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Taskboard operations.
pub type Result<T> = std::result::Result<T, Error>;
