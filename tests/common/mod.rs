//! Common test utilities for taskboard integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `~/.local/share/taskboard/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;
pub use tempfile::TempDir;

/// A test environment with an isolated data directory.
///
/// The `tb()` method returns a `Command` that sets `TB_DATA_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the tb binary with isolated data directory.
    pub fn tb(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tb"));
        cmd.current_dir(self.data_dir.path());
        cmd.env("TB_DATA_DIR", self.data_dir.path());
        for var in ["TB_CONFIG", "TB_HOST", "TB_PORT", "TB_MODE", "TB_STATIC_DIR", "TB_CORRUPT_POLICY", "TB_LOG_DIR"] {
            cmd.env_remove(var);
        }
        cmd
    }

    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }

    /// Write a file into the data directory.
    pub fn write(&self, name: &str, contents: &str) {
        std::fs::write(self.data_dir.path().join(name), contents).unwrap();
    }

    /// Seed users.json and projects.json with one account.
    pub fn with_account(self, username: &str) -> Self {
        self.write(
            "users.json",
            &format!(r#"[{{"username":"{}","password":"pw"}}]"#, username),
        );
        self.write(
            "projects.json",
            &format!(
                r#"[{{"username":"{}","projects":[{{"name":"Getting Started","type":"Personal","priority":"Low","description":"Welcome to your first project!","tasks":[{{"title":"t","priority":"High","description":"","reminders":[],"status":"Pending"}}]}}]}}]"#,
                username
            ),
        );
        self
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
