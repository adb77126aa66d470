//! Command implementations for Taskboard.
//!
//! This module contains the business logic behind both the HTTP routes and
//! the CLI. Commands are organized by entity type:
//! - `account` - Registration, login and the raw user listing
//! - `projects` - Project CRUD for one user
//! - `tasks` - Task CRUD inside a project
//! - `report` - Read-only summaries printed by the CLI

pub mod account;
pub mod projects;
pub mod report;
pub mod tasks;

pub use account::{Credentials, list_users, login, register};
pub use projects::{ItemRef, create_project, delete_project, list_projects, update_project};
pub use report::{CheckReport, ConfigReport, ProjectReport, UserReport, VersionInfo};
pub use tasks::{create_task, delete_task, update_task, update_task_status};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait CommandResult {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}
