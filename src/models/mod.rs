//! Data models for Taskboard entities.
//!
//! This module defines the core data structures:
//! - `User` - An account with a username and password
//! - `UserProjects` - The ordered project list owned by one user
//! - `Project` - A named group of tasks with type, priority and description
//! - `Task` - A work item with status, priority, description and reminders

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Status assigned to tasks created without one.
pub const DEFAULT_TASK_STATUS: &str = "Pending";

/// Read a text field written by a loosely-typed client: `null` is `""`,
/// other non-string scalars keep their JSON text.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Like [`lenient_string`], keeping `null` as `None`.
fn lenient_option<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Unparseable timestamps are dropped rather than failing the record.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(lenient_option(deserializer)?
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|t| t.with_timezone(&Utc)))
}

fn lenient_reminders<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_reminders(Some(&value)))
}

fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(normalize_status(lenient_option(deserializer)?))
}

/// A registered account.
///
/// Passwords are stored and compared as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, alias = "UserName", deserialize_with = "lenient_string")]
    pub username: String,

    #[serde(default, alias = "Password", deserialize_with = "lenient_string")]
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// All projects belonging to one user, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProjects {
    #[serde(default, alias = "UserName", deserialize_with = "lenient_string")]
    pub username: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
}

impl UserProjects {
    /// Create an empty collection for the given user.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            projects: Vec::new(),
        }
    }
}

/// Editable project fields, as sent by the front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub project_type: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub priority: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

/// A project owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Stable identifier (e.g., "prj-1a2b3c4d"). Empty for records written
    /// before ids existed; storage backfills it on load.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub project_type: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub priority: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Task>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Create a new project with no tasks.
    pub fn new(id: String, fields: ProjectFields) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: fields.name,
            project_type: fields.project_type,
            priority: fields.priority,
            description: fields.description,
            tasks: Vec::new(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// The project every new account starts with.
    pub fn getting_started(id: String) -> Self {
        Self::new(
            id,
            ProjectFields {
                name: "Getting Started".to_string(),
                project_type: "Personal".to_string(),
                priority: "Low".to_string(),
                description: "Welcome to your first project!".to_string(),
            },
        )
    }

    /// Overwrite the editable fields, keeping id and tasks.
    pub fn apply(&mut self, fields: ProjectFields) {
        self.name = fields.name;
        self.project_type = fields.project_type;
        self.priority = fields.priority;
        self.description = fields.description;
        self.updated_at = Some(Utc::now());
    }
}

fn default_status() -> String {
    DEFAULT_TASK_STATUS.to_string()
}

/// Task fields after request normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub priority: String,
    pub description: String,
    pub reminders: Vec<String>,
    pub status: String,
}

/// A task inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier (e.g., "tsk-1a2b3c4d")
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub priority: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,

    #[serde(default, deserialize_with = "lenient_reminders")]
    pub reminders: Vec<String>,

    #[serde(default = "default_status", deserialize_with = "lenient_status")]
    pub status: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: String, fields: TaskFields) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: fields.title,
            priority: fields.priority,
            description: fields.description,
            reminders: fields.reminders,
            status: fields.status,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Overwrite every editable field.
    pub fn apply(&mut self, fields: TaskFields) {
        self.title = fields.title;
        self.priority = fields.priority;
        self.description = fields.description;
        self.reminders = fields.reminders;
        self.status = fields.status;
        self.updated_at = Some(Utc::now());
    }

    pub fn set_status(&mut self, status: String) {
        self.status = status;
        self.updated_at = Some(Utc::now());
    }
}

/// Normalize a loosely-typed `reminders` value into a list.
///
/// Arrays are kept (non-string elements become their JSON text), a
/// truthy scalar becomes a single reminder, and anything falsy
/// (absent, `null`, `""`, `false`, `0`) becomes an empty list.
pub fn normalize_reminders(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Bool(true)) => vec!["true".to_string()],
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => vec![n.to_string()],
        Some(other @ Value::Object(_)) => vec![other.to_string()],
        _ => Vec::new(),
    }
}

/// Normalize a task status, defaulting empty or missing values to "Pending".
pub fn normalize_status(status: Option<String>) -> String {
    status
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_status)
}

/// Task fields as received from a client, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskInput {
    #[serde(default, deserialize_with = "lenient_option")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient_option")]
    pub priority: Option<String>,

    #[serde(default, deserialize_with = "lenient_option")]
    pub description: Option<String>,

    /// A list, a single value, or nothing.
    #[serde(default)]
    pub reminders: Option<Value>,

    #[serde(default, deserialize_with = "lenient_option")]
    pub status: Option<String>,
}

impl TaskInput {
    pub fn into_fields(self) -> TaskFields {
        TaskFields {
            reminders: normalize_reminders(self.reminders.as_ref()),
            status: normalize_status(self.status),
            title: self.title.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        }
    }
}
