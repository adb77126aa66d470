//! Read-only summaries printed by the CLI.

use super::CommandResult;
use crate::config::ResolvedConfig;
use crate::models::Project;
use crate::storage::{KeyedStore, Storage, StoreHealth};
use crate::Result;
use serde::Serialize;

/// Registered usernames. Passwords are never included.
#[derive(Debug, Serialize)]
pub struct UserReport {
    pub count: usize,
    pub users: Vec<String>,
}

impl UserReport {
    pub fn collect(storage: &mut Storage) -> Result<Self> {
        let users: Vec<String> = storage
            .users()
            .list()?
            .into_iter()
            .map(|u| u.username)
            .collect();
        Ok(Self {
            count: users.len(),
            users,
        })
    }
}

impl CommandResult for UserReport {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.users.is_empty() {
            return "No users.".to_string();
        }
        let mut lines = vec![format!("{} user(s):", self.count)];
        lines.extend(self.users.iter().map(|u| format!("  {}", u)));
        lines.join("\n")
    }
}

/// One line per project.
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub index: usize,
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub project_type: String,
    pub priority: String,
    pub tasks: usize,
}

impl ProjectSummary {
    fn new(index: usize, project: &Project) -> Self {
        Self {
            index,
            id: project.id.clone(),
            name: project.name.clone(),
            project_type: project.project_type.clone(),
            priority: project.priority.clone(),
            tasks: project.tasks.len(),
        }
    }
}

/// A user's projects with task counts.
#[derive(Debug, Serialize)]
pub struct ProjectReport {
    pub username: String,
    pub projects: Vec<ProjectSummary>,
}

impl ProjectReport {
    pub fn collect(storage: &mut Storage, username: &str) -> Result<Self> {
        let projects = super::list_projects(storage, username)?;
        Ok(Self {
            username: username.to_string(),
            projects: projects
                .iter()
                .enumerate()
                .map(|(i, p)| ProjectSummary::new(i, p))
                .collect(),
        })
    }
}

impl CommandResult for ProjectReport {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.projects.is_empty() {
            return format!("{} has no projects.", self.username);
        }
        let mut lines = vec![format!("{} project(s) for {}:", self.projects.len(), self.username)];
        for p in &self.projects {
            lines.push(format!(
                "  [{}] {} {} ({}, {}) - {} task(s)",
                p.index, p.id, p.name, p.project_type, p.priority, p.tasks
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct FileCheck {
    pub file: String,
    #[serde(flatten)]
    pub health: StoreHealth,
}

/// Parse status of every store file.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub location: String,
    pub files: Vec<FileCheck>,
}

impl CheckReport {
    pub fn collect(storage: &mut Storage) -> Result<Self> {
        let files = storage
            .health()?
            .into_iter()
            .map(|(file, health)| FileCheck { file, health })
            .collect();
        Ok(Self {
            location: storage.location(),
            files,
        })
    }

    /// True if no file is corrupt. Missing files are fine.
    pub fn is_healthy(&self) -> bool {
        !self
            .files
            .iter()
            .any(|f| matches!(f.health, StoreHealth::Corrupt { .. }))
    }
}

impl CommandResult for CheckReport {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("Stores in {}:", self.location)];
        for f in &self.files {
            let state = match &f.health {
                StoreHealth::Missing => "missing".to_string(),
                StoreHealth::Ok { records } => format!("ok ({} records)", records),
                StoreHealth::Corrupt { reason } => format!("corrupt: {}", reason),
            };
            lines.push(format!("  {}: {}", f.file, state));
        }
        lines.join("\n")
    }
}

/// Resolved configuration with the source of every value.
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    #[serde(flatten)]
    pub config: ResolvedConfig,
}

impl CommandResult for ConfigReport {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let c = &self.config;
        let mut lines = vec![
            format!("data-dir:       {} ({})", c.data_dir.value.display(), c.data_dir.source),
            format!("config:         {} ({})", c.config_path.value.display(), c.config_path.source),
            format!("host:           {} ({})", c.host.value, c.host.source),
            format!("port:           {} ({})", c.port.value, c.port.source),
            format!("mode:           {} ({})", c.mode.value, c.mode.source),
            format!("static-dir:     {} ({})", c.static_dir.value.display(), c.static_dir.source),
            format!("users-file:     {} ({})", c.users_file.value, c.users_file.source),
            format!("projects-file:  {} ({})", c.projects_file.value, c.projects_file.source),
            format!("corrupt-policy: {} ({})", c.corrupt_policy.value, c.corrupt_policy.source),
        ];
        if let Some(page) = &c.landing_page {
            lines.push(format!("landing-page:   {} ({})", page.value, page.source));
        }
        if let Some(dir) = &c.log_dir {
            lines.push(format!("log-dir:        {} ({})", dir.value.display(), dir.source));
        }
        lines.join("\n")
    }
}

/// Version and build information.
#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub git_commit: &'static str,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            build_timestamp: env!("TB_BUILD_TIMESTAMP"),
            git_commit: env!("TB_GIT_COMMIT"),
        }
    }
}

impl CommandResult for VersionInfo {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        format!(
            "tb {} (commit {}, built {})",
            self.version, self.git_commit, self.build_timestamp
        )
    }
}
