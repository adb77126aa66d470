//! Project commands for a single user's project list.
//!
//! Projects are addressed by [`ItemRef`]: either their position in the
//! user's list or their stable id.

use crate::models::{Project, ProjectFields, UserProjects};
use crate::storage::{KeyedStore, Storage, generate_id};
use crate::{Error, Result};

pub const PROJECT_NOT_FOUND: &str = "Project not found";

/// Reference to a project or task inside its parent list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    /// Zero-based position at the time of the request
    Index(usize),
    /// Stable generated id
    Id(String),
}

impl ItemRef {
    /// Parse a path segment: all ASCII digits is an index, anything else an id.
    pub fn parse(segment: &str) -> Self {
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            match segment.parse::<usize>() {
                Ok(index) => ItemRef::Index(index),
                Err(_) => ItemRef::Id(segment.to_string()),
            }
        } else {
            ItemRef::Id(segment.to_string())
        }
    }

    /// Position of the referenced item in `items`, if it exists.
    pub fn position<T>(&self, items: &[T], id_of: impl Fn(&T) -> &str) -> Option<usize> {
        match self {
            ItemRef::Index(index) => (*index < items.len()).then_some(*index),
            ItemRef::Id(id) => items.iter().position(|item| id_of(item) == id),
        }
    }
}

impl From<&str> for ItemRef {
    fn from(segment: &str) -> Self {
        ItemRef::parse(segment)
    }
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemRef::Index(index) => write!(f, "{}", index),
            ItemRef::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Run `f` on one project of `username`, then persist the collection.
///
/// Fails with `NotFound(not_found)` if the user has no collection or the
/// project reference does not resolve. Nothing is written in that case.
pub(crate) fn with_project<R>(
    storage: &mut Storage,
    username: &str,
    project: &ItemRef,
    not_found: &str,
    f: impl FnOnce(&mut UserProjects, usize) -> Result<R>,
) -> Result<R> {
    let mut store = storage.projects();
    let mut collection = store
        .get(username)?
        .ok_or_else(|| Error::NotFound(not_found.to_string()))?;
    let pos = project
        .position(&collection.projects, |p| p.id.as_str())
        .ok_or_else(|| Error::NotFound(not_found.to_string()))?;

    let result = f(&mut collection, pos)?;
    store.upsert(collection)?;
    Ok(result)
}

/// A user's projects, or an empty list if they have none.
pub fn list_projects(storage: &mut Storage, username: &str) -> Result<Vec<Project>> {
    Ok(storage
        .projects()
        .get(username)?
        .map(|c| c.projects)
        .unwrap_or_default())
}

/// Append a new project, creating the user's collection if needed.
pub fn create_project(
    storage: &mut Storage,
    username: &str,
    fields: ProjectFields,
) -> Result<Project> {
    let mut store = storage.projects();
    let mut collection = store
        .get(username)?
        .unwrap_or_else(|| UserProjects::new(username));

    let project = Project::new(generate_id("prj", &format!("{}/{}", username, fields.name)), fields);
    collection.projects.push(project.clone());
    store.upsert(collection)?;

    tracing::info!(username, project = %project.id, "created project");
    Ok(project)
}

/// Overwrite name, type, priority and description of one project.
pub fn update_project(
    storage: &mut Storage,
    username: &str,
    project: &ItemRef,
    fields: ProjectFields,
) -> Result<Project> {
    with_project(storage, username, project, PROJECT_NOT_FOUND, |c, pos| {
        c.projects[pos].apply(fields);
        Ok(c.projects[pos].clone())
    })
}

/// Remove one project; later projects shift down by one position.
pub fn delete_project(storage: &mut Storage, username: &str, project: &ItemRef) -> Result<Project> {
    let removed = with_project(storage, username, project, PROJECT_NOT_FOUND, |c, pos| {
        Ok(c.projects.remove(pos))
    })?;
    tracing::info!(username, project = %removed.id, "deleted project");
    Ok(removed)
}
