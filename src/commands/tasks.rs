//! Task commands for tasks nested under a project.

use super::projects::{ItemRef, with_project};
use crate::models::{Task, TaskInput, normalize_status};
use crate::storage::{Storage, generate_id};
use crate::{Error, Result};

pub const TASK_NOT_FOUND: &str = "Task not found";

/// Append a task to a project. Reminders and status are normalized.
pub fn create_task(
    storage: &mut Storage,
    username: &str,
    project: &ItemRef,
    input: TaskInput,
) -> Result<Task> {
    // Missing project reports "Project not found" like the project routes.
    let task = with_project(
        storage,
        username,
        project,
        super::projects::PROJECT_NOT_FOUND,
        |c, pos| {
            let project = &mut c.projects[pos];
            let fields = input.into_fields();
            let id = generate_id("tsk", &format!("{}/{}", project.id, fields.title));
            let task = Task::new(id, fields);
            project.tasks.push(task.clone());
            Ok(task)
        },
    )?;
    tracing::info!(username, task = %task.id, "created task");
    Ok(task)
}

/// Run `f` on one task, failing with "Task not found" if either the
/// project or the task does not resolve.
fn with_task<R>(
    storage: &mut Storage,
    username: &str,
    project: &ItemRef,
    task: &ItemRef,
    f: impl FnOnce(&mut Vec<Task>, usize) -> R,
) -> Result<R> {
    with_project(storage, username, project, TASK_NOT_FOUND, |c, pos| {
        let tasks = &mut c.projects[pos].tasks;
        let task_pos = task
            .position(tasks.as_slice(), |t| t.id.as_str())
            .ok_or_else(|| Error::NotFound(TASK_NOT_FOUND.to_string()))?;
        Ok(f(tasks, task_pos))
    })
}

/// Overwrite every field of one task.
pub fn update_task(
    storage: &mut Storage,
    username: &str,
    project: &ItemRef,
    task: &ItemRef,
    input: TaskInput,
) -> Result<Task> {
    with_task(storage, username, project, task, |tasks, pos| {
        tasks[pos].apply(input.into_fields());
        tasks[pos].clone()
    })
}

/// Overwrite only the status of one task. A missing or empty status
/// resets it to "Pending".
pub fn update_task_status(
    storage: &mut Storage,
    username: &str,
    project: &ItemRef,
    task: &ItemRef,
    status: Option<String>,
) -> Result<Task> {
    let status = normalize_status(status);
    with_task(storage, username, project, task, |tasks, pos| {
        tasks[pos].set_status(status);
        tasks[pos].clone()
    })
}

/// Remove one task; later tasks shift down by one position.
pub fn delete_task(
    storage: &mut Storage,
    username: &str,
    project: &ItemRef,
    task: &ItemRef,
) -> Result<Task> {
    let removed = with_task(storage, username, project, task, |tasks, pos| {
        tasks.remove(pos)
    })?;
    tracing::info!(username, task = %removed.id, "deleted task");
    Ok(removed)
}
