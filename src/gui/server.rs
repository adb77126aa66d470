//! Web server serving the front end and API endpoints

use axum::{
    Json, Router,
    extract::{Path as AxumPath, State},
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::error::{JsonError, TextError};
use crate::commands::{self, Credentials, ItemRef};
use crate::config::{Mode, ResolvedConfig};
use crate::models::{Project, ProjectFields, TaskInput, User};
use crate::storage::Storage;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage for both stores. Every handler holds the lock for its whole
    /// load-modify-save cycle, so requests never interleave writes.
    pub storage: Arc<Mutex<Storage>>,
    /// Which route set is exposed
    pub mode: Mode,
}

impl AppState {
    pub fn new(storage: Storage, mode: Mode) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            mode,
        }
    }
}

/// Where the front end's files live.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    /// Directory served for any path not matched by an API route
    pub dir: PathBuf,
    /// File served for `/`, relative to `dir`
    pub landing_page: Option<String>,
}

type JsonResult<T> = Result<Json<T>, JsonError>;

/// Build the router for the given state.
pub fn build_router(state: AppState, assets: Option<&StaticAssets>) -> Router {
    let api = match state.mode {
        Mode::Full => Router::new()
            .route("/api/register", post(register))
            .route("/api/login", post(login))
            .route(
                "/api/projects/:username",
                get(list_projects).post(create_project),
            )
            .route(
                "/api/projects/:username/:project",
                put(update_project).delete(delete_project),
            )
            .route("/api/projects/:username/:project/tasks", post(create_task))
            .route(
                "/api/projects/:username/:project/tasks/:task",
                put(update_task).delete(delete_task),
            )
            .route(
                "/api/projects/:username/:project/tasks/:task/status",
                put(update_task_status),
            ),
        Mode::Minimal => Router::new()
            .route("/api/register", post(register))
            .route("/api/users", get(list_users)),
    };

    let mut app = api.with_state(state);

    if let Some(assets) = assets {
        if let Some(page) = &assets.landing_page {
            app = app.route_service("/", ServeFile::new(assets.dir.join(page)));
        }
        app = app.fallback_service(ServeDir::new(&assets.dir));
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the web server and run until Ctrl-C.
pub async fn start_server(config: &ResolvedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Storage::open(config.data_dir(), config.storage_options())?;
    let mode = config.mode();

    let static_dir = config.static_dir.value.clone();
    if !static_dir.is_dir() {
        tracing::warn!(dir = %static_dir.display(), "static directory not found, only the API will answer");
    }
    let assets = StaticAssets {
        dir: static_dir,
        landing_page: config.landing_page.as_ref().map(|p| p.value.clone()),
    };

    tracing::info!(
        location = %storage.location(),
        users = %config.users_file.value,
        projects = %config.projects_file.value,
        "opened storage"
    );

    let app = build_router(AppState::new(storage, mode), Some(&assets));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, %mode, "taskboard listening on http://{}", addr);
    println!("Server running at http://{}/", addr);
    println!("Press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

/// Register a new account
async fn register(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<&'static str, TextError> {
    let mut storage = state.storage.lock().await;
    Ok(commands::register(&mut storage, state.mode, &credentials)?)
}

/// Check credentials
async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<&'static str, TextError> {
    let mut storage = state.storage.lock().await;
    Ok(commands::login(&mut storage, &credentials)?)
}

/// Dump every user record (minimal mode only)
async fn list_users(State(state): State<AppState>) -> JsonResult<Vec<User>> {
    let mut storage = state.storage.lock().await;
    Ok(Json(commands::list_users(&mut storage)?))
}

/// Get all projects for a user
async fn list_projects(
    State(state): State<AppState>,
    AxumPath(username): AxumPath<String>,
) -> JsonResult<Vec<Project>> {
    let mut storage = state.storage.lock().await;
    Ok(Json(commands::list_projects(&mut storage, &username)?))
}

/// Add a new project
async fn create_project(
    State(state): State<AppState>,
    AxumPath(username): AxumPath<String>,
    Json(fields): Json<ProjectFields>,
) -> JsonResult<Value> {
    let mut storage = state.storage.lock().await;
    let project = commands::create_project(&mut storage, &username, fields)?;
    Ok(Json(json!({ "success": true, "id": project.id })))
}

/// Edit a project
async fn update_project(
    State(state): State<AppState>,
    AxumPath((username, project)): AxumPath<(String, String)>,
    Json(fields): Json<ProjectFields>,
) -> JsonResult<Value> {
    let mut storage = state.storage.lock().await;
    commands::update_project(&mut storage, &username, &ItemRef::parse(&project), fields)?;
    Ok(Json(json!({ "success": true })))
}

/// Delete a project
async fn delete_project(
    State(state): State<AppState>,
    AxumPath((username, project)): AxumPath<(String, String)>,
) -> JsonResult<Value> {
    let mut storage = state.storage.lock().await;
    commands::delete_project(&mut storage, &username, &ItemRef::parse(&project))?;
    Ok(Json(json!({ "success": true })))
}

/// Add a task to a project
async fn create_task(
    State(state): State<AppState>,
    AxumPath((username, project)): AxumPath<(String, String)>,
    Json(input): Json<TaskInput>,
) -> JsonResult<Value> {
    let mut storage = state.storage.lock().await;
    let task = commands::create_task(&mut storage, &username, &ItemRef::parse(&project), input)?;
    Ok(Json(json!({ "success": true, "id": task.id })))
}

/// Edit every field of a task
async fn update_task(
    State(state): State<AppState>,
    AxumPath((username, project, task)): AxumPath<(String, String, String)>,
    Json(input): Json<TaskInput>,
) -> JsonResult<Value> {
    let mut storage = state.storage.lock().await;
    commands::update_task(
        &mut storage,
        &username,
        &ItemRef::parse(&project),
        &ItemRef::parse(&task),
        input,
    )?;
    Ok(Json(json!({ "success": true })))
}

/// Request body for a status change
#[derive(Deserialize)]
struct StatusRequest {
    #[serde(default)]
    status: Option<String>,
}

/// Change task status (drag and drop between columns)
async fn update_task_status(
    State(state): State<AppState>,
    AxumPath((username, project, task)): AxumPath<(String, String, String)>,
    Json(request): Json<StatusRequest>,
) -> JsonResult<Value> {
    let mut storage = state.storage.lock().await;
    commands::update_task_status(
        &mut storage,
        &username,
        &ItemRef::parse(&project),
        &ItemRef::parse(&task),
        request.status,
    )?;
    Ok(Json(json!({ "success": true })))
}

/// Delete a task
async fn delete_task(
    State(state): State<AppState>,
    AxumPath((username, project, task)): AxumPath<(String, String, String)>,
) -> JsonResult<Value> {
    let mut storage = state.storage.lock().await;
    commands::delete_task(
        &mut storage,
        &username,
        &ItemRef::parse(&project),
        &ItemRef::parse(&task),
    )?;
    Ok(Json(json!({ "success": true })))
}
