//! Web dashboard API.
//!
//! Exposes the planner operations as JSON endpoints over one shared
//! [`Session`]. The session sits behind a mutex, so interactions run
//! one at a time, request/response style. Two server processes (or a
//! server and a CLI) pointed at the same base still race each other
//! last-writer-wins; see the `sync` module docs.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::models::{Category, Horizon, JournalEntry, Priority, PrioritySummary, Task};
use crate::session::Session;
use crate::store::TableStore;
use crate::sync::SyncError;

/// Shared state: one session for the whole server process.
pub struct AppState<S> {
    pub session: Arc<Mutex<Session<S>>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

impl<S> AppState<S> {
    pub fn new(session: Session<S>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}

/// JSON error body
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Maps sync failures onto HTTP statuses: a bad index is the caller's
/// mistake, a store failure is the upstream's.
struct ApiError(SyncError);

impl From<SyncError> for ApiError {
    fn from(e: SyncError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self.0 {
            SyncError::IndexOutOfRange { .. } => (StatusCode::NOT_FOUND, "not_found"),
            SyncError::Store(_) => (StatusCode::BAD_GATEWAY, "store_unavailable"),
        };
        tracing::warn!(%status, "request failed: {}", self.0);
        (
            status,
            Json(ErrorBody {
                error,
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Task request body. Omitted fields take the planner defaults.
#[derive(Deserialize)]
struct TaskBody {
    title: String,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    horizon: Horizon,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    notes: String,
}

impl From<TaskBody> for Task {
    fn from(body: TaskBody) -> Self {
        Task {
            title: body.title,
            category: body.category,
            horizon: body.horizon,
            priority: body.priority,
            notes: body.notes,
        }
    }
}

/// Journal request body.
#[derive(Deserialize)]
struct EntryBody {
    text: String,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Refresh response: how much state came back from the store.
#[derive(Serialize)]
struct RefreshResponse {
    tasks: usize,
    journal_entries: usize,
}

/// Builds the dashboard router over any table store.
pub fn router<S>(state: AppState<S>) -> Router
where
    S: TableStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks::<S>).post(add_task::<S>))
        .route(
            "/tasks/{index}",
            put(edit_task::<S>).delete(delete_task::<S>),
        )
        .route("/journal", get(list_journal::<S>).post(add_entry::<S>))
        .route(
            "/journal/{index}",
            put(edit_entry::<S>).delete(delete_entry::<S>),
        )
        .route("/summary", get(summary::<S>))
        .route("/refresh", post(refresh::<S>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_tasks<S: TableStore + Clone + Send + Sync>(
    State(state): State<AppState<S>>,
) -> Json<Vec<Task>> {
    let session = state.session.lock().await;
    Json(session.tasks.values().cloned().collect())
}

async fn add_task<S: TableStore + Clone + Send + Sync>(
    State(state): State<AppState<S>>,
    Json(body): Json<TaskBody>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task: Task = body.into();
    let mut session = state.session.lock().await;
    session.tasks.add(task.clone()).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn edit_task<S: TableStore + Clone + Send + Sync>(
    State(state): State<AppState<S>>,
    Path(index): Path<usize>,
    Json(body): Json<TaskBody>,
) -> Result<Json<Task>, ApiError> {
    let task: Task = body.into();
    let mut session = state.session.lock().await;
    session.tasks.edit(index, task.clone()).await?;
    Ok(Json(task))
}

async fn delete_task<S: TableStore + Clone + Send + Sync>(
    State(state): State<AppState<S>>,
    Path(index): Path<usize>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.lock().await;
    session.tasks.remove(index).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_journal<S: TableStore + Clone + Send + Sync>(
    State(state): State<AppState<S>>,
) -> Json<Vec<JournalEntry>> {
    let session = state.session.lock().await;
    Json(session.journal.values().cloned().collect())
}

async fn add_entry<S: TableStore + Clone + Send + Sync>(
    State(state): State<AppState<S>>,
    Json(body): Json<EntryBody>,
) -> Result<(StatusCode, Json<JournalEntry>), ApiError> {
    let entry = JournalEntry::new(body.text);
    let mut session = state.session.lock().await;
    session.journal.add(entry.clone()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn edit_entry<S: TableStore + Clone + Send + Sync>(
    State(state): State<AppState<S>>,
    Path(index): Path<usize>,
    Json(body): Json<EntryBody>,
) -> Result<Json<JournalEntry>, ApiError> {
    let entry = JournalEntry::new(body.text);
    let mut session = state.session.lock().await;
    session.journal.edit(index, entry.clone()).await?;
    Ok(Json(entry))
}

async fn delete_entry<S: TableStore + Clone + Send + Sync>(
    State(state): State<AppState<S>>,
    Path(index): Path<usize>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.lock().await;
    session.journal.remove(index).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn summary<S: TableStore + Clone + Send + Sync>(
    State(state): State<AppState<S>>,
) -> Json<PrioritySummary> {
    let session = state.session.lock().await;
    Json(session.priority_summary())
}

async fn refresh<S: TableStore + Clone + Send + Sync>(
    State(state): State<AppState<S>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let mut session = state.session.lock().await;
    session.refresh().await?;
    Ok(Json(RefreshResponse {
        tasks: session.tasks.len(),
        journal_entries: session.journal.len(),
    }))
}
