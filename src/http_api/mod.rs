use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::chart::{self, ChartOptions};
use crate::persistence::{PersistenceError, TaskDocument};
use crate::task_validation;
use crate::{Schedule, ScheduleError, ScheduleSummary, Task, TaskId, TaskRepository};

/// Shared server state: exactly one current repository snapshot.
///
/// Writers build a new repository and swap the `Arc`; readers clone the `Arc`
/// and schedule outside the lock, so a run never sees a half-applied edit.
#[derive(Clone)]
pub struct AppState {
    tasks: Arc<RwLock<Arc<TaskRepository>>>,
    chart: Arc<ChartOptions>,
}

impl AppState {
    pub fn new(tasks: TaskRepository, chart: ChartOptions) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(Arc::new(tasks))),
            chart: Arc::new(chart),
        }
    }

    pub fn snapshot(&self) -> Arc<TaskRepository> {
        self.tasks.read().clone()
    }

    fn replace(&self, tasks: TaskRepository) {
        *self.tasks.write() = Arc::new(tasks);
    }

    fn update<F>(&self, edit: F) -> Result<Arc<TaskRepository>, ApiError>
    where
        F: FnOnce(&TaskRepository) -> Result<TaskRepository, ApiError>,
    {
        let mut guard = self.tasks.write();
        let next = Arc::new(edit(&guard)?);
        *guard = next.clone();
        Ok(next)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Schedule(ScheduleError),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        ApiError::Schedule(value)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Schedule(err) => {
                let status = match err {
                    ScheduleError::CyclicDependency { .. }
                    | ScheduleError::UnknownPrerequisite { .. } => StatusCode::CONFLICT,
                    ScheduleError::InvalidDuration { .. } => StatusCode::BAD_REQUEST,
                    ScheduleError::MissingStart { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                    ScheduleError::TimelineTooLong { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, err.kind(), err.to_string())
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub title: String,
    pub start: f64,
    pub finish: f64,
    pub total_float: f64,
    pub is_critical: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub tasks: Vec<ScheduledTask>,
    pub summary: ScheduleSummary,
}

#[derive(Debug, Deserialize)]
struct ChartQuery {
    dark_mode: Option<bool>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).put(replace_tasks))
        .route(
            "/tasks/:id",
            get(get_task).put(upsert_task).delete(delete_task),
        )
        .route("/schedule", get(get_schedule))
        .route("/chart.svg", get(get_chart))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_tasks(State(state): State<AppState>) -> Json<TaskDocument> {
    Json(TaskDocument::from_repository(&state.snapshot()))
}

async fn replace_tasks(
    State(state): State<AppState>,
    Json(document): Json<TaskDocument>,
) -> Result<Json<TaskDocument>, ApiError> {
    let tasks = document.into_repository()?;
    let current = TaskDocument::from_repository(&tasks);
    state.replace(tasks);
    Ok(Json(current))
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<TaskId>,
) -> Result<Json<Task>, ApiError> {
    state
        .snapshot()
        .get(task_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("task {task_id} not found")))
}

async fn upsert_task(
    State(state): State<AppState>,
    Path(task_id): Path<TaskId>,
    Json(task): Json<Task>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    if task.id != task_id {
        return Err(ApiError::invalid(
            "task id in payload does not match path parameter",
        ));
    }
    task_validation::validate_task(&task).map_err(|err| ApiError::invalid(err.to_string()))?;

    let mut created = false;
    state.update(|current| {
        let mut next = current.clone();
        created = next.insert(task.clone()).is_none();
        Ok(next)
    })?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(task)))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<TaskId>,
) -> Result<StatusCode, ApiError> {
    state.update(|current| {
        if !current.contains(task_id) {
            return Err(ApiError::not_found(format!("task {task_id} not found")));
        }
        Ok(current.without_task(task_id))
    })?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_schedule(State(state): State<AppState>) -> Result<Json<ScheduleResponse>, ApiError> {
    let tasks = state.snapshot();
    let schedule = Schedule::compute(&tasks)?;
    let analysis = schedule.analyze(&tasks)?;

    let mut scheduled = Vec::with_capacity(schedule.len());
    for (task_id, start) in schedule.iter() {
        let Some(task) = tasks.get(task_id) else {
            continue;
        };
        let float = analysis
            .floats
            .get(&task_id)
            .ok_or(ScheduleError::MissingStart { task: task_id })?;
        scheduled.push(ScheduledTask {
            id: task_id,
            title: task.title.clone(),
            start,
            finish: start + task.duration,
            total_float: float.total_float,
            is_critical: float.is_critical,
        });
    }

    let summary = schedule.summary_with(&analysis);
    Ok(Json(ScheduleResponse {
        tasks: scheduled,
        summary,
    }))
}

async fn get_chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Response, ApiError> {
    let mut options = (*state.chart).clone();
    if let Some(dark_mode) = query.dark_mode {
        options.dark_mode = dark_mode;
    }
    let rendered = chart::render_plan(&state.snapshot(), &options)?;
    Ok((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        rendered.to_svg(),
    )
        .into_response())
}
