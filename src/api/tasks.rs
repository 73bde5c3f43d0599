//! Task handlers.
//!
//! Creation routes the new task through the least-loaded selector; the
//! task inherits the selected employee's department, which is how the
//! department/assignee invariant is established. Updates do not
//! re-validate it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{routes::AppState, ApiError};
use crate::assignment::select_assignee;
use crate::models::{Department, Task, TaskStatus};
use crate::store::tasks::TaskChanges;

#[derive(Serialize)]
pub struct TasksResponse {
    pub count: usize,
    pub tasks: Vec<Task>,
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Optional; defaults to 7 days after creation.
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

fn department_by_name(state: &AppState, name: &str) -> Result<Department, ApiError> {
    state
        .db
        .department_by_name(name)?
        .ok_or(ApiError::NotFound(format!("Department {} not found", name)))
}

/// List a department's tasks - GET /api/departments/:name/tasks
pub async fn list_department_tasks(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TasksResponse>, ApiError> {
    let department = department_by_name(&state, &name)?;
    let tasks = state.db.tasks_by_department(&department.id)?;

    Ok(Json(TasksResponse {
        count: tasks.len(),
        tasks,
    }))
}

/// Get one task - GET /api/departments/:name/tasks/:id
pub async fn get_task(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, Uuid)>,
) -> Result<Json<Task>, ApiError> {
    let department = department_by_name(&state, &name)?;

    state
        .db
        .task_by_id(&id, &department.id)?
        .map(Json)
        .ok_or(ApiError::NotFound(format!("Task {} not found", id)))
}

/// Create a task - POST /api/departments/:name/tasks
///
/// The assignee is chosen by the least-loaded selector. A department
/// with no employees is an assignment failure: no task is created.
pub async fn create_task(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation(
            "Task title must not be empty".to_string(),
        ));
    }

    let department = department_by_name(&state, &name)?;

    let assignee =
        select_assignee(&state.db, &department.id)?.ok_or(ApiError::NoAssignableEmployee)?;

    let task = Task::new(
        payload.title,
        payload.description,
        department.id,
        assignee.id,
        payload.due_date,
    );
    state.db.create_task(&task)?;

    tracing::info!(
        "📋 Task {} assigned to {} in {}",
        task.title,
        assignee.email,
        department.name
    );

    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially update a task - PUT /api/departments/:name/tasks/:id
pub async fn update_task(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let department = department_by_name(&state, &name)?;

    let task = state
        .db
        .task_by_id(&id, &department.id)?
        .ok_or(ApiError::NotFound(format!("Task {} not found", id)))?;

    let updated = state.db.update_task(
        &task,
        TaskChanges {
            title: payload.title,
            description: payload.description,
            status: payload.status,
            assigned_to: payload.assigned_to,
            due_date: payload.due_date,
        },
    )?;

    Ok(Json(updated))
}

/// Delete a task - DELETE /api/departments/:name/tasks/:id (admin)
pub async fn delete_task(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let department = department_by_name(&state, &name)?;

    if !state.db.delete_task_by_id(&id, &department.id)? {
        return Err(ApiError::NotFound(format!("Task {} not found", id)));
    }

    tracing::info!("🗑️  Task deleted: {}", id);

    Ok(StatusCode::NO_CONTENT)
}
