//! Department handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::{routes::AppState, ApiError};
use crate::models::Department;
use crate::store::departments::DepartmentChanges;

#[derive(Serialize)]
pub struct DepartmentsResponse {
    pub count: usize,
    pub departments: Vec<Department>,
}

#[derive(Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// List all departments - GET /api/departments
pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<DepartmentsResponse>, ApiError> {
    let departments = state.db.all_departments()?;

    Ok(Json(DepartmentsResponse {
        count: departments.len(),
        departments,
    }))
}

/// Get one department - GET /api/departments/:name
pub async fn get_department(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Department>, ApiError> {
    state
        .db
        .department_by_name(&name)?
        .map(Json)
        .ok_or(ApiError::NotFound(format!("Department {} not found", name)))
}

/// Create a department - POST /api/departments (admin)
pub async fn create_department(
    State(state): State<AppState>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<Department>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Department name must not be empty".to_string(),
        ));
    }

    if state.db.department_by_name(&payload.name)?.is_some() {
        return Err(ApiError::Validation(format!(
            "Department {} already exists",
            payload.name
        )));
    }

    let department = state
        .db
        .create_department(&payload.name, &payload.description)?;

    tracing::info!("✅ Department created: {}", department.name);

    Ok((StatusCode::CREATED, Json(department)))
}

/// Partially update a department - PUT /api/departments/:name (admin)
pub async fn update_department(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<UpdateDepartmentRequest>,
) -> Result<Json<Department>, ApiError> {
    let changes = DepartmentChanges {
        name: payload.name,
        description: payload.description,
    };

    state
        .db
        .update_department_by_name(&name, changes)?
        .map(Json)
        .ok_or(ApiError::NotFound(format!("Department {} not found", name)))
}

/// Delete a department - DELETE /api/departments/:name (admin)
pub async fn delete_department(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.db.delete_department_by_name(&name)? {
        return Err(ApiError::NotFound(format!("Department {} not found", name)));
    }

    tracing::info!("🗑️  Department deleted: {}", name);

    Ok(StatusCode::NO_CONTENT)
}
