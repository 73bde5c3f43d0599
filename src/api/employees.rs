//! Employee handlers.
//!
//! Reads go through the sanitized `EmployeeResponse`; the stored bcrypt
//! hash never appears in a response body.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{routes::AppState, ApiError};
use crate::auth::models::EmployeeResponse;
use crate::models::Role;
use crate::store::employees::EmployeeChanges;

#[derive(Serialize)]
pub struct EmployeesResponse {
    pub count: usize,
    pub employees: Vec<EmployeeResponse>,
}

#[derive(Deserialize)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>, // department name
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
}

/// List a department's roster - GET /api/departments/:name/employees
pub async fn list_department_employees(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<EmployeesResponse>, ApiError> {
    let department = state
        .db
        .department_by_name(&name)?
        .ok_or(ApiError::NotFound(format!("Department {} not found", name)))?;

    let employees = state
        .db
        .employees_by_department(&department.id)?
        .iter()
        .map(EmployeeResponse::from_employee)
        .collect::<Vec<_>>();

    Ok(Json(EmployeesResponse {
        count: employees.len(),
        employees,
    }))
}

/// Get one employee - GET /api/employees/:id
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    state
        .db
        .employee_by_id(&id)?
        .map(|e| Json(EmployeeResponse::from_employee(&e)))
        .ok_or(ApiError::NotFound(format!("Employee {} not found", id)))
}

/// Partially update an employee - PUT /api/employees/by-name/:name (admin)
pub async fn update_employee(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    // Department changes arrive by name and are resolved to an id here.
    let department_id = match payload.department {
        Some(dept_name) => Some(
            state
                .db
                .department_by_name(&dept_name)?
                .ok_or(ApiError::Validation(format!(
                    "Unknown department {}",
                    dept_name
                )))?
                .id,
        ),
        None => None,
    };

    let changes = EmployeeChanges {
        name: payload.name,
        role: payload.role,
        department_id,
        phone: payload.phone,
        address: payload.address,
        position: payload.position,
    };

    state
        .db
        .update_employee_by_name(&name, changes)?
        .map(|e| Json(EmployeeResponse::from_employee(&e)))
        .ok_or(ApiError::NotFound(format!("Employee {} not found", name)))
}

/// Delete an employee - DELETE /api/employees/by-name/:name (admin)
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.db.delete_employee_by_name(&name)? {
        return Err(ApiError::NotFound(format!("Employee {} not found", name)));
    }

    tracing::info!("🗑️  Employee deleted: {}", name);

    Ok(StatusCode::NO_CONTENT)
}
