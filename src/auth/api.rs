//! Authentication API Endpoints
//! Mission: Provide login, identity echo, and admin registration

use crate::api::routes::AppState;
use crate::auth::{
    middleware::extract_claims,
    models::{Claims, EmployeeResponse, LoginRequest, LoginResponse, RegisterRequest},
};
use crate::models::Role;
use crate::store::NewEmployee;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthApiError> {
    info!("🔐 Login attempt: {}", payload.email);

    let valid = state
        .db
        .verify_password(&payload.email, &payload.password)
        .map_err(|_| AuthApiError::InternalError)?;

    if !valid {
        warn!("❌ Failed login attempt: {}", payload.email);
        return Err(AuthApiError::InvalidCredentials);
    }

    let employee = state
        .db
        .employee_by_email(&payload.email)
        .map_err(|_| AuthApiError::InternalError)?
        .ok_or(AuthApiError::InvalidCredentials)?;

    let (token, expires_in) = state
        .jwt
        .issue_token(&employee)
        .map_err(|_| AuthApiError::InternalError)?;

    info!(
        "✅ Login successful: {} ({})",
        employee.email,
        employee.role.as_str()
    );

    Ok(Json(LoginResponse {
        token,
        expires_in,
        employee: EmployeeResponse::from_employee(&employee),
    }))
}

/// Identity echoed straight from the verified token.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
}

impl MeResponse {
    fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            email: claims.email.clone(),
            is_admin: claims.is_admin,
        }
    }
}

/// Current identity - GET /api/auth/me
/// Built from the token claims alone, no database lookup.
pub async fn me(req: Request) -> Result<Json<MeResponse>, AuthApiError> {
    let claims = extract_claims(&req).ok_or(AuthApiError::Unauthorized)?;
    Ok(Json(MeResponse::from_claims(claims)))
}

/// Register employee - POST /api/auth/register (admin gate applied at the router)
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<EmployeeResponse>), AuthApiError> {
    if payload.password.len() < 8 {
        return Err(AuthApiError::WeakPassword);
    }

    let department = state
        .db
        .department_by_name(&payload.department)
        .map_err(|_| AuthApiError::InternalError)?
        .ok_or(AuthApiError::UnknownDepartment)?;

    let exists = state
        .db
        .employee_by_email(&payload.email)
        .map_err(|_| AuthApiError::InternalError)?
        .is_some();
    if exists {
        return Err(AuthApiError::EmailTaken);
    }

    let employee = state
        .db
        .create_employee(NewEmployee {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role: payload.role.unwrap_or(Role::Employee),
            department_id: department.id,
            profile: crate::models::EmployeeProfile {
                phone: payload.phone,
                address: payload.address,
                position: payload.position,
            },
        })
        .map_err(|e| {
            warn!("Failed to create employee: {}", e);
            AuthApiError::InternalError
        })?;

    info!(
        "✅ Employee registered: {} ({}) in {}",
        employee.email,
        employee.role.as_str(),
        department.name
    );

    Ok((
        StatusCode::CREATED,
        Json(EmployeeResponse::from_employee(&employee)),
    ))
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    InvalidCredentials,
    Unauthorized,
    WeakPassword,
    EmailTaken,
    UnknownDepartment,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            AuthApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthApiError::WeakPassword => (
                StatusCode::BAD_REQUEST,
                "Password must be at least 8 characters",
            ),
            AuthApiError::EmailTaken => (StatusCode::CONFLICT, "Email already registered"),
            AuthApiError::UnknownDepartment => (StatusCode::BAD_REQUEST, "Unknown department"),
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
