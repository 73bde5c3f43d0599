//! Authentication Models
//! Mission: Define token claims and auth request/response shapes

use serde::{Deserialize, Serialize};

use crate::models::{Employee, EmployeeProfile, Role};

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (employee id)
    pub email: String,
    #[serde(default)]
    pub is_admin: bool, // absent means false
    pub iat: usize, // issued-at timestamp
    pub exp: usize, // expiration timestamp
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: usize, // seconds until expiration
    pub employee: EmployeeResponse,
}

/// Employee response (sanitized, no password hash)
#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department_id: String,
    pub profile: EmployeeProfile,
}

impl EmployeeResponse {
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            id: employee.id.to_string(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            role: employee.role,
            department_id: employee.department_id.to_string(),
            profile: employee.profile.clone(),
        }
    }
}

/// Admin-only registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>, // defaults to employee
    pub department: String, // department name
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
}
