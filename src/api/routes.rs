//! Router construction and gate wiring per route tier.

use axum::{
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::auth::{api as auth_api, require_admin, require_user, JwtHandler};
use crate::middleware::{rate_limit_middleware, request_logging, RateLimitLayer};
use crate::store::Database;

use super::{departments, employees, tasks};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub jwt: Arc<JwtHandler>,
}

/// Create the API router.
///
/// Three tiers: public (health + rate-limited login), authenticated
/// reads and task workflow, and admin-only mutations.
pub fn create_router(
    db: Arc<Database>,
    jwt: Arc<JwtHandler>,
    rate_limiter: RateLimitLayer,
) -> Router {
    let state = AppState {
        db,
        jwt: jwt.clone(),
    };

    let public_routes = Router::new().route("/health", get(health_check));

    let login_routes = Router::new()
        .route("/api/auth/login", post(auth_api::login))
        .route_layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ))
        .with_state(state.clone());

    let user_routes = Router::new()
        .route("/api/auth/me", get(auth_api::me))
        .route("/api/departments", get(departments::list_departments))
        .route("/api/departments/:name", get(departments::get_department))
        .route(
            "/api/departments/:name/employees",
            get(employees::list_department_employees),
        )
        .route("/api/employees/:id", get(employees::get_employee))
        .route(
            "/api/departments/:name/tasks",
            get(tasks::list_department_tasks).post(tasks::create_task),
        )
        .route(
            "/api/departments/:name/tasks/:id",
            get(tasks::get_task).put(tasks::update_task),
        )
        .route_layer(middleware::from_fn_with_state(jwt.clone(), require_user))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/api/auth/register", post(auth_api::register))
        .route("/api/departments", post(departments::create_department))
        .route(
            "/api/departments/:name",
            put(departments::update_department).delete(departments::delete_department),
        )
        .route(
            "/api/employees/by-name/:name",
            put(employees::update_employee).delete(employees::delete_employee),
        )
        .route(
            "/api/departments/:name/tasks/:id",
            delete(tasks::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(jwt, require_admin))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(login_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
