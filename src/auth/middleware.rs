//! Authentication Middleware
//! Mission: Gate routes behind token verification and the admin flag
//!
//! Both gate variants share one extraction pipeline; `require_admin`
//! layers a privilege check on top of it. An admin-check failure is a
//! 403 authorization failure, distinct from the 401 identity failures.

use crate::auth::{jwt::JwtHandler, models::Claims};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Gate failure taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    NoToken,
    MalformedHeader,
    InvalidToken,
    AdminRequired,
}

/// Pull the bearer credential out of the Authorization header and verify
/// it. Header format: `Authorization: Bearer <token>` (split on
/// whitespace, second token is the credential).
fn extract_and_verify(jwt: &JwtHandler, headers: &HeaderMap) -> Result<Claims, AuthError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::NoToken)?;

    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let token = value
        .split_whitespace()
        .nth(1)
        .ok_or(AuthError::MalformedHeader)?;

    jwt.verify_token(token).map_err(|_| AuthError::InvalidToken)
}

/// Gate for any authenticated employee. Attaches the decoded claims to
/// request extensions for downstream handlers.
pub async fn require_user(
    State(jwt): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = extract_and_verify(&jwt, req.headers())?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Gate for admins only: the shared pipeline plus the privilege check.
pub async fn require_admin(
    State(jwt): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = extract_and_verify(&jwt, req.headers())?;

    if !claims.is_admin {
        warn!("Admin route refused for {}", claims.email);
        return Err(AuthError::AdminRequired);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Extract claims from a request (use behind one of the gates).
pub fn extract_claims(req: &Request) -> Option<&Claims> {
    req.extensions().get::<Claims>()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::NoToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            AuthError::MalformedHeader => (
                StatusCode::UNAUTHORIZED,
                "Invalid authorization header. Use: Bearer {token}",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::AdminRequired => (StatusCode::FORBIDDEN, "Admin privileges required"),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, EmployeeProfile, Role};
    use axum::{body::Body, http::Request as HttpRequest};
    use chrono::Utc;
    use uuid::Uuid;

    fn handler() -> JwtHandler {
        JwtHandler::new("test-secret-key-12345".to_string())
    }

    fn token_for(role: Role) -> String {
        let employee = Employee {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            role,
            department_id: Uuid::new_v4(),
            profile: EmployeeProfile::default(),
            created_at: Utc::now(),
        };
        handler().issue_token(&employee).unwrap().0
    }

    fn headers_with(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = value {
            headers.insert(header::AUTHORIZATION, v.parse().unwrap());
        }
        headers
    }

    #[test]
    fn test_missing_header_is_no_token() {
        let result = extract_and_verify(&handler(), &headers_with(None));
        assert_eq!(result.unwrap_err(), AuthError::NoToken);
    }

    #[test]
    fn test_header_without_credential_is_malformed() {
        let result = extract_and_verify(&handler(), &headers_with(Some("Bearer")));
        assert_eq!(result.unwrap_err(), AuthError::MalformedHeader);
    }

    #[test]
    fn test_garbage_credential_is_invalid() {
        let result = extract_and_verify(&handler(), &headers_with(Some("Bearer nonsense")));
        assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_valid_token_round_trips_claims() {
        let token = token_for(Role::Employee);
        let claims =
            extract_and_verify(&handler(), &headers_with(Some(&format!("Bearer {token}"))))
                .unwrap();

        assert_eq!(claims.email, "test@example.com");
        assert!(!claims.is_admin);
    }

    #[test]
    fn test_admin_token_carries_flag() {
        let token = token_for(Role::Admin);
        let claims =
            extract_and_verify(&handler(), &headers_with(Some(&format!("Bearer {token}"))))
                .unwrap();
        assert!(claims.is_admin);
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AuthError::NoToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::MalformedHeader.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::AdminRequired.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_extract_claims_from_request() {
        let mut req = HttpRequest::new(Body::empty());
        assert!(extract_claims(&req).is_none());

        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            is_admin: false,
            iat: 0,
            exp: 10,
        };
        req.extensions_mut().insert(claims);

        assert_eq!(
            extract_claims(&req).map(|c| c.email.as_str()),
            Some("test@example.com")
        );
    }
}
