//! JWT Token Handler
//! Mission: Issue and verify signed, time-limited identity tokens

use crate::auth::models::Claims;
use crate::models::Employee;
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Tokens expire one hour after issuance; there is no revocation list,
/// so a token stays valid for its full lifetime regardless of later
/// password or role changes.
const TOKEN_TTL_SECS: i64 = 3600;

/// Why a token failed verification. `Expired` means the signature was
/// valid but the token is past its expiry; everything else is `Malformed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    Expired,
    Malformed,
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyError::Expired => write!(f, "token expired"),
            VerifyError::Malformed => write!(f, "token malformed or signature mismatch"),
        }
    }
}

impl std::error::Error for VerifyError {}

/// JWT Handler for token operations
pub struct JwtHandler {
    secret: String,
}

impl JwtHandler {
    /// Create a new JWT handler with the process-wide secret key.
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Issue a signed token for an employee, expiring in one hour.
    pub fn issue_token(&self, employee: &Employee) -> Result<(String, usize)> {
        let now = Utc::now();
        let issued_at = now.timestamp() as usize;
        let expiration = now
            .checked_add_signed(chrono::Duration::seconds(TOKEN_TTL_SECS))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            sub: employee.id.to_string(),
            email: employee.email.clone(),
            is_admin: employee.role.is_admin(),
            iat: issued_at,
            exp: expiration,
        };

        debug!(
            "Issuing token for {} ({}), expires in {}s",
            employee.email, employee.id, TOKEN_TTL_SECS
        );

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")?;

        Ok((token, TOKEN_TTL_SECS as usize))
    }

    /// Verify signature and expiry, returning the decoded claims.
    /// Pure in-memory computation; never blocks.
    pub fn verify_token(&self, token: &str) -> Result<Claims, VerifyError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => VerifyError::Expired,
            _ => VerifyError::Malformed,
        })?;

        debug!("Verified token for {}", decoded.claims.email);

        Ok(decoded.claims)
    }
}
