//! Authentication Module
//! Mission: Token-based identity with a two-tier authorization gate

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::{JwtHandler, VerifyError};
pub use middleware::{require_admin, require_user};
