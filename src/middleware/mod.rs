//! Middleware for observability and abuse protection.
//!
//! This module provides:
//! - Request logging with latency tracking
//! - Rate limiting per IP address on the login route

pub mod logging;
pub mod rate_limit;

pub use logging::request_logging;
pub use rate_limit::{rate_limit_middleware, RateLimitConfig, RateLimitLayer};
