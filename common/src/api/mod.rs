//! Wire contract with the REST API: endpoint table and typed bodies.
//!
//! The HTTP transport itself lives in the frontend; this module only knows
//! where requests go and what they carry.

pub mod dto;
pub mod routes;

pub use routes::{API_PREFIX, Endpoint, Method};

/// Value of the `Authorization` header for a session token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
