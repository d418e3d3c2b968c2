//! Shared client logic for the case documents application.
//!
//! Everything here is free of browser APIs so it can be exercised by plain
//! `cargo test`; the `frontend` crate wires it to Yew components and the
//! network, the `host` crate only serves the compiled bundle.

pub mod api;
pub mod copies;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod model;
pub mod session;
pub mod signature;
pub mod templates;
pub mod validation;

pub use error::ClientError;
