//! HTTP routes of the host: the runtime config and the embedded bundle.
//!
//! The REST API itself lives elsewhere; the browser talks to it directly
//! using the base URL published at `/app-config.json`.

mod app_config;
mod assets;

use actix_web::web;

pub use app_config::AppConfigState;
pub use assets::{has_index, serve_embedded};

/// Registers every route on an `App`. The bundle fallback goes last so it
/// never shadows the config route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(app_config::configure_routes())
        .default_service(web::route().to(assets::serve_embedded));
}
