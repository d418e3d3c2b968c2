use actix_web::web::{self, get, resource};
use actix_web::{HttpResponse, Resource};

use common::api::dto::RuntimeConfig;
use common::api::routes::APP_CONFIG_PATH;

/// Config handed to the frontend, shared by every worker.
#[derive(Debug, Clone)]
pub struct AppConfigState {
    pub runtime: RuntimeConfig,
}

impl AppConfigState {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            runtime: RuntimeConfig {
                api_url: api_url.into(),
            },
        }
    }
}

pub fn configure_routes() -> Resource {
    resource(APP_CONFIG_PATH).route(get().to(process))
}

async fn process(state: web::Data<AppConfigState>) -> HttpResponse {
    log::debug!("serving runtime config (api url '{}')", state.runtime.api_url);
    HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(&state.runtime)
}
