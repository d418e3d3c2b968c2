//! Runtime configuration served by the host next to the bundle.

use gloo_net::http::Request;

use common::api::dto::RuntimeConfig;
use common::api::routes::APP_CONFIG_PATH;

pub type AppConfig = RuntimeConfig;

/// Fetches the config, falling back to same-origin on any failure.
pub async fn load() -> AppConfig {
    match Request::get(APP_CONFIG_PATH).send().await {
        Ok(resp) if resp.ok() => match resp.json::<AppConfig>().await {
            Ok(config) => {
                log::debug!("API base URL: '{}'", config.api_url);
                config
            }
            Err(err) => {
                log::warn!("invalid {}: {}; using same-origin API", APP_CONFIG_PATH, err);
                AppConfig::default()
            }
        },
        Ok(resp) => {
            log::warn!(
                "{} answered {}; using same-origin API",
                APP_CONFIG_PATH,
                resp.status()
            );
            AppConfig::default()
        }
        Err(err) => {
            log::warn!("could not load {}: {}; using same-origin API", APP_CONFIG_PATH, err);
            AppConfig::default()
        }
    }
}
