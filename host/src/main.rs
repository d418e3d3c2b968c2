mod config;
mod services;

use std::time::Duration;

use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

use crate::config::HostConfig;
use crate::services::AppConfigState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match HostConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()));
        }
    };
    let url = config.url();

    if !services::has_index() {
        warn!("frontend bundle is missing; run `trunk build` in frontend/ and rebuild the host");
    }

    if config.open_browser {
        let url = url.clone();
        actix_web::rt::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            if let Err(err) = webbrowser::open(&url) {
                warn!("could not open a browser: {}", err);
            }
        });
    }

    info!("Server running at {} (API at {})", url, config.api_url);

    let state = web::Data::new(AppConfigState::new(config.api_url.clone()));
    HttpServer::new(move || App::new().app_data(state.clone()).configure(services::configure))
        .bind((config.bind_host.as_str(), config.port))?
        .run()
        .await
}
