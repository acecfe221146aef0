//! # STEM Academy Portal Server
//!
//! Serves the project catalog, the community board and the explanation
//! assistant over a JSON API, mirroring a hierarchical document store.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod portal;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_telemetry(&TelemetryConfig::from_env(&config.service_name));

    tracing::info!(host = %config.host, port = config.port, "Starting portal server");

    let state = AppState::new(&config).await?;
    let portal = state.portal.clone();

    HttpServer::new(move || {
        let state = state.clone();
        let limiter = Arc::clone(&state.limiter);
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(Arc::clone(&state.tokens)))
            .app_data(web::Data::new(state))
            .configure(move |cfg| handlers::configure_routes(cfg, limiter))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    portal.shutdown().await;
    tracing::info!("Portal server stopped");
    Ok(())
}
