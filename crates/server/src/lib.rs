//! Scribe HTTP server
//!
//! Actix-web REST API exposing liveness, health and transcription routes

pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use scribe_common::{AppConfig, Result};
use scribe_stt::Transcriber;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::state::AppState;

/// Build the CORS layer from the configured origin list
///
/// A wildcard (the default) yields a fully permissive policy, matching the
/// development-convenience behavior of allowing any origin with credentials.
fn build_cors(origins: Option<&[String]>) -> Cors {
    match origins {
        None => Cors::permissive(),
        Some(origins) => {
            let mut cors = Cors::default()
                .allow_any_method()
                .allow_any_header()
                .supports_credentials()
                .max_age(3600);
            for origin in origins {
                cors = cors.allowed_origin(origin);
            }
            cors
        }
    }
}

/// Run the HTTP server until it is stopped
///
/// The engine is loaded by the caller, exactly once, before this is invoked.
pub async fn start_server(config: AppConfig, engine: Arc<dyn Transcriber>) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let allowed_origins = config.cors_origins();
    let state = Arc::new(AppState::new(config, engine));

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(build_cors(allowed_origins.as_deref()))
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::trim())
            .service(routes::health::root)
            .service(routes::health::health)
            .service(routes::transcribe::transcribe)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
