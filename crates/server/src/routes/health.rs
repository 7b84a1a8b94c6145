use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::state::AppState;
use crate::types::{HealthResponse, RootResponse};

/// Liveness check, reports the configured model variant
#[get("/")]
pub async fn root(state: web::Data<Arc<AppState>>) -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(RootResponse {
        status: "ok".to_string(),
        model: state.config.model_size.clone(),
    }))
}

/// Health check, independent of model state
#[get("/health")]
pub async fn health() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use scribe_common::AppConfig;
    use scribe_stt::{Transcriber, Transcription};
    use std::path::Path;

    struct NeverCalled;

    impl Transcriber for NeverCalled {
        fn transcribe_file(&self, _path: &Path) -> scribe_common::Result<Transcription> {
            panic!("health endpoints must not touch the engine");
        }
    }

    fn test_state(model_size: &str) -> Arc<AppState> {
        let mut config = AppConfig::default();
        config.model_size = model_size.to_string();
        Arc::new(AppState::new(config, Arc::new(NeverCalled)))
    }

    #[actix_web::test]
    async fn test_health_returns_ok() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state("base")))
                .service(health),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_root_reports_configured_model() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state("small")))
                .service(root),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "small");
    }
}
