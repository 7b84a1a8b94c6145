use scribe_common::AppConfig;
use scribe_stt::Transcriber;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Loaded transcription engine, shared across all requests
    pub engine: Arc<dyn Transcriber>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig, engine: Arc<dyn Transcriber>) -> Self {
        Self { config, engine }
    }
}
