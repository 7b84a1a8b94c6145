use crate::error::ScribeError;
use crate::models;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Scribe application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Whisper model variant (tiny, base, small, medium, large-v3)
    pub model_size: String,

    /// Allowed CORS origins: "*" or a comma-separated list
    pub allowed_origins: String,

    /// Directory holding downloaded model files
    pub models_dir: PathBuf,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_size: "base".to_string(),
            allowed_origins: "*".to_string(),
            models_dir: models::default_models_dir(),
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, ScribeError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let config = Self {
            model_size: std::env::var("MODEL_SIZE")
                .unwrap_or_else(|_| "base".to_string()),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
            models_dir: Self::get_env_path("MODELS_DIR")
                .unwrap_or_else(models::default_models_dir),
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            log_dir: Self::get_env_path("LOG_DIR")
                .unwrap_or_else(|| PathBuf::from("./log")),
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string()),
        };

        // Ensure required directories exist
        config.ensure_directories()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), ScribeError> {
        let dirs = vec![&self.models_dir, &self.log_dir];

        for dir in dirs {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    ScribeError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Explicit CORS origin list, or None when any origin is allowed
    pub fn cors_origins(&self) -> Option<Vec<String>> {
        let raw = self.allowed_origins.trim();
        if raw.is_empty() || raw == "*" {
            return None;
        }

        let origins: Vec<String> = raw
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        if origins.is_empty() {
            None
        } else {
            Some(origins)
        }
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ScribeError> {
        // Validate model variant against the known catalogue
        if !models::available_models()
            .iter()
            .any(|m| m.name == self.model_size)
        {
            return Err(ScribeError::config(format!(
                "Unknown model size '{}' (expected one of: {})",
                self.model_size,
                models::available_models()
                    .iter()
                    .map(|m| m.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(ScribeError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.model_size, "base");
        assert_eq!(config.allowed_origins, "*");
    }

    #[test]
    fn test_server_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.server_bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_cors_origins_wildcard() {
        let config = AppConfig::default();
        assert!(config.cors_origins().is_none());

        let mut config = AppConfig::default();
        config.allowed_origins = String::new();
        assert!(config.cors_origins().is_none());
    }

    #[test]
    fn test_cors_origins_list() {
        let mut config = AppConfig::default();
        config.allowed_origins =
            "http://localhost:5173, http://127.0.0.1:5173 ,".to_string();

        let origins = config.cors_origins().unwrap();
        assert_eq!(
            origins,
            vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string()
            ]
        );
    }

    #[test]
    fn test_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let mut invalid_config = AppConfig::default();
        invalid_config.model_size = "gigantic".to_string();
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = AppConfig::default();
        invalid_config.server_port = 0;
        assert!(invalid_config.validate().is_err());
    }
}
