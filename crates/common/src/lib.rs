pub mod config;
pub mod error;
pub mod logger;
pub mod models;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::ScribeError;
pub use models::{available_models, ModelManager, WhisperModel};
pub type Result<T> = std::result::Result<T, ScribeError>;
