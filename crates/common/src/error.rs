/// Scribe error types
#[derive(Debug, thiserror::Error)]
pub enum ScribeError {
    /// Transcription/STT related error
    #[error("STT error: {0}")]
    Stt(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScribeError {
    /// Create STT error
    pub fn stt<S: Into<String>>(msg: S) -> Self {
        Self::Stt(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stt_error_display() {
        let err = ScribeError::stt("decode failed");
        assert_eq!(err.to_string(), "STT error: decode failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ScribeError = io.into();
        assert!(matches!(err, ScribeError::Io(_)));
    }
}
