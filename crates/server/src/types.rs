use serde::Serialize;

/// Liveness response for GET /
#[derive(Debug, Serialize)]
pub struct RootResponse {
    /// Fixed status indicator
    pub status: String,

    /// Configured model variant name
    pub model: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Fixed status indicator
    pub status: String,
}

/// Successful transcription response
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    /// Transcript text
    pub transcript: String,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub detail: String,
}
