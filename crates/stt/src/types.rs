use serde::{Deserialize, Serialize};

/// Single transcription segment with timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds
    pub start: f32,

    /// End time in seconds
    pub end: f32,

    /// Transcribed text
    pub text: String,
}

impl Segment {
    /// Create a new segment
    pub fn new(start: f32, end: f32, text: String) -> Self {
        Self { start, end, text }
    }

    /// Get duration in seconds
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }
}

/// Complete transcription result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    /// Full transcribed text
    pub text: String,

    /// Individual segments with timestamps
    pub segments: Vec<Segment>,
}

impl Transcription {
    /// Create a new transcription
    pub fn new(text: String, segments: Vec<Segment>) -> Self {
        Self { text, segments }
    }

    /// Create from full text only (no segments)
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            segments: Vec::new(),
        }
    }

    /// Get total duration in seconds
    pub fn duration(&self) -> f32 {
        self.segments.last().map(|seg| seg.end).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_duration() {
        let seg = Segment::new(0.0, 5.5, "Hello world".to_string());
        assert_eq!(seg.duration(), 5.5);
    }

    #[test]
    fn test_transcription_duration() {
        let segments = vec![
            Segment::new(0.0, 2.0, "First segment".to_string()),
            Segment::new(2.0, 5.0, "Second segment".to_string()),
        ];
        let transcription =
            Transcription::new("First segment Second segment".to_string(), segments);
        assert_eq!(transcription.duration(), 5.0);

        let empty = Transcription::from_text("");
        assert_eq!(empty.duration(), 0.0);
    }
}
