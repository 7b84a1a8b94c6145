//! Scribe STT (Speech-to-Text) Engine
//!
//! Whisper.cpp based speech recognition module

pub mod audio;
pub mod engine;
pub mod types;

// Re-export main types
pub use engine::{GpuDevice, Transcriber, WhisperEngine};
pub use types::{Segment, Transcription};
