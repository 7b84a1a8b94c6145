use scribe_common::{Result, ScribeError};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio;
use crate::types::{Segment, Transcription};

/// Speech-to-text backend seam
///
/// The server holds the engine behind this trait so tests can substitute a
/// mock and so the blocking inference call is explicit at the boundary.
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file at `path` (blocking)
    fn transcribe_file(&self, path: &Path) -> Result<Transcription>;
}

/// GPU device type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuDevice {
    /// CUDA (NVIDIA GPU)
    Cuda,
    /// Metal (Apple GPU)
    Metal,
    /// CPU only
    Cpu,
}

/// Whisper STT engine
pub struct WhisperEngine {
    ctx: Arc<WhisperContext>,
    model_path: String,
    gpu_device: GpuDevice,
}

impl WhisperEngine {
    /// Detect available GPU device (priority: CUDA > Metal > CPU)
    ///
    /// GPU support is controlled by compile-time feature flags:
    /// `--features cuda` selects the CUDA backend, `--features metal` the
    /// Metal backend, otherwise CPU only.
    fn detect_gpu_device() -> GpuDevice {
        if cfg!(feature = "cuda") {
            info!("CUDA feature enabled; building Whisper with CUDA backend");
            GpuDevice::Cuda
        } else if cfg!(feature = "metal") {
            info!("Metal feature enabled; building Whisper with Metal backend");
            GpuDevice::Metal
        } else {
            info!("No GPU features enabled; building Whisper for CPU only");
            GpuDevice::Cpu
        }
    }

    /// Load a Whisper model from disk
    ///
    /// This is a blocking, potentially slow operation meant to run exactly
    /// once at startup, before the server starts accepting traffic.
    ///
    /// # Arguments
    /// * `model_path` - Path to the Whisper model file (.bin or .gguf)
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(ScribeError::stt(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        let path_str = path.to_str().ok_or_else(|| {
            ScribeError::stt(format!("Model path is not valid UTF-8: {}", path.display()))
        })?;

        info!("Loading Whisper model from: {}", path.display());

        let gpu_device = Self::detect_gpu_device();
        info!("Using device: {:?}", gpu_device);

        // whisper-rs uses the GPU automatically when the matching feature
        // is compiled in
        let params = WhisperContextParameters::default();

        let ctx = match WhisperContext::new_with_params(path_str, params) {
            Ok(ctx) => ctx,
            Err(e) => {
                // Retry on CPU when GPU initialization fails
                if gpu_device != GpuDevice::Cpu {
                    warn!("Failed to load model with GPU ({:?}): {}", gpu_device, e);
                    warn!("Falling back to CPU");

                    let cpu_params = WhisperContextParameters::default();
                    WhisperContext::new_with_params(path_str, cpu_params).map_err(|e| {
                        ScribeError::stt(format!(
                            "Failed to load Whisper model even with CPU: {}",
                            e
                        ))
                    })?
                } else {
                    return Err(ScribeError::stt(format!(
                        "Failed to load Whisper model: {}",
                        e
                    )));
                }
            }
        };

        info!("Whisper model loaded successfully");

        Ok(Self {
            ctx: Arc::new(ctx),
            model_path: path.to_string_lossy().to_string(),
            gpu_device,
        })
    }

    /// Get model path
    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// Get GPU device being used
    pub fn gpu_device(&self) -> GpuDevice {
        self.gpu_device
    }
}

impl Transcriber for WhisperEngine {
    fn transcribe_file(&self, path: &Path) -> Result<Transcription> {
        if !path.exists() {
            return Err(ScribeError::stt(format!(
                "Audio file not found: {}",
                path.display()
            )));
        }

        info!("Transcribing audio file: {}", path.display());

        let audio_data = audio::decode_audio(path)?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some("auto"));
        params.set_temperature(0.0);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        // The context is shared read-only; each call gets its own state, so
        // concurrent transcriptions do not need external locking.
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| ScribeError::stt(format!("Failed to create Whisper state: {}", e)))?;

        debug!("Starting Whisper inference...");
        state
            .full(params, &audio_data)
            .map_err(|e| ScribeError::stt(format!("Inference failed: {}", e)))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| ScribeError::stt(format!("Failed to get segment count: {}", e)))?;

        debug!("Transcription complete, {} segments found", num_segments);

        let mut segments = Vec::new();
        let mut full_text = String::new();

        for i in 0..num_segments {
            let segment_text = state
                .full_get_segment_text(i)
                .map_err(|e| ScribeError::stt(format!("Failed to get segment text: {}", e)))?;

            let start = state
                .full_get_segment_t0(i)
                .map_err(|e| ScribeError::stt(format!("Failed to get segment start time: {}", e)))?;

            let end = state
                .full_get_segment_t1(i)
                .map_err(|e| ScribeError::stt(format!("Failed to get segment end time: {}", e)))?;

            let text = segment_text.trim().to_string();
            if text.is_empty() {
                continue;
            }

            if !full_text.is_empty() {
                full_text.push(' ');
            }
            full_text.push_str(&text);

            // Whisper reports timestamps in centiseconds
            segments.push(Segment::new(start as f32 / 100.0, end as f32 / 100.0, text));
        }

        info!(
            "Transcription successful: {} segments, {} characters",
            segments.len(),
            full_text.len()
        );

        Ok(Transcription::new(full_text, segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_load_with_missing_model() {
        let result = WhisperEngine::load("nonexistent_model.bin");
        let err = result.err().unwrap();
        assert!(err.to_string().contains("Model file not found"));
    }
}
