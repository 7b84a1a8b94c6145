//! Audio decoding for Whisper
//!
//! Arbitrary audio containers (webm, mp3, wav, m4a, ...) are decoded by
//! shelling out to the external `ffmpeg` binary, which must be present on
//! PATH (or pointed to via `FFMPEG_PATH`). Its absence is only detected
//! here, at transcription time.

use scribe_common::{Result, ScribeError};
use std::io::Read;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Sample rate required by Whisper
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Decode an audio file to 16kHz mono f32 samples
pub fn decode_audio(path: &Path) -> Result<Vec<f32>> {
    let wav = convert_to_wav(path)?;
    load_wav(wav.path())
}

/// Convert an audio file to 16kHz mono 16-bit WAV using ffmpeg
///
/// The converted file lives in a temporary location and is removed when the
/// returned handle is dropped.
fn convert_to_wav(input: &Path) -> Result<NamedTempFile> {
    let ffmpeg_cmd = std::env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string());

    let converted = tempfile::Builder::new()
        .prefix("scribe-decode-")
        .suffix(".wav")
        .tempfile()?;

    info!(
        "Converting audio to WAV: {} -> {}",
        input.display(),
        converted.path().display()
    );

    let output = Command::new(&ffmpeg_cmd)
        .arg("-i")
        .arg(input)
        .arg("-ar")
        .arg(WHISPER_SAMPLE_RATE.to_string())
        .args([
            "-ac", "1", // Mono
            "-c:a", "pcm_s16le", // 16-bit PCM
            "-f", "wav",
            "-y", // Overwrite output
        ])
        .arg(converted.path())
        .output()
        .map_err(|e| {
            ScribeError::stt(format!(
                "Failed to run ffmpeg: {}. Make sure ffmpeg is installed and on PATH.",
                e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScribeError::stt(format!(
            "ffmpeg conversion failed: {}",
            stderr
        )));
    }

    Ok(converted)
}

/// Load a 16-bit PCM WAV file as normalized f32 samples
pub fn load_wav(path: &Path) -> Result<Vec<f32>> {
    let file = std::fs::File::open(path)
        .map_err(|e| ScribeError::stt(format!("Failed to open WAV file: {}", e)))?;
    let mut reader = std::io::BufReader::new(file);

    // Read WAV header (44 bytes)
    let mut header = [0u8; 44];
    reader
        .read_exact(&mut header)
        .map_err(|e| ScribeError::stt(format!("Failed to read WAV header: {}", e)))?;

    // Verify RIFF header
    if &header[0..4] != b"RIFF" || &header[8..12] != b"WAVE" {
        return Err(ScribeError::stt("Invalid WAV file format".to_string()));
    }

    let num_channels = u16::from_le_bytes([header[22], header[23]]);
    let sample_rate = u32::from_le_bytes([header[24], header[25], header[26], header[27]]);
    let bits_per_sample = u16::from_le_bytes([header[34], header[35]]);

    debug!(
        "WAV file info: {}Hz, {} channels, {} bits",
        sample_rate, num_channels, bits_per_sample
    );

    if bits_per_sample != 16 {
        return Err(ScribeError::stt(format!(
            "Unsupported WAV bit depth: {}",
            bits_per_sample
        )));
    }

    // Read remaining audio data as i16 PCM
    let mut pcm_data = Vec::new();
    reader
        .read_to_end(&mut pcm_data)
        .map_err(|e| ScribeError::stt(format!("Failed to read audio data: {}", e)))?;

    let num_samples = pcm_data.len() / 2;
    let mut samples = Vec::with_capacity(num_samples);

    for i in 0..num_samples {
        let sample = i16::from_le_bytes([pcm_data[i * 2], pcm_data[i * 2 + 1]]);
        // Normalize to [-1.0, 1.0]
        samples.push(sample as f32 / 32768.0);
    }

    // If stereo, convert to mono by averaging channels
    if num_channels == 2 {
        let mut mono_samples = Vec::with_capacity(samples.len() / 2);
        for i in (0..samples.len()).step_by(2) {
            let left = samples[i];
            let right = samples.get(i + 1).copied().unwrap_or(left);
            mono_samples.push((left + right) / 2.0);
        }
        samples = mono_samples;
    }

    debug!("Loaded {} audio samples", samples.len());

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_wav(samples: &[i16], channels: u16, sample_rate: u32) -> NamedTempFile {
        let data_len = (samples.len() * 2) as u32;
        let byte_rate = sample_rate * channels as u32 * 2;
        let block_align = channels * 2;

        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&channels.to_le_bytes());
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&byte_rate.to_le_bytes());
        bytes.extend_from_slice(&block_align.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }

        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_wav_mono() {
        let file = write_wav(&[0, 16384, -16384, 32767], 1, WHISPER_SAMPLE_RATE);
        let samples = load_wav(file.path()).unwrap();

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], 0.0);
        assert!((samples[1] - 0.5).abs() < 1e-3);
        assert!((samples[2] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_load_wav_stereo_downmix() {
        // Two frames of opposing channels should average to silence
        let file = write_wav(&[16384, -16384, 16384, -16384], 2, WHISPER_SAMPLE_RATE);
        let samples = load_wav(file.path()).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[1], 0.0);
    }

    #[test]
    fn test_load_wav_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a wav file, not even close!!!")
            .unwrap();
        file.flush().unwrap();

        let result = load_wav(file.path());
        assert!(result.is_err());
    }
}
