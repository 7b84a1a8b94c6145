//! Whisper model provisioning
//!
//! Resolves a model variant name to a ggml weights file on disk,
//! downloading it on first use

use crate::Result;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Whisper model variant information
#[derive(Debug, Clone)]
pub struct WhisperModel {
    /// Variant name (e.g., "base", "small", "medium")
    pub name: String,

    /// Approximate file size in bytes
    pub size: u64,

    /// Download URL
    pub url: String,
}

impl WhisperModel {
    /// Get model filename
    pub fn filename(&self) -> String {
        format!("ggml-{}.bin", self.name)
    }

    /// Get size in MB
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / 1024.0 / 1024.0
    }
}

/// Available Whisper model variants
pub fn available_models() -> Vec<WhisperModel> {
    let base_url = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

    vec![
        WhisperModel {
            name: "tiny".to_string(),
            size: 75 * 1024 * 1024,
            url: format!("{}/ggml-tiny.bin", base_url),
        },
        WhisperModel {
            name: "base".to_string(),
            size: 142 * 1024 * 1024,
            url: format!("{}/ggml-base.bin", base_url),
        },
        WhisperModel {
            name: "small".to_string(),
            size: 466 * 1024 * 1024,
            url: format!("{}/ggml-small.bin", base_url),
        },
        WhisperModel {
            name: "medium".to_string(),
            size: 1500 * 1024 * 1024,
            url: format!("{}/ggml-medium.bin", base_url),
        },
        WhisperModel {
            name: "large-v3".to_string(),
            size: 3100 * 1024 * 1024,
            url: format!("{}/ggml-large-v3.bin", base_url),
        },
    ]
}

/// Get default models directory
pub fn default_models_dir() -> PathBuf {
    // Check environment variable first
    if let Ok(dir) = std::env::var("SCRIBE_MODELS_DIR") {
        return PathBuf::from(dir);
    }

    // Use platform-specific cache directory
    #[cfg(target_os = "linux")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".cache/scribe/models");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Caches/scribe/models");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(local_app_data) = std::env::var_os("LOCALAPPDATA") {
            return PathBuf::from(local_app_data).join("scribe\\models");
        }
    }

    // Fallback
    PathBuf::from("models")
}

/// Downloads and caches model weights
pub struct ModelManager {
    models_dir: PathBuf,
    client: Client,
}

impl ModelManager {
    /// Create new model manager
    pub fn new(models_dir: PathBuf) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(3600)) // 1 hour for large downloads
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { models_dir, client })
    }

    /// Ensure the named model variant exists on disk, download if missing
    pub async fn ensure_model(&self, model_name: &str) -> Result<PathBuf> {
        let model_path = self.models_dir.join(format!("ggml-{}.bin", model_name));

        if model_path.exists() {
            info!("Model already exists: {}", model_path.display());
            return Ok(model_path);
        }

        info!("Model not found, downloading: {}", model_name);

        // Find model info
        let models = available_models();
        let model_info = models
            .iter()
            .find(|m| m.name == model_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown model: {}", model_name))?;

        self.download_model(model_info, &model_path).await?;

        Ok(model_path)
    }

    /// Download model from URL
    pub async fn download_model(&self, model: &WhisperModel, dest: &Path) -> Result<()> {
        info!(
            "Downloading {} ({:.1} MB) from {}",
            model.filename(),
            model.size_mb(),
            model.url
        );

        // Create directory
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Create progress bar
        let pb = ProgressBar::new(model.size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .unwrap()
                .progress_chars("#>-"),
        );

        // Download with progress
        let response = self
            .client
            .get(&model.url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to download: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Download failed with status: {}",
                response.status()
            )
            .into());
        }

        // Write to temporary file first
        let temp_path = dest.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| anyhow::anyhow!("Download error: {}", e))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }

        pb.finish_with_message("Download complete");
        file.sync_all().await?;
        drop(file);

        // Sanity-check file size before putting it in place
        let metadata = fs::metadata(&temp_path).await?;
        if metadata.len() < model.size / 2 {
            fs::remove_file(&temp_path).await?;
            return Err(anyhow::anyhow!(
                "Downloaded file is too small ({} bytes, expected ~{} bytes)",
                metadata.len(),
                model.size
            )
            .into());
        }

        // Rename to final destination
        fs::rename(&temp_path, dest).await?;

        info!("Download successful: {}", dest.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_models() {
        let models = available_models();
        assert_eq!(models.len(), 5);
        assert!(models.iter().any(|m| m.name == "base"));
        assert!(models.iter().any(|m| m.name == "large-v3"));
    }

    #[test]
    fn test_model_filename() {
        let model = WhisperModel {
            name: "base".to_string(),
            size: 142 * 1024 * 1024,
            url: "".to_string(),
        };
        assert_eq!(model.filename(), "ggml-base.bin");
    }

    #[test]
    fn test_default_models_dir() {
        let dir = default_models_dir();
        assert!(!dir.to_string_lossy().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_model_finds_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("ggml-base.bin");
        std::fs::write(&model_path, b"weights").unwrap();

        let manager = ModelManager::new(dir.path().to_path_buf()).unwrap();
        let resolved = manager.ensure_model("base").await.unwrap();
        assert_eq!(resolved, model_path);
    }
}
