use anyhow::Result;
use clap::{Parser, Subcommand};
use scribe_common::{logger, AppConfig, ModelManager};
use scribe_stt::WhisperEngine;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "scribe")]
#[command(about = "HTTP transcription service backed by whisper.cpp", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides SERVER_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides SERVER_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // CLI arguments override the environment; config reads env only
    if let Some(Commands::Serve { host, port }) = cli.command {
        if let Some(host) = host {
            std::env::set_var("SERVER_HOST", host);
        }
        if let Some(port) = port {
            std::env::set_var("SERVER_PORT", port.to_string());
        }
    }

    let config = AppConfig::from_env()?;
    config.validate()?;
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("Scribe starting...");
    tracing::info!("  Model: {}", config.model_size);
    tracing::info!("  Bind: {}", config.server_bind_address());

    // Resolve the configured variant to weights on disk, downloading on
    // first run, then load the model once before accepting traffic.
    let manager = ModelManager::new(config.models_dir.clone())?;
    let model_path = manager.ensure_model(&config.model_size).await?;

    tracing::info!(
        "Loading Whisper model '{}' (this may take a while on first run)...",
        config.model_size
    );
    let engine = tokio::task::spawn_blocking(move || WhisperEngine::load(model_path)).await??;
    tracing::info!("Whisper model loaded.");

    println!("Server listening on http://{}", config.server_bind_address());

    scribe_server::start_server(config, Arc::new(engine)).await?;

    Ok(())
}
