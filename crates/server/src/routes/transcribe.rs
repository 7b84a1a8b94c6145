use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse};
use futures_util::StreamExt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{error, warn};

use crate::state::AppState;
use crate::types::{ErrorResponse, TranscribeResponse};

/// Transcribe an uploaded audio file
///
/// Accepts a multipart upload (field name `file`), spools it to a uniquely
/// named temporary file whose suffix follows the original filename
/// extension (".wav" when absent), and runs the loaded engine on it. The
/// temporary file is removed when the handler returns, on success and
/// failure alike.
#[post("/transcribe")]
pub async fn transcribe(
    mut payload: Multipart,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let mut upload: Option<NamedTempFile> = None;

    while let Some(field) = payload.next().await {
        let mut field = field?;
        let content_disposition = field.content_disposition();

        if content_disposition.get_name() != Some("file") {
            continue;
        }

        let filename = content_disposition
            .get_filename()
            .unwrap_or("")
            .to_string();

        // Many valid audio containers are uploaded without an audio/*
        // content type; accept them anyway and let ffmpeg decide what it
        // can read.
        if let Some(content_type) = field.content_type() {
            if content_type.type_() != mime::AUDIO {
                warn!("Uploaded content type is {}", content_type);
            }
        }

        let suffix = Path::new(&filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_else(|| ".wav".to_string());

        let mut tmp = tempfile::Builder::new()
            .prefix("scribe-upload-")
            .suffix(&suffix)
            .tempfile()?;

        while let Some(chunk) = field.next().await {
            let data = chunk?;
            tmp.write_all(&data)?;
        }
        tmp.flush()?;

        upload = Some(tmp);
        break;
    }

    let Some(tmp) = upload else {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            detail: "No file uploaded".to_string(),
        }));
    };

    let engine = state.engine.clone();
    let audio_path = tmp.path().to_path_buf();

    // Inference is blocking; keep it off the async workers.
    let result = web::block(move || engine.transcribe_file(&audio_path)).await?;

    // `tmp` is dropped when this handler returns, which removes the upload
    // regardless of outcome; removal errors are ignored.
    match result {
        Ok(transcription) => Ok(HttpResponse::Ok().json(TranscribeResponse {
            transcript: transcription.text,
        })),
        Err(e) => {
            error!("Transcription error: {:?}", e);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse {
                detail: format!("Transcription failed: {}", e),
            }))
        }
    }
}
