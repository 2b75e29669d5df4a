use std::io::Write;
use std::path::Path;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub message: String,
    pub predicted_class: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
        }),
    )
}

/// Accepts a multipart video upload under the `file` field, runs the
/// prediction pipeline, and returns the decoded sentence.
///
/// The upload is spooled to a temporary file that is removed once
/// prediction finishes, success or not.
#[tracing::instrument(skip(state, multipart))]
pub async fn predict_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let (filename, data) = loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => {
                tracing::warn!("predict request with no file field");
                return bad_request("No file provided");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read multipart");
                return bad_request(&format!("Failed to read multipart: {e}"));
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return bad_request("No selected file"),
        };
        let data = match field.bytes().await {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, "failed to read upload body");
                return bad_request(&format!("Failed to read file: {e}"));
            }
        };
        break (filename, data);
    };

    if data.is_empty() {
        return bad_request("Empty file");
    }

    tracing::info!(filename = %filename, bytes = data.len(), "video upload received");

    // Keep the original extension so the decoder can probe the container.
    let suffix = Path::new(&filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let engine = state.engine.clone();
    let outcome = tokio::task::spawn_blocking(move || -> Result<String, String> {
        let mut temp = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| e.to_string())?;
        temp.write_all(&data).map_err(|e| e.to_string())?;
        temp.flush().map_err(|e| e.to_string())?;

        let mut engine = engine.lock().unwrap_or_else(|e| e.into_inner());
        engine.execute(temp.path()).map_err(|e| e.to_string())
    })
    .await;

    match outcome {
        Ok(Ok(sentence)) => {
            tracing::info!(sentence = %sentence, "prediction complete");
            (
                StatusCode::OK,
                Json(PredictResponse {
                    message: "Video processed successfully!".to_string(),
                    predicted_class: sentence,
                }),
            )
                .into_response()
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "prediction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: e }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "prediction task panicked");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "prediction task failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
