use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractError;
use crate::llm_client::LlmError;

pub const MISSING_UPLOAD_MESSAGE: &str = "Please upload a PDF file to proceed.";
pub const INVALID_ACTION_MESSAGE: &str = "Invalid action.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please upload a PDF file to proceed.")]
    MissingUpload,

    #[error("Invalid action.")]
    InvalidAction,

    #[error("Upload exceeds the size limit")]
    UploadTooLarge,

    #[error("Invalid upload: {0}")]
    UploadInvalid(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Upstream unavailable: {detail}")]
    UpstreamUnavailable { timed_out: bool, detail: String },

    #[error("Upstream error: {0}")]
    UpstreamError(String),
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        if e.is_bad_upload() {
            AppError::UploadInvalid(e.to_string())
        } else {
            AppError::ExtractionFailed(e.to_string())
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        if e.is_unavailable() {
            AppError::UpstreamUnavailable {
                timed_out: matches!(e, LlmError::Timeout),
                detail: e.to_string(),
            }
        } else {
            AppError::UpstreamError(e.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // The upload form reads these as plain text.
            AppError::MissingUpload => {
                return (StatusCode::BAD_REQUEST, MISSING_UPLOAD_MESSAGE).into_response()
            }
            AppError::InvalidAction => {
                return (StatusCode::BAD_REQUEST, INVALID_ACTION_MESSAGE).into_response()
            }
            AppError::UploadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "UPLOAD_TOO_LARGE",
                "The uploaded file is too large".to_string(),
            ),
            AppError::UploadInvalid(msg) => (StatusCode::BAD_REQUEST, "UPLOAD_INVALID", msg.clone()),
            AppError::ExtractionFailed(msg) => {
                tracing::error!("Extraction error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXTRACTION_FAILED",
                    "The résumé could not be processed".to_string(),
                )
            }
            AppError::UpstreamUnavailable { timed_out, detail } => {
                tracing::error!("Upstream unavailable: {detail}");
                let status = if *timed_out {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (
                    status,
                    "UPSTREAM_UNAVAILABLE",
                    "The analysis service could not be reached".to_string(),
                )
            }
            AppError::UpstreamError(msg) => {
                tracing::error!("Upstream error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The analysis service returned an error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
