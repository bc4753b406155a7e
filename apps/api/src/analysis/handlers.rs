//! Axum route handler for the Analysis API.

use axum::extract::{multipart::MultipartRejection, Multipart, State};
use tracing::debug;

use crate::analysis::analyze_resume;
use crate::analysis::form::AnalyzeForm;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /analyze
///
/// Multipart form: `job_description`, `resume` (PDF), `action`.
/// Returns the model's text verbatim as `text/plain`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, AppError> {
    // A body that is not multipart cannot carry a file.
    let form = match multipart {
        Ok(multipart) => AnalyzeForm::from_multipart(multipart).await?,
        Err(rejection) => {
            debug!("Request is not multipart: {rejection}");
            AnalyzeForm::default()
        }
    };

    let request = form.validate()?;

    analyze_resume(state.extractor.as_ref(), state.model.as_ref(), request).await
}
