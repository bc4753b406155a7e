//! Résumé analysis pipeline: extract → assemble parts → model call → passthrough.

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::form::{Action, AnalysisRequest};
use crate::analysis::prompts::ATS_ANALYSIS_PROMPT;
use crate::errors::AppError;
use crate::extraction::{PdfContent, PdfExtractor};
use crate::llm_client::{document_parts, GenerativeModel, Part};

pub mod form;
pub mod handlers;
pub mod prompts;

/// Runs one analysis and returns the model's text unmodified.
pub async fn analyze_resume(
    extractor: &dyn PdfExtractor,
    model: &dyn GenerativeModel,
    request: AnalysisRequest,
) -> Result<String, AppError> {
    let analysis_id = Uuid::new_v4();
    let span = info_span!(
        "analysis",
        %analysis_id,
        action = request.action.as_str(),
        mode = %extractor.mode()
    );

    async move {
        info!(
            file_name = %request.resume.file_name,
            content_type = request.resume.content_type.as_deref().unwrap_or("unknown"),
            bytes = request.resume.bytes.len(),
            "Analysis started"
        );

        let prompt = match request.action {
            Action::AnalyzeResume => ATS_ANALYSIS_PROMPT,
        };

        let content = extractor.extract(request.resume.bytes).await?;
        let document = document_part(content)?;
        let parts = document_parts(&request.job_description, document, prompt);

        let text = model.generate(parts).await?;
        info!(chars = text.len(), model = model.model_name(), "Analysis complete");
        Ok(text)
    }
    .instrument(span)
    .await
}

/// Only the first page image is sent; text mode sends the whole text as one part.
fn document_part(content: PdfContent) -> Result<Part, AppError> {
    match content {
        PdfContent::Image(images) => images
            .into_iter()
            .next()
            .map(Part::from)
            .ok_or_else(|| AppError::ExtractionFailed("no page image was produced".to_string())),
        PdfContent::Text(text) => Ok(Part::text(text)),
    }
}
