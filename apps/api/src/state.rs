use std::sync::Arc;

use crate::extraction::PdfExtractor;
use crate::llm_client::GenerativeModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable extractor. Default: first-page image. Swap via EXTRACTION_MODE env.
    pub extractor: Arc<dyn PdfExtractor>,
    /// Model client, built once at startup with the configured API key.
    pub model: Arc<dyn GenerativeModel>,
}
