//! Résumé extraction: turns uploaded PDF bytes into something the model can read.
//!
//! Two modes exist, chosen at startup via `EXTRACTION_MODE`:
//! - `RenderFirstPageImage` (default): rasterise page 1 with pdfium, JPEG + base64.
//! - `ExtractAllPagesText`: concatenate the text of every page with pdf-extract.
//!
//! `AppState` holds an `Arc<dyn PdfExtractor>` so handlers never care which one runs.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::RenderSettings;
use crate::llm_client::InlineData;

pub mod encode;
pub mod render;
pub mod text;

#[cfg(test)]
pub(crate) mod fixtures;

/// How far into the upload we look for the `%PDF-` header.
const PDF_HEADER_SEARCH_WINDOW: usize = 1024;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    #[default]
    RenderFirstPageImage,
    ExtractAllPagesText,
}

impl ExtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::RenderFirstPageImage => "render_first_page_image",
            ExtractionMode::ExtractAllPagesText => "extract_all_pages_text",
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "render_first_page_image" | "image" => Ok(ExtractionMode::RenderFirstPageImage),
            "extract_all_pages_text" | "text" => Ok(ExtractionMode::ExtractAllPagesText),
            other => Err(format!(
                "unknown extraction mode '{other}' (expected render_first_page_image or extract_all_pages_text)"
            )),
        }
    }
}

/// What the extractor hands to the model client.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfContent {
    /// Single-element sequence: the first page as a base64 JPEG.
    Image(Vec<InlineData>),
    /// Text of every page, in page order.
    Text(String),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Uploaded file is not a PDF")]
    NotAPdf,

    #[error("PDF could not be parsed: {detail}")]
    CorruptPdf { detail: String },

    #[error("PDF is password protected")]
    PasswordProtected,

    #[error("PDF has no pages")]
    EmptyDocument,

    #[error("PDF contains no extractable text")]
    NoExtractableText,

    #[error("PDF renderer is unavailable: {detail}")]
    RendererUnavailable { detail: String },

    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Extraction task failed: {0}")]
    Internal(String),
}

impl ExtractError {
    /// True when the upload itself is at fault, as opposed to the server.
    pub fn is_bad_upload(&self) -> bool {
        matches!(
            self,
            ExtractError::NotAPdf
                | ExtractError::CorruptPdf { .. }
                | ExtractError::PasswordProtected
                | ExtractError::EmptyDocument
                | ExtractError::NoExtractableText
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait PdfExtractor: Send + Sync {
    fn mode(&self) -> ExtractionMode;

    async fn extract(&self, pdf: Bytes) -> Result<PdfContent, ExtractError>;
}

// ────────────────────────────────────────────────────────────────────────────
// ResumeExtractor — the production implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct ResumeExtractor {
    mode: ExtractionMode,
    render: RenderSettings,
}

impl ResumeExtractor {
    pub fn new(mode: ExtractionMode, render: RenderSettings) -> Self {
        Self { mode, render }
    }
}

#[async_trait]
impl PdfExtractor for ResumeExtractor {
    fn mode(&self) -> ExtractionMode {
        self.mode
    }

    async fn extract(&self, pdf: Bytes) -> Result<PdfContent, ExtractError> {
        ensure_pdf_header(&pdf)?;
        debug!(bytes = pdf.len(), mode = %self.mode, "Extracting résumé content");

        match self.mode {
            ExtractionMode::RenderFirstPageImage => {
                let page = render::render_first_page(pdf, &self.render).await?;
                let part = encode::encode_page(&page, self.render.jpeg_quality)?;
                Ok(PdfContent::Image(vec![part]))
            }
            ExtractionMode::ExtractAllPagesText => {
                let text = text::extract_all_pages_text(pdf).await?;
                Ok(PdfContent::Text(text))
            }
        }
    }
}

/// Rejects uploads whose first kilobyte carries no `%PDF-` marker.
pub fn ensure_pdf_header(bytes: &[u8]) -> Result<(), ExtractError> {
    let window = &bytes[..bytes.len().min(PDF_HEADER_SEARCH_WINDOW)];
    if window.windows(5).any(|w| w == b"%PDF-") {
        Ok(())
    } else {
        Err(ExtractError::NotAPdf)
    }
}
