//! Stub collaborators and request builders shared by handler and pipeline tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::analysis::form::{Action, AnalysisRequest, Upload};
use crate::extraction::{ExtractError, ExtractionMode, PdfContent, PdfExtractor};
use crate::llm_client::{GenerativeModel, InlineData, LlmError, Part};
use crate::state::AppState;

pub fn app_state(extractor: StubExtractor, model: StubModel) -> AppState {
    AppState {
        extractor: Arc::new(extractor),
        model: Arc::new(model),
    }
}

pub fn analysis_request(job_description: &str) -> AnalysisRequest {
    AnalysisRequest {
        job_description: job_description.to_string(),
        resume: Upload {
            file_name: "resume.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF-1.4 stub"),
        },
        action: Action::AnalyzeResume,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// StubExtractor
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
enum ExtractOutcome {
    Content(PdfContent),
    NotAPdf,
}

/// Returns a canned `PdfContent` and records what it was given.
#[derive(Clone)]
pub struct StubExtractor {
    mode: ExtractionMode,
    outcome: ExtractOutcome,
    calls: Arc<AtomicUsize>,
    last_upload: Arc<Mutex<Option<Bytes>>>,
}

impl StubExtractor {
    fn new(mode: ExtractionMode, outcome: ExtractOutcome) -> Self {
        Self {
            mode,
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
            last_upload: Arc::new(Mutex::new(None)),
        }
    }

    pub fn image(data: &str) -> Self {
        Self::new(
            ExtractionMode::RenderFirstPageImage,
            ExtractOutcome::Content(PdfContent::Image(vec![InlineData {
                mime_type: "image/jpeg".to_string(),
                data: data.to_string(),
            }])),
        )
    }

    pub fn text(text: &str) -> Self {
        Self::new(
            ExtractionMode::ExtractAllPagesText,
            ExtractOutcome::Content(PdfContent::Text(text.to_string())),
        )
    }

    pub fn failing() -> Self {
        Self::new(ExtractionMode::RenderFirstPageImage, ExtractOutcome::NotAPdf)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_upload(&self) -> Option<Bytes> {
        self.last_upload.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfExtractor for StubExtractor {
    fn mode(&self) -> ExtractionMode {
        self.mode
    }

    async fn extract(&self, pdf: Bytes) -> Result<PdfContent, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_upload.lock().unwrap() = Some(pdf);
        match &self.outcome {
            ExtractOutcome::Content(content) => Ok(content.clone()),
            ExtractOutcome::NotAPdf => Err(ExtractError::NotAPdf),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// StubModel
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
enum ModelOutcome {
    Reply(String),
    Timeout,
    Rejected,
}

/// Records every call's parts and answers with a canned outcome.
#[derive(Clone)]
pub struct StubModel {
    outcome: ModelOutcome,
    calls: Arc<Mutex<Vec<Vec<Part>>>>,
}

impl StubModel {
    fn new(outcome: ModelOutcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(ModelOutcome::Reply(text.to_string()))
    }

    pub fn timing_out() -> Self {
        Self::new(ModelOutcome::Timeout)
    }

    pub fn rejecting() -> Self {
        Self::new(ModelOutcome::Rejected)
    }

    pub fn calls(&self) -> Vec<Vec<Part>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    fn model_name(&self) -> &str {
        "stub-model"
    }

    async fn generate(&self, parts: Vec<Part>) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(parts);
        match &self.outcome {
            ModelOutcome::Reply(text) => Ok(text.clone()),
            ModelOutcome::Timeout => Err(LlmError::Timeout),
            ModelOutcome::Rejected => Err(LlmError::Api {
                status: 403,
                message: "API key not valid. Please pass a valid API key.".to_string(),
            }),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart request bodies
// ────────────────────────────────────────────────────────────────────────────

const BOUNDARY: &str = "----ats-analyzer-test-boundary";

pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.buf
    }
}
