//! Multipart form parsing for `POST /analyze`.

use std::str::FromStr;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

pub const JOB_DESCRIPTION_FIELD: &str = "job_description";
pub const RESUME_FIELD: &str = "resume";
pub const ACTION_FIELD: &str = "action";

/// The only operation the form can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AnalyzeResume,
}

impl Action {
    pub const ANALYZE_RESUME: &'static str = "Analyze Resume";

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::AnalyzeResume => Self::ANALYZE_RESUME,
        }
    }
}

impl FromStr for Action {
    type Err = AppError;

    /// Exact match only: no trimming, no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ANALYZE_RESUME => Ok(Action::AnalyzeResume),
            _ => Err(AppError::InvalidAction),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Raw form fields as submitted. Every field may be absent.
#[derive(Debug, Default)]
pub struct AnalyzeForm {
    pub job_description: Option<String>,
    pub resume: Option<Upload>,
    pub action: Option<String>,
}

/// A form that passed validation.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub job_description: String,
    pub resume: Upload,
    pub action: Action,
}

impl AnalyzeForm {
    /// Reads every field of the multipart stream. A `resume` part only counts as
    /// an upload when it carries a non-empty filename, which is how browsers
    /// submit a file input left blank. Repeated fields keep the first value.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = AnalyzeForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                JOB_DESCRIPTION_FIELD if form.job_description.is_none() => {
                    form.job_description = Some(field.text().await.map_err(multipart_error)?);
                }
                ACTION_FIELD if form.action.is_none() => {
                    form.action = Some(field.text().await.map_err(multipart_error)?);
                }
                RESUME_FIELD if form.resume.is_none() => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    if file_name.is_empty() {
                        debug!("Ignoring resume part without a filename");
                        continue;
                    }
                    form.resume = Some(Upload {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                JOB_DESCRIPTION_FIELD | ACTION_FIELD | RESUME_FIELD => {
                    debug!("Ignoring repeated form field '{name}'");
                }
                other => debug!("Ignoring unknown form field '{other}'"),
            }
        }

        Ok(form)
    }

    /// Missing file is checked before the action.
    pub fn validate(self) -> Result<AnalysisRequest, AppError> {
        let resume = self.resume.ok_or(AppError::MissingUpload)?;
        let action = self
            .action
            .as_deref()
            .ok_or(AppError::InvalidAction)?
            .parse::<Action>()?;

        Ok(AnalysisRequest {
            job_description: self.job_description.unwrap_or_default(),
            resume,
            action,
        })
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge
    } else {
        AppError::UploadInvalid(e.body_text())
    }
}
