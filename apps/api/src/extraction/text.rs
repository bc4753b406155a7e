//! Plain-text extraction across every page via pdf-extract.

use bytes::Bytes;
use tracing::debug;

use crate::extraction::ExtractError;

/// Concatenated text of every page, in page order.
pub async fn extract_all_pages_text(pdf: Bytes) -> Result<String, ExtractError> {
    let pages = tokio::task::spawn_blocking(move || extract_pages(&pdf))
        .await
        // pdf-extract panics on some malformed inputs
        .map_err(|e| ExtractError::CorruptPdf {
            detail: format!("text extraction aborted: {e}"),
        })??;

    if pages.is_empty() {
        return Err(ExtractError::EmptyDocument);
    }

    let text = pages.concat();
    if text.trim().is_empty() {
        return Err(ExtractError::NoExtractableText);
    }
    debug!("Extracted {} chars of text from {} pages", text.len(), pages.len());
    Ok(text)
}

/// Per-page text, one entry per page.
pub fn extract_pages(pdf: &[u8]) -> Result<Vec<String>, ExtractError> {
    pdf_extract::extract_text_from_mem_by_pages(pdf).map_err(|e| ExtractError::CorruptPdf {
        detail: format!("{:?}", e),
    })
}
