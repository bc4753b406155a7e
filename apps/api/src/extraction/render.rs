//! First-page rasterisation via pdfium.
//!
//! pdfium keeps thread-local state and is CPU-bound, so every call runs on the
//! blocking pool. The library is bound per call; `PDFIUM_LIBRARY_PATH` points
//! at the directory holding the shared library, otherwise the system loader
//! resolves it.
//!
//! A tiny upload can declare an enormous MediaBox, so the longest rendered
//! edge is capped at `max_pixels` whatever the DPI.

use std::path::Path;

use bytes::Bytes;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info};

use crate::config::RenderSettings;
use crate::extraction::ExtractError;

/// PDF user space is 72 units per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Render page 1 of `pdf` at the configured DPI.
pub async fn render_first_page(
    pdf: Bytes,
    settings: &RenderSettings,
) -> Result<DynamicImage, ExtractError> {
    let settings = settings.clone();

    tokio::task::spawn_blocking(move || render_first_page_blocking(&pdf, &settings))
        .await
        .map_err(|e| ExtractError::Internal(format!("Render task panicked: {e}")))?
}

fn render_first_page_blocking(
    pdf: &[u8],
    settings: &RenderSettings,
) -> Result<DynamicImage, ExtractError> {
    let pdfium = bind_pdfium(settings.pdfium_library_path.as_deref())?;

    let document = pdfium
        .load_pdf_from_byte_slice(pdf, None)
        .map_err(classify_load_error)?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    if total_pages == 0 {
        return Err(ExtractError::EmptyDocument);
    }
    info!("PDF loaded: {} pages, rendering page 1", total_pages);

    let page = pages.first().map_err(|e| ExtractError::RasterisationFailed {
        page: 1,
        detail: format!("{:?}", e),
    })?;

    let scale = capped_scale(page.width().value, page.height().value, settings);
    let render_config = render_config(scale, settings.max_pixels);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| ExtractError::RasterisationFailed {
            page: 1,
            detail: format!("{:?}", e),
        })?;

    let image = bitmap.as_image();
    debug!(
        "Rendered page 1 → {}x{} px at {} dpi",
        image.width(),
        image.height(),
        settings.dpi
    );

    Ok(image)
}

/// Scale factor for the configured DPI, shrunk so neither edge exceeds
/// `max_pixels`.
fn capped_scale(width_pt: f32, height_pt: f32, settings: &RenderSettings) -> f32 {
    let scale = settings.dpi as f32 / POINTS_PER_INCH;
    let longest_pt = width_pt.max(height_pt);
    if longest_pt <= 0.0 {
        return scale;
    }
    let cap = settings.max_pixels as f32 / longest_pt;
    scale.min(cap)
}

fn render_config(scale: f32, max_pixels: u32) -> PdfRenderConfig {
    let max_pixels = max_pixels.min(i32::MAX as u32) as i32;
    PdfRenderConfig::new()
        .scale_page_by_factor(scale)
        .set_maximum_width(max_pixels)
        .set_maximum_height(max_pixels)
}

fn bind_pdfium(library_dir: Option<&Path>) -> Result<Pdfium, ExtractError> {
    let bindings = match library_dir {
        Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)),
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| ExtractError::RendererUnavailable {
        detail: format!("{:?}", e),
    })?;

    Ok(Pdfium::new(bindings))
}

/// pdfium reports password problems only through its error text.
fn classify_load_error(err: PdfiumError) -> ExtractError {
    classify_load_detail(format!("{:?}", err))
}

fn classify_load_detail(detail: String) -> ExtractError {
    if detail.to_ascii_lowercase().contains("password") {
        ExtractError::PasswordProtected
    } else {
        ExtractError::CorruptPdf { detail }
    }
}
