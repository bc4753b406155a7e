//! Image encoding: `DynamicImage` → base64 JPEG wrapped in `InlineData`.
//!
//! JPEG has no alpha channel, so pdfium's RGBA bitmap is flattened to RGB
//! before encoding.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::debug;

use crate::llm_client::InlineData;

pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// Encode a rendered page as JPEG bytes.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;
    Ok(buf)
}

/// Encode a rendered page as a base64 JPEG part ready for the model API.
pub fn encode_page(img: &DynamicImage, quality: u8) -> Result<InlineData, image::ImageError> {
    let jpeg = encode_jpeg(img, quality)?;
    let b64 = STANDARD.encode(&jpeg);
    debug!("Encoded page → {} bytes JPEG, {} bytes base64", jpeg.len(), b64.len());

    Ok(InlineData {
        mime_type: JPEG_MIME_TYPE.to_string(),
        data: b64,
    })
}
