use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::extraction::ExtractionMode;

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub port: u16,
    pub rust_log: String,
    pub extraction_mode: ExtractionMode,
    pub upstream_timeout: Duration,
    pub max_upload_bytes: usize,
    pub render: RenderSettings,
}

/// Knobs for the first-page rasteriser.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub dpi: u32,
    pub jpeg_quality: u8,
    /// Longest rendered edge in pixels, whatever the DPI.
    pub max_pixels: u32,
    /// Directory containing the pdfium shared library. `None` uses the system lookup.
    pub pdfium_library_path: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            dpi: 200,
            jpeg_quality: 75,
            max_pixels: 4000,
            pdfium_library_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let render_defaults = RenderSettings::default();
        let jpeg_quality: u8 = parse_env_or("JPEG_QUALITY", render_defaults.jpeg_quality)?;
        if !(1..=100).contains(&jpeg_quality) {
            bail!("JPEG_QUALITY must be between 1 and 100, got {jpeg_quality}");
        }
        let upstream_timeout_secs: u64 = parse_env_or("UPSTREAM_TIMEOUT_SECS", 120)?;
        let dpi: u32 = parse_env_or("RENDER_DPI", render_defaults.dpi)?;
        let max_pixels: u32 = parse_env_or("MAX_RENDER_PIXELS", render_defaults.max_pixels)?;
        require_positive("UPSTREAM_TIMEOUT_SECS", upstream_timeout_secs)?;
        require_positive("RENDER_DPI", u64::from(dpi))?;
        require_positive("MAX_RENDER_PIXELS", u64::from(max_pixels))?;

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_api_base: std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
            port: parse_env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            extraction_mode: parse_env_or("EXTRACTION_MODE", ExtractionMode::default())?,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            max_upload_bytes: parse_env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            render: RenderSettings {
                dpi,
                jpeg_quality,
                max_pixels,
                pdfium_library_path: std::env::var_os("PDFIUM_LIBRARY_PATH").map(PathBuf::from),
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn require_positive(key: &str, value: u64) -> Result<()> {
    if value == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(())
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{key} has an invalid value '{raw}': {e}"))
}
