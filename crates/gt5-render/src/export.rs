//! Image export: PNG and JPEG bytes, data URLs and file names.

use crate::raster::RasterRenderer;
use crate::renderer::{RenderContext, Renderer, RendererError};
use base64::{Engine, engine::general_purpose::STANDARD};
use gt5_core::canvas::DrawingStore;
use gt5_core::config::ExportSettings;
use image::{DynamicImage, RgbaImage, codecs::jpeg::JpegEncoder};
use peniko::Color;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Prefix of generated export file names.
pub const FILE_NAME_PREFIX: &str = "gt5-drawing";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
    /// Recognized but not produced; exporting it fails.
    Svg,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Svg => "image/svg+xml",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            "svg" => Ok(ExportFormat::Svg),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Export parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Output pixels per canvas unit.
    pub pixel_ratio: f64,
    /// JPEG quality, 1 to 100.
    pub jpeg_quality: u8,
}

impl ExportOptions {
    /// Options for `format` with the configured ratio and quality.
    pub fn new(format: ExportFormat, settings: &ExportSettings) -> Self {
        Self {
            format,
            pixel_ratio: settings.pixel_ratio,
            jpeg_quality: settings.jpeg_quality,
        }
    }
}

/// An encoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// `data:<mime>;base64,<bytes>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        std::fs::write(path, &self.bytes)?;
        log::info!(
            "Exported {}x{} {} to {}",
            self.width,
            self.height,
            self.format,
            path.display()
        );
        Ok(())
    }
}

/// File name for an export: `<name>.<ext>`, or a timestamped default.
pub fn default_file_name(name: Option<&str>, format: ExportFormat) -> String {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    file_name_at(name, format, now_ms)
}

/// Like [`default_file_name`] with an explicit unix-millisecond timestamp.
pub fn file_name_at(name: Option<&str>, format: ExportFormat, now_ms: u128) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => format!("{name}.{}", format.extension()),
        _ => format!("{FILE_NAME_PREFIX}-{now_ms}.{}", format.extension()),
    }
}

/// Render and encode a drawing.
pub fn export(store: &DrawingStore, options: &ExportOptions) -> Result<ExportedImage, ExportError> {
    let background = match options.format {
        ExportFormat::Png => None,
        ExportFormat::Jpeg => Some(Color::WHITE),
        ExportFormat::Svg => {
            return Err(ExportError::UnsupportedFormat(
                ExportFormat::Svg.to_string(),
            ));
        }
    };

    let ctx = RenderContext::new(store)
        .with_pixel_ratio(options.pixel_ratio)
        .with_background(background);
    let image = RasterRenderer::new().render(&ctx)?;
    let (width, height) = image.dimensions();

    let bytes = match options.format {
        ExportFormat::Jpeg => encode_jpeg(image, options.jpeg_quality)?,
        _ => encode_png(image.as_raw(), width, height)?,
    };
    Ok(ExportedImage {
        format: options.format,
        width,
        height,
        bytes,
    })
}

/// Encode straight-alpha RGBA8 pixels as PNG.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().map_err(|e| {
            log::error!("Failed to write PNG header: {e:?}");
            ExportError::Encode(e.to_string())
        })?;
        writer.write_image_data(rgba_data).map_err(|e| {
            log::error!("Failed to write PNG data: {e:?}");
            ExportError::Encode(e.to_string())
        })?;
    }
    Ok(png_data)
}

/// Encode as JPEG. Alpha is dropped, so flatten onto a background first.
fn encode_jpeg(image: RgbaImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
    let mut jpeg_data = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg_data, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| {
            log::error!("Failed to encode JPEG: {e:?}");
            ExportError::Encode(e.to_string())
        })?;
    Ok(jpeg_data)
}
