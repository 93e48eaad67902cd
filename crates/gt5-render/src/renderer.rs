//! Renderer trait abstraction.

use gt5_core::canvas::{CanvasSize, DrawingStore};
use image::RgbaImage;
use peniko::Color;
use thiserror::Error;

/// Largest output edge, in pixels.
pub const MAX_OUTPUT_DIMENSION: u32 = 16_384;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid output size: {0}")]
    InvalidSize(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for rendering one image of a drawing.
pub struct RenderContext<'a> {
    /// The drawing to render.
    pub store: &'a DrawingStore,
    /// Output pixels per canvas unit.
    pub pixel_ratio: f64,
    /// Background painted under all layers; `None` leaves it transparent.
    pub background_color: Option<Color>,
}

impl<'a> RenderContext<'a> {
    pub fn new(store: &'a DrawingStore) -> Self {
        Self {
            store,
            pixel_ratio: 1.0,
            background_color: None,
        }
    }

    /// Set the output pixel ratio.
    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Option<Color>) -> Self {
        self.background_color = color;
        self
    }

    /// Output dimensions: canvas size times pixel ratio, rounded.
    pub fn output_size(&self) -> RenderResult<(u32, u32)> {
        let CanvasSize { width, height } = self.store.canvas_size();
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return Err(RendererError::InvalidSize(format!(
                "pixel ratio {}",
                self.pixel_ratio
            )));
        }
        let scale = |v: u32| (v as f64 * self.pixel_ratio).round();
        let (w, h) = (scale(width), scale(height));
        let max = MAX_OUTPUT_DIMENSION as f64;
        if w < 1.0 || h < 1.0 || w > max || h > max {
            return Err(RendererError::InvalidSize(format!("{w}x{h}")));
        }
        Ok((w as u32, h as u32))
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Render the drawing's visible layers into a straight-alpha RGBA image.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RgbaImage>;
}
