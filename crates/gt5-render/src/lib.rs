//! GT5 Render Library
//!
//! Software rasterization of drawings and image export.

pub mod export;
mod raster;
mod renderer;

pub use export::{ExportError, ExportFormat, ExportOptions, ExportedImage, default_file_name, export};
pub use raster::RasterRenderer;
pub use renderer::{MAX_OUTPUT_DIMENSION, RenderContext, RenderResult, Renderer, RendererError};
