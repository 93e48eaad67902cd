//! Errors raised by drawing store and canvas operations.

use crate::layer::LayerId;
use thiserror::Error;

/// Errors for invalid drawing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawingError {
    #[error("Unknown layer: {0}")]
    UnknownLayer(LayerId),
    #[error("Layer {0} is locked")]
    LayerLocked(LayerId),
    #[error("No active layer")]
    NoActiveLayer,
    #[error("Stroke index {index} out of range (have {len} strokes)")]
    StrokeOutOfRange { index: usize, len: usize },
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("No layer ids left")]
    LayerIdsExhausted,
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Result type for drawing operations.
pub type DrawingResult<T> = Result<T, DrawingError>;
