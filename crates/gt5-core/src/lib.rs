//! GT5 Core Library
//!
//! Drawing model for the GT5 drawing engine: strokes, layers, undo history,
//! pointer and keyboard input, configuration and saved drawings.

pub mod canvas;
pub mod config;
pub mod error;
pub mod history;
pub mod layer;
pub mod shortcuts;
pub mod storage;
pub mod stroke;
pub mod style;
pub mod tools;

pub use canvas::{Canvas, CanvasSize, DrawingData, DrawingStore, PointerEvent};
pub use config::{ConfigError, DrawingConfig, ExportSettings};
pub use error::{DrawingError, DrawingResult};
pub use history::History;
pub use layer::{Layer, LayerId, LayerStack};
pub use shortcuts::{KeyInput, ShortcutAction, ShortcutRegistry};
pub use stroke::Stroke;
pub use style::SerializableColor;
pub use tools::{BlendMode, ToolKind, ToolState};
